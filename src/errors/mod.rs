pub mod types;
pub mod classification;

pub use types::{Result, UnillmError};
pub use classification::ErrorClassification;
