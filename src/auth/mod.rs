pub mod google;

pub use google::{GoogleTokenSource, ServiceAccountCredentials};
