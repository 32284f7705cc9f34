pub mod commands;
pub mod chat;
pub mod providers;

pub use commands::{Cli, Commands};
