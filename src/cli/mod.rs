pub mod commands;
pub mod context;
pub mod security;
pub mod suite;
pub mod validate;

pub use commands::{Cli, Commands};
