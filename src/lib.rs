pub mod cli;
pub mod config;
pub mod container;
pub mod errors;
pub mod payloads;
pub mod probe;
pub mod reporting;
pub mod scenarios;
pub mod scoring;
pub mod utils;
