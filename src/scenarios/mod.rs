pub mod body_variants;
pub mod compat;
pub mod contract;
pub mod functional;
pub mod outcome;
pub mod runner;
pub mod security;
pub mod sweep;

pub use compat::CompatMode;
pub use outcome::{OutcomeStatus, RunLog, ScenarioOutcome};
pub use runner::{ensure_live, Runner};
