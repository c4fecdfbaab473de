pub mod types;
pub mod classification;

pub use types::HarnessError;
pub use classification::{ErrorClassification, ErrorKind};
