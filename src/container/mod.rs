pub mod exec;
pub mod manager;

pub use exec::ExecOutput;
pub use manager::{ContainerStatus, TargetContainer};
