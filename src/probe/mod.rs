//! Endpoint probes: one HTTP exchange per call, classified but never judged.

pub mod client;
pub mod compat;
pub mod container;
pub mod legacy;
pub mod request;
pub mod result;
pub mod transport;

pub use client::ProbeClient;
pub use container::ContainerTransport;
pub use request::{Method, ProbeRequest, RequestBody};
pub use result::{ProbeResult, RIFF_MARKER};
pub use transport::{HttpTransport, Transport};
