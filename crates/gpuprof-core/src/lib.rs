pub mod config;
pub mod error;
pub mod probe;

pub use config::GpuprofConfig;
pub use error::CoreError;
pub use probe::{probe, BackendStatus, ProbeReport};
