//! Tracing subscriber setup shared by the ethwatch binaries.
pub mod logging;

pub use logging::{init, LogConfig, LogFormat, LogOutput};
