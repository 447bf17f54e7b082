//! Logging infrastructure

mod structured;

pub use structured::{init_logging, LoggingGuard};
