//! Infrastructure module - logging and application paths

pub mod logging;
pub mod paths;

pub use logging::init_tracing;
