//! Infrastructure layer: logging and metrics setup.

pub mod observability;

pub use observability::{init_metrics_handle, init_tracing};
