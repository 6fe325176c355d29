//! Application layer: the error registry, the classifier, configuration and
//! shared state.

pub mod classifier;
pub mod config;
pub mod registry;
pub mod state;

pub use classifier::classify;
pub use config::{AppConfig, LogFormat, RateLimitConfig};
pub use state::AppState;
