//! The API layer: the classified error type, handlers, middleware and routing.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use error::ApiError;
pub use router::create_router;
