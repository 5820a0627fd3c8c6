//! The API layer, containing web handlers and routing.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use router::create_router;
