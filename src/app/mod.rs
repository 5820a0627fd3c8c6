//! Application layer containing configuration, use cases and shared state.

pub mod config;
pub mod service;
pub mod state;

pub use config::{AppConfig, Environment, LogLevel};
pub use service::TaskService;
pub use state::AppState;
