//! Tasks API
//!
//! A small REST service for managing tasks, stored in SQLite and documented
//! with OpenAPI.
//!
//! # Architecture Overview
//!
//! This crate is organized into four main layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   API Layer                  │
//! │  HTTP handlers, routing, request extraction  │
//! ├─────────────────────────────────────────────┤
//! │               Application Layer              │
//! │     Task use cases, configuration, state     │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │        Traits, types, validation, errors     │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │     SQLite repository, logging, metrics      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tasks_api::api::create_router;
//! use tasks_api::app::AppState;
//! use tasks_api::infra::SqliteClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = SqliteClient::with_defaults("sqlite::memory:").await?;
//!     db.run_migrations().await?;
//!
//!     let state = Arc::new(AppState::new(Arc::new(db)));
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:9999").await?;
//!     axum::serve(listener, create_router(state)).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
