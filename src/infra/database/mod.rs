//! Concrete database client implementations.
//!
//! This module contains the database adapter that implements
//! the `TaskRepository` trait defined in the domain layer.

pub mod sqlite;

pub use sqlite::{SqliteClient, SqliteConfig, normalize_database_url};
