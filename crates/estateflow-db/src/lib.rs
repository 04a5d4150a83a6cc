//! EstateFlow DB — embedded SurrealDB storage.
//!
//! This crate provides:
//! - Connection management for the file-backed local engine
//!   ([`DbManager`], [`DbConfig`]) and an in-memory variant for tests
//! - Schema initialization and migrations ([`run_migrations`])
//! - Repository implementations for the `estateflow-core` traits
//! - Error types ([`DbError`])

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
