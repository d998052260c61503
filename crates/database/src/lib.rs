//! # Usertour Database Crate
//!
//! A small, typed client for the `users` table, shaped like a generated
//! database client: a connection lifecycle, per-field directives, and fluent
//! builders that end in an `exec()` call.
//!
//! ## Architectural Principles
//!
//! - **Swappable backends:** Builders run against the `UserStore` trait, so the
//!   PostgreSQL `Client` and the `InMemoryClient` are interchangeable.
//! - **Explicit absence:** Nullable columns come back as `Option`, and a
//!   find-one with no match is `DbError::NotFound`, never a default record.
//! - **Scoped lifecycle:** `run_session` guarantees a single disconnect on
//!   every exit path of the work it wraps, panics included.
//!
//! ## Public API
//!
//! - `Client`: The PostgreSQL-backed client (pooled via `sqlx`).
//! - `InMemoryClient`: A process-local client, also used as the test double.
//! - `Lifecycle` / `UserStore`: The traits both clients implement.
//! - `user`: The `User` record, field directives, and query builders.
//! - `run_session` / `SessionError`: Connect, run, and always disconnect.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod client;
pub mod connection;
pub mod error;
pub mod memory;
pub mod session;
pub mod store;
pub mod user;

// Re-export the key components to create a clean, public-facing API.
pub use client::Client;
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use memory::InMemoryClient;
pub use session::{run_session, SessionError};
pub use store::{Lifecycle, UserStore};
pub use user::User;
