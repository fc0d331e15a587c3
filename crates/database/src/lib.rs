//! # Catalog Database Crate
//!
//! This crate is the data-access layer of the library catalog. It owns the single
//! PostgreSQL connection and is the only place that speaks SQL.
//!
//! ## Architectural Principles
//!
//! - **Typed surface:** callers pick a table from the closed `Table` set and pass
//!   typed records, patches and conditions; identifiers are never taken from raw input.
//! - **One transaction per call:** every operation commits on success and rolls back on
//!   failure, so an error never leaves the store unusable.
//! - **No presentation:** operations return `Outcome`s, rows or `DbError`s. Turning
//!   them into messages is the caller's job.
//!
//! ## Public API
//!
//! - `CatalogStore`: connection owner with schema bootstrap, CRUD, data generation
//!   and the advanced search.
//! - `connect`: opens the connection from `DatabaseSettings`.
//! - `Outcome`: what a successful write did.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod generator;
pub mod outcome;
pub mod query;
pub mod repository;
pub mod schema;
pub mod search;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_options};
pub use error::DbError;
pub use outcome::Outcome;
pub use repository::CatalogStore;
