//! Relational store connection pool.
//!
//! The serving core treats the relational store purely as an external
//! collaborator for auth and session state (§1 Non-goals); this crate
//! only manages the connection pool lifecycle described in §5.

pub mod pool;

pub use pool::{DbError, DbPool, DbResult, RelationalStoreConfig};
