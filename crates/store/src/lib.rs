#![deny(unused)]
//! Name cache stores for genderize.
//!
//! Provides the insert-only cache that lets the resolver skip names it
//! has already resolved: an in-memory store scoped to the process and a
//! SQLite store that persists across runs.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryNameCache;
pub use sqlite::SqliteNameCache;
