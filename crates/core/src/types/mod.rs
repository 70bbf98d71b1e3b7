//! Core type definitions for genderize.
//!
//! Broken down into submodules: name lookups and their outcomes, and
//! persisted cache rows.

pub mod cache;
pub mod name;

pub use cache::*;
pub use name::*;
