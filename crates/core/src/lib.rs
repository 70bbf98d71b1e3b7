#![deny(unused)]
//! Core types, traits, and error definitions for genderize.
//!
//! This crate provides the building blocks shared by the cache store,
//! the remote service gateway and the resolution engine.

pub mod config;
pub mod error;
pub mod mocks;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::*;
pub use types::*;
