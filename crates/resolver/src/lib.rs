#![deny(unused)]
//! Batch name resolution for genderize.
//!
//! This crate provides:
//! - The static name dictionary
//! - The batch resolution engine (dictionary → cache → remote service)
//! - A builder wiring the engine from configuration

pub mod builder;
pub mod dictionary;
pub mod engine;

pub use builder::ResolverBuilder;
pub use dictionary::Dictionary;
pub use engine::Resolver;
