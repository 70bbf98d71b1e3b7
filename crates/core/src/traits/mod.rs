//! Collaborator traits for genderize.
//!
//! - `transport`: fetching raw bodies from the remote service
//! - `cache`: the persistent name→gender cache

pub mod cache;
pub mod transport;

pub use cache::*;
pub use transport::*;
