use serde::{Deserialize, Serialize};

use super::name::Gender;

/// Normalize a name into its cache key form: trimmed and lowercased.
pub fn cache_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A persisted cache row.
///
/// At most one record exists per normalized name. Rows are only ever
/// inserted, never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Normalized name (unique key).
    pub name: String,
    /// Resolved gender.
    pub gender: Gender,
}

impl CacheRecord {
    pub fn new(name: &str, gender: Gender) -> Self {
        Self {
            name: cache_key(name),
            gender,
        }
    }
}
