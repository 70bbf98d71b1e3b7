//! In-memory name cache implementation using DashMap.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use genderize_core::{
    traits::NameCache,
    types::{cache_key, CacheRecord, Gender},
    Error, Result,
};

/// In-memory name cache using DashMap for concurrent access.
///
/// Rows live as long as the value; useful when no persistent path is
/// configured and in tests.
#[derive(Debug, Default)]
pub struct InMemoryNameCache {
    rows: DashMap<String, Gender>,
}

impl InMemoryNameCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    /// Get the number of cached names.
    pub fn size(&self) -> usize {
        self.rows.len()
    }
}

#[async_trait]
impl NameCache for InMemoryNameCache {
    async fn get(&self, name: &str) -> Result<Option<CacheRecord>> {
        let key = cache_key(name);
        Ok(self.rows.get(&key).map(|gender| CacheRecord {
            name: key.clone(),
            gender: *gender,
        }))
    }

    async fn put(&self, name: &str, gender: Gender) -> Result<()> {
        match self.rows.entry(cache_key(name)) {
            Entry::Occupied(entry) => Err(Error::DuplicateKey(entry.key().clone())),
            Entry::Vacant(entry) => {
                tracing::debug!(name = %entry.key(), gender = %gender, "Name cached");
                entry.insert(gender);
                Ok(())
            }
        }
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get_normalized() {
        let cache = InMemoryNameCache::new();
        cache.put("Kasper", Gender::Male).await.unwrap();

        let record = cache.get("  KASPER ").await.unwrap().unwrap();
        assert_eq!(record.name, "kasper");
        assert_eq!(record.gender, Gender::Male);
        assert!(cache.get("christina").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_fails() {
        let cache = InMemoryNameCache::new();
        cache.put("kasper", Gender::Male).await.unwrap();

        let err = cache.put("Kasper", Gender::Male).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(ref key) if key == "kasper"));
        assert_eq!(cache.size(), 1);
    }
}
