use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CacheRecord, Gender};

/// Insert-only persistent cache of resolved names.
///
/// Names are normalized with [`crate::types::cache_key`] on both read
/// and write.
#[async_trait]
pub trait NameCache: Send + Sync {
    /// Look up a name. Absence is not an error.
    async fn get(&self, name: &str) -> Result<Option<CacheRecord>>;

    /// Insert a new row.
    ///
    /// Fails with `Error::DuplicateKey` when the normalized name is already
    /// present; implementations must not swallow that case.
    async fn put(&self, name: &str, gender: Gender) -> Result<()>;

    /// Number of stored rows.
    async fn len(&self) -> Result<usize>;

    /// Check if the cache holds no rows.
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}
