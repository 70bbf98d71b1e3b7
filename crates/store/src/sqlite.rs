//! SQLite-backed name cache.

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use genderize_core::{
    traits::NameCache,
    types::{cache_key, CacheRecord, Gender},
    Error, Result,
};

/// SQLite-backed name cache persisting resolved names across runs.
///
/// The connection is held for the lifetime of the value. Separate
/// processes writing the same file must serialize their writes.
pub struct SqliteNameCache {
    conn: Arc<tokio::sync::Mutex<Connection>>,
}

impl SqliteNameCache {
    /// Open (or create) a cache database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| Error::storage(format!("DB error: {}", e)))?;
        tracing::debug!(path = %path.as_ref().display(), "Opened name cache database");
        Self::with_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::storage(format!("DB error: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS name_gender_cache (
                name TEXT PRIMARY KEY,
                gender TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            [],
        )
        .map_err(|e| Error::storage(format!("Schema error: {}", e)))?;

        Ok(Self {
            conn: Arc::new(tokio::sync::Mutex::new(conn)),
        })
    }

    fn current_timestamp() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

#[async_trait]
impl NameCache for SqliteNameCache {
    async fn get(&self, name: &str) -> Result<Option<CacheRecord>> {
        let conn = self.conn.clone();
        let key = cache_key(name);

        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let gender: Option<String> = conn
                .query_row(
                    "SELECT gender FROM name_gender_cache WHERE name = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| Error::storage(format!("Query error: {}", e)))?;

            match gender {
                Some(raw) => {
                    let gender = raw.parse::<Gender>().map_err(|e| {
                        Error::storage(format!("Corrupt cache row for {}: {}", key, e))
                    })?;
                    Ok(Some(CacheRecord { name: key, gender }))
                }
                None => Ok(None),
            }
        })
        .await
        .map_err(|e| Error::internal(e.to_string()))?
    }

    async fn put(&self, name: &str, gender: Gender) -> Result<()> {
        let conn = self.conn.clone();
        let key = cache_key(name);

        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let inserted = conn.execute(
                "INSERT INTO name_gender_cache (name, gender, created_at) VALUES (?1, ?2, ?3)",
                params![key, gender.as_str(), Self::current_timestamp()],
            );

            match inserted {
                Ok(_) => {
                    tracing::debug!(name = %key, gender = %gender, "Name cached");
                    Ok(())
                }
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    Err(Error::DuplicateKey(key))
                }
                Err(e) => Err(Error::storage(format!("Insert error: {}", e))),
            }
        })
        .await
        .map_err(|e| Error::internal(e.to_string()))?
    }

    async fn len(&self) -> Result<usize> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM name_gender_cache", [], |row| row.get(0))
                .map_err(|e| Error::storage(format!("Count error: {}", e)))?;
            Ok(count as usize)
        })
        .await
        .map_err(|e| Error::internal(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_sqlite_name_cache() {
        let temp_file = NamedTempFile::new().unwrap();
        let cache = SqliteNameCache::open(temp_file.path()).unwrap();

        assert!(cache.is_empty().await.unwrap());
        cache.put("kasper", Gender::Male).await.unwrap();
        assert_eq!(cache.len().await.unwrap(), 1);

        let record = cache.get("Kasper").await.unwrap().unwrap();
        assert_eq!(record.name, "kasper");
        assert_eq!(record.gender, Gender::Male);
        assert!(cache.get("christina").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_surfaced() {
        let cache = SqliteNameCache::open_in_memory().unwrap();
        cache.put("kasper", Gender::Male).await.unwrap();

        let err = cache.put("KASPER ", Gender::Female).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(ref key) if key == "kasper"));

        // The original row is untouched.
        let record = cache.get("kasper").await.unwrap().unwrap();
        assert_eq!(record.gender, Gender::Male);
    }

    #[tokio::test]
    async fn test_rows_survive_reopen() {
        let temp_file = NamedTempFile::new().unwrap();
        {
            let cache = SqliteNameCache::open(temp_file.path()).unwrap();
            cache.put("christina", Gender::Female).await.unwrap();
        }

        let cache = SqliteNameCache::open(temp_file.path()).unwrap();
        let record = cache.get("christina").await.unwrap().unwrap();
        assert_eq!(record.gender, Gender::Female);
    }
}
