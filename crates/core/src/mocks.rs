//! Mock implementations of core traits for testing.
//!
//! These stand in for the remote service and the cache store so the
//! resolution engine can be exercised without network or disk access.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::{
    traits::{NameCache, Transport},
    types::{cache_key, CacheRecord, Gender},
    Error, Result,
};

// =============================================================================
// Mock Transport
// =============================================================================

type Responder = Box<dyn Fn(&str) -> Result<String> + Send + Sync>;

enum Script {
    Queue(Mutex<VecDeque<Result<String>>>),
    Responder(Responder),
}

/// Scripted transport that records every requested URL.
pub struct MockTransport {
    script: Script,
    urls: Mutex<Vec<String>>,
}

impl MockTransport {
    /// Create a transport answering with the given bodies, one per call.
    pub fn new(bodies: Vec<String>) -> Self {
        Self::scripted(bodies.into_iter().map(Ok).collect())
    }

    /// Create a transport answering with the given results, one per call.
    pub fn scripted(responses: Vec<Result<String>>) -> Self {
        Self {
            script: Script::Queue(Mutex::new(responses.into())),
            urls: Mutex::new(Vec::new()),
        }
    }

    /// Create a transport that always returns the same body.
    pub fn constant(body: &str) -> Self {
        let body = body.to_string();
        Self::responder(move |_| Ok(body.clone()))
    }

    /// Create a transport that computes each response from the URL.
    pub fn responder<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            script: Script::Responder(Box::new(f)),
            urls: Mutex::new(Vec::new()),
        }
    }

    /// URLs requested so far, in order.
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    /// Get the number of calls made to this mock.
    pub fn call_count(&self) -> usize {
        self.urls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.urls.lock().unwrap().push(url.to_string());
        match &self.script {
            Script::Queue(queue) => queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::transport("no scripted response left"))),
            Script::Responder(f) => f(url),
        }
    }
}

// =============================================================================
// Mock Name Cache
// =============================================================================

/// In-memory cache mock that counts reads and writes.
#[derive(Default)]
pub struct MockNameCache {
    rows: Mutex<HashMap<String, Gender>>,
    reads: Mutex<Vec<String>>,
    writes: Mutex<Vec<String>>,
}

impl MockNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the cache with rows.
    pub fn with_rows(rows: Vec<(&str, Gender)>) -> Self {
        let cache = Self::new();
        {
            let mut map = cache.rows.lock().unwrap();
            for (name, gender) in rows {
                map.insert(cache_key(name), gender);
            }
        }
        cache
    }

    /// Names passed to `get`, in order.
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }

    /// Names passed to `put`, in order, including rejected duplicates.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl NameCache for MockNameCache {
    async fn get(&self, name: &str) -> Result<Option<CacheRecord>> {
        self.reads.lock().unwrap().push(name.to_string());
        let key = cache_key(name);
        Ok(self.rows.lock().unwrap().get(&key).map(|gender| CacheRecord {
            name: key.clone(),
            gender: *gender,
        }))
    }

    async fn put(&self, name: &str, gender: Gender) -> Result<()> {
        self.writes.lock().unwrap().push(name.to_string());
        let key = cache_key(name);
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&key) {
            return Err(Error::DuplicateKey(key));
        }
        rows.insert(key, gender);
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.rows.lock().unwrap().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_queue_and_record() {
        let transport = MockTransport::new(vec!["a".into(), "b".into()]);
        assert_eq!(transport.fetch("u1").await.unwrap(), "a");
        assert_eq!(transport.fetch("u2").await.unwrap(), "b");
        assert!(matches!(transport.fetch("u3").await, Err(Error::Transport(_))));
        assert_eq!(transport.urls(), vec!["u1", "u2", "u3"]);
    }

    #[tokio::test]
    async fn test_mock_cache_rejects_duplicates() {
        let cache = MockNameCache::with_rows(vec![("Kasper", Gender::Male)]);
        assert!(cache.get("kasper").await.unwrap().is_some());
        assert!(matches!(
            cache.put("KASPER", Gender::Male).await,
            Err(Error::DuplicateKey(_))
        ));
        cache.put("christina", Gender::Female).await.unwrap();
        assert_eq!(cache.len().await.unwrap(), 2);
        assert_eq!(cache.writes(), vec!["KASPER", "christina"]);
    }
}
