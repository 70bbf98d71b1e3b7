//! Request chunking and URL rendering.

use std::ops::Range;

use genderize_core::{
    config::{DEFAULT_MAX_NAMES_PER_REQUEST, DEFAULT_MAX_URL_LENGTH},
    Error, Result,
};
use url::form_urlencoded::byte_serialize;

/// One rendered request covering a consecutive slice of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestChunk {
    /// Fully rendered request URL.
    pub url: String,
    /// Position of the first covered name in the batched input.
    pub start: usize,
    /// Number of names covered.
    pub len: usize,
}

impl RequestChunk {
    /// Input positions covered by this chunk.
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// Splits name lists into request URLs the service accepts.
///
/// Chunks hold at most `max_names` names and are closed early when the
/// next name would push the URL past `max_url_length`. A single name is
/// never split, so one oversized name still gets its own request.
#[derive(Debug, Clone)]
pub struct UrlBatcher {
    endpoint: String,
    max_names: usize,
    max_url_length: usize,
}

impl UrlBatcher {
    /// Create a batcher for the given service endpoint.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        let parsed = url::Url::parse(&endpoint)
            .map_err(|e| Error::Config(format!("Invalid service endpoint {}: {}", endpoint, e)))?;
        if parsed.query().is_some() {
            return Err(Error::Config(format!(
                "Service endpoint must not carry a query string: {}",
                endpoint
            )));
        }

        Ok(Self {
            endpoint,
            max_names: DEFAULT_MAX_NAMES_PER_REQUEST,
            max_url_length: DEFAULT_MAX_URL_LENGTH,
        })
    }

    /// Set the per-request name limit (at least one).
    pub fn with_max_names(mut self, max_names: usize) -> Self {
        self.max_names = max_names.max(1);
        self
    }

    /// Set the URL length limit.
    pub fn with_max_url_length(mut self, max_url_length: usize) -> Self {
        self.max_url_length = max_url_length;
        self
    }

    pub fn max_names(&self) -> usize {
        self.max_names
    }

    /// Partition `names` into consecutive chunks and render one URL each.
    ///
    /// Chunk order and in-chunk parameter order follow the input order.
    pub fn batch<S: AsRef<str>>(&self, names: &[S], api_key: Option<&str>) -> Vec<RequestChunk> {
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < names.len() {
            let mut end = start + 1;
            while end < names.len() && end - start < self.max_names {
                if self.render(&names[start..=end], api_key).len() > self.max_url_length {
                    break;
                }
                end += 1;
            }

            chunks.push(RequestChunk {
                url: self.render(&names[start..end], api_key),
                start,
                len: end - start,
            });
            start = end;
        }

        tracing::debug!(
            names = names.len(),
            chunks = chunks.len(),
            with_key = api_key.is_some(),
            "Batched names into requests"
        );
        chunks
    }

    /// Render one request URL.
    ///
    /// One name uses `name=<n>`; several use indexed `name[i]=<n>`.
    fn render<S: AsRef<str>>(&self, names: &[S], api_key: Option<&str>) -> String {
        let mut url = self.endpoint.clone();
        let mut sep = '?';

        if let [single] = names {
            url.push(sep);
            url.push_str("name=");
            url.push_str(&encode(single.as_ref()));
            sep = '&';
        } else {
            for (i, name) in names.iter().enumerate() {
                url.push(sep);
                url.push_str(&format!("name[{}]=", i));
                url.push_str(&encode(name.as_ref()));
                sep = '&';
            }
        }

        if let Some(key) = api_key {
            url.push(sep);
            url.push_str("apikey=");
            url.push_str(&encode(key));
        }
        url
    }
}

fn encode(value: &str) -> String {
    byte_serialize(value.trim().as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batcher() -> UrlBatcher {
        UrlBatcher::new("https://api.genderize.io/").unwrap()
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("name{}", i)).collect()
    }

    #[test]
    fn test_chunk_count_and_slices() {
        let input = names(25);
        let chunks = batcher().batch(&input, None);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].range(), 0..10);
        assert_eq!(chunks[1].range(), 10..20);
        assert_eq!(chunks[2].range(), 20..25);
    }

    #[test]
    fn test_chunk_count_is_ceiling() {
        for (n, k) in [(1, 10), (10, 10), (11, 10), (7, 3), (9, 3), (0, 4)] {
            let chunks = batcher().with_max_names(k).batch(&names(n), None);
            assert_eq!(chunks.len(), n.div_ceil(k), "n={} k={}", n, k);
            let covered: usize = chunks.iter().map(|c| c.len).sum();
            assert_eq!(covered, n);
        }
    }

    #[test]
    fn test_multi_name_url_shape() {
        let chunks = batcher().batch(&["kasper", "christina"], None);
        assert_eq!(
            chunks[0].url,
            "https://api.genderize.io/?name[0]=kasper&name[1]=christina"
        );
    }

    #[test]
    fn test_single_name_url_shape() {
        let chunks = batcher().batch(&["kasper"], Some("1234"));
        assert_eq!(chunks[0].url, "https://api.genderize.io/?name=kasper&apikey=1234");
    }

    #[test]
    fn test_api_key_on_every_chunk() {
        let input = names(25);
        for chunk in batcher().batch(&input, Some("1234")) {
            assert!(chunk.url.ends_with("&apikey=1234"), "{}", chunk.url);
        }
        for chunk in batcher().batch(&input, None) {
            assert!(!chunk.url.contains("apikey="));
            assert!(chunk.url.contains("?name[0]="));
        }
    }

    #[test]
    fn test_values_are_encoded() {
        let chunks = batcher().batch(&["Anne Marie", "Zoë"], None);
        assert_eq!(
            chunks[0].url,
            "https://api.genderize.io/?name[0]=Anne+Marie&name[1]=Zo%C3%AB"
        );
    }

    #[test]
    fn test_url_length_closes_chunk_early() {
        let long = "x".repeat(40);
        let input = vec![long.clone(), long.clone(), long.clone()];
        let base = "https://api.genderize.io/".len();
        // Room for two indexed params but not three.
        let limit = base + 2 * (10 + 40) + 1;
        let chunks = batcher().with_max_url_length(limit).batch(&input, None);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].range(), 0..2);
        assert_eq!(chunks[1].range(), 2..3);
        assert!(chunks[0].url.len() <= limit);
    }

    #[test]
    fn test_oversized_name_gets_own_chunk() {
        let huge = "y".repeat(500);
        let chunks = batcher()
            .with_max_url_length(100)
            .batch(&[huge.as_str(), "kasper"], None);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].url, "https://api.genderize.io/?name=kasper");
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        assert!(UrlBatcher::new("not a url").is_err());
        assert!(UrlBatcher::new("https://api.genderize.io/?x=1").is_err());
    }
}
