//! Static name→gender dictionary.
//!
//! Keys follow the data file's casing convention: first letter uppercase,
//! the rest lowercase. Lookups are folded to the same convention.

use std::collections::HashMap;
use std::path::Path;

use genderize_core::{types::Gender, Error, Result};

const BUNDLED: &str = include_str!("../data/names.json");

/// Immutable name→gender mapping, loaded once per resolver.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    names: HashMap<String, Gender>,
}

impl Dictionary {
    /// Parse the data file shipped with this crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED)
    }

    /// Read and parse a dictionary file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::dictionary(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse a JSON object of name → `"male"`/`"female"`.
    ///
    /// Entries with any other value are skipped.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(json)
            .map_err(|e| Error::dictionary(format!("Failed to parse dictionary: {}", e)))?;

        let mut names = HashMap::with_capacity(raw.len());
        for (name, value) in raw {
            match value.parse::<Gender>() {
                Ok(gender) => {
                    names.insert(normalize(&name), gender);
                }
                Err(_) => tracing::debug!(name = %name, value = %value, "Skipping dictionary entry"),
            }
        }

        tracing::debug!(entries = names.len(), "Dictionary loaded");
        Ok(Self { names })
    }

    /// Gender for `name`, if the dictionary knows it.
    pub fn lookup(&self, name: &str) -> Option<Gender> {
        self.names.get(&normalize(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Trim and capitalize: `"  kASPER "` → `"Kasper"`.
fn normalize(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
