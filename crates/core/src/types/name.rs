use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Gender & Provenance
// =============================================================================

/// Gender inferred for a first name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(format!("unknown gender value: {}", other)),
        }
    }
}

/// Which source produced a [`NameResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Answered by the remote name-gender service.
    FromHttpRequest,
    /// Answered by the persistent cache.
    FromCacheDb,
    /// Answered by the bundled static dictionary.
    FromDictionary,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FromHttpRequest => "from_http_request",
            Self::FromCacheDb => "from_cache_db",
            Self::FromDictionary => "from_dictionary",
        }
    }
}

// =============================================================================
// Query
// =============================================================================

/// A single input name and its position in the original request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameQuery {
    pub name: String,
    pub index: usize,
}

impl NameQuery {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Successful resolution of one name.
///
/// Immutable once constructed; `name` is always the caller's input so
/// results can be correlated with the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameResult {
    name: String,
    gender: Gender,
    provenance: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<u64>,
}

impl NameResult {
    fn new(name: impl Into<String>, gender: Gender, provenance: Provenance) -> Self {
        Self {
            name: name.into(),
            gender,
            provenance,
            probability: None,
            count: None,
        }
    }

    /// Result answered by the remote service.
    pub fn http(name: impl Into<String>, gender: Gender) -> Self {
        Self::new(name, gender, Provenance::FromHttpRequest)
    }

    /// Result answered by the cache.
    pub fn cached(name: impl Into<String>, gender: Gender) -> Self {
        Self::new(name, gender, Provenance::FromCacheDb)
    }

    /// Result answered by the static dictionary.
    pub fn dictionary(name: impl Into<String>, gender: Gender) -> Self {
        Self::new(name, gender, Provenance::FromDictionary)
    }

    /// Attach the service-reported probability.
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = Some(probability);
        self
    }

    /// Attach the service-reported sample count.
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn probability(&self) -> Option<f64> {
        self.probability
    }

    pub fn count(&self) -> Option<u64> {
        self.count
    }

    pub fn from_http_request(&self) -> bool {
        self.provenance == Provenance::FromHttpRequest
    }

    pub fn from_cache_db(&self) -> bool {
        self.provenance == Provenance::FromCacheDb
    }

    pub fn from_dictionary(&self) -> bool {
        self.provenance == Provenance::FromDictionary
    }
}

/// Why a single name could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum NameErrorKind {
    /// The service has no gender data for the name.
    NotFound,
    /// The service attached an error to this entry.
    Rejected(String),
}

/// Per-name failure standing in for a [`NameResult`] inside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameError {
    name: String,
    kind: NameErrorKind,
}

impl NameError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NameErrorKind::NotFound,
        }
    }

    pub fn rejected(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NameErrorKind::Rejected(message.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NameErrorKind {
        &self.kind
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == NameErrorKind::NotFound
    }

    pub fn into_parts(self) -> (String, NameErrorKind) {
        (self.name, self.kind)
    }
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NameErrorKind::NotFound => write!(f, "name not found: {}", self.name),
            NameErrorKind::Rejected(msg) => write!(f, "name rejected: {} ({})", self.name, msg),
        }
    }
}

impl std::error::Error for NameError {}

/// Outcome for one position of a batch.
pub type NameOutcome = std::result::Result<NameResult, NameError>;
