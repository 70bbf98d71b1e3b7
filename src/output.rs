//! One JSON line per resolved name.

use serde::Serialize;

use genderize_core::types::NameOutcome;

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Line<'a> {
    Resolved {
        name: &'a str,
        gender: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        probability: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        count: Option<u64>,
        source: &'static str,
    },
    Unresolved {
        name: &'a str,
        error: String,
    },
}

/// Render an outcome as a single JSON line (without the newline).
pub fn render(outcome: &NameOutcome) -> serde_json::Result<String> {
    let line = match outcome {
        Ok(result) => Line::Resolved {
            name: result.name(),
            gender: result.gender().as_str(),
            probability: result.probability(),
            count: result.count(),
            source: result.provenance().as_str(),
        },
        Err(err) => Line::Unresolved {
            name: err.name(),
            error: err.to_string(),
        },
    };
    serde_json::to_string(&line)
}
