//! Mapping of service response bodies onto per-name outcomes.
//!
//! The service answers a single-name request with one JSON object and an
//! indexed multi-name request with an array. A top-level object carrying
//! only `error` is a failure of the whole request.

use serde::Deserialize;
use serde_json::Value;

use genderize_core::{
    types::{Gender, NameError, NameOutcome, NameResult},
    Error, Result,
};

/// One entry of a service response.
#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    probability: Option<f64>,
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    error: Option<Value>,
}

/// Parse `body` into one outcome per name of the chunk, in chunk order.
///
/// Entries are matched to `names` by position; outcomes always carry the
/// caller's original name rather than the echoed one.
pub fn parse_response<S: AsRef<str>>(body: &str, names: &[S]) -> Result<Vec<NameOutcome>> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        Error::malformed(format!("Response is not JSON ({}): {}", e, truncate(body)))
    })?;

    if let Value::Object(obj) = &value {
        if obj.contains_key("error") && !obj.contains_key("name") {
            return Err(service_error(&obj["error"]));
        }
    }

    match value {
        Value::Object(obj) if obj.contains_key("name") => {
            if names.len() != 1 {
                return Err(Error::malformed(format!(
                    "Single-entry response for a request of {} names",
                    names.len()
                )));
            }
            let name = names[0].as_ref();
            Ok(vec![map_entry(decode_entry(Value::Object(obj), name)?, name)?])
        }
        Value::Array(items) => {
            if items.len() != names.len() {
                return Err(Error::malformed(format!(
                    "Response has {} entries for {} names",
                    items.len(),
                    names.len()
                )));
            }
            items
                .into_iter()
                .zip(names)
                .map(|(item, name)| {
                    if !item.is_object() {
                        return Err(Error::malformed(format!("Entry is not an object: {}", item)));
                    }
                    map_entry(decode_entry(item, name.as_ref())?, name.as_ref())
                })
                .collect()
        }
        other => Err(Error::malformed(format!(
            "Unrecognised response shape: {}",
            truncate(&other.to_string())
        ))),
    }
}

fn decode_entry(item: Value, name: &str) -> Result<Entry> {
    serde_json::from_value(item).map_err(|e| Error::malformed(format!("Entry for {}: {}", name, e)))
}

fn map_entry(entry: Entry, name: &str) -> Result<NameOutcome> {
    if let Some(error) = entry.error {
        return Ok(Err(NameError::rejected(name, error_message(&error))));
    }

    if let Some(echoed) = entry.name.as_deref() {
        if !echoed.trim().eq_ignore_ascii_case(name.trim()) {
            tracing::debug!(name = %name, echoed = %echoed, "Service echoed a different name");
        }
    }

    let gender = match entry.gender.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw
            .parse::<Gender>()
            .map_err(|e| Error::malformed(format!("Entry for {}: {}", name, e)))?,
        _ => return Ok(Err(NameError::not_found(name))),
    };

    let mut result = NameResult::http(name, gender);
    if let Some(probability) = entry.probability {
        result = result.with_probability(probability);
    }
    if let Some(count) = entry.count {
        result = result.with_count(count);
    }
    Ok(Ok(result))
}

/// Classify a top-level service error.
///
/// The service carries no error codes, so the message text decides:
/// anything mentioning an API key is `InvalidApiKey`, anything mentioning
/// a limit is `LimitReached`, the rest is `ResultError`. A message such as
/// "name length limit exceeded" would therefore be read as an exhausted
/// quota.
fn service_error(error: &Value) -> Error {
    let message = error_message(error);
    let lower = message.to_lowercase();

    if lower.contains("api key") || lower.contains("apikey") {
        Error::InvalidApiKey(message)
    } else if lower.contains("limit") {
        Error::LimitReached(message)
    } else {
        Error::result_error(message)
    }
}

fn error_message(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genderize_core::types::NameErrorKind;

    #[test]
    fn test_array_response() {
        let body = r#"[{"name":"kasper","gender":"male","probability":0.96,"count":1536},
                       {"name":"christina","gender":"female"}]"#;
        let outcomes = parse_response(body, &["kasper", "christina"]).unwrap();

        let kasper = outcomes[0].as_ref().unwrap();
        assert_eq!(kasper.name(), "kasper");
        assert_eq!(kasper.gender(), Gender::Male);
        assert!(kasper.from_http_request());
        assert_eq!(kasper.probability(), Some(0.96));
        assert_eq!(kasper.count(), Some(1536));

        let christina = outcomes[1].as_ref().unwrap();
        assert_eq!(christina.gender(), Gender::Female);
        assert_eq!(christina.count(), None);
    }

    #[test]
    fn test_single_object_without_gender_is_not_found() {
        let outcomes = parse_response(r#"{"name":"ksldfjslkjfweuir"}"#, &["ksldfjslkjfweuir"]).unwrap();
        let err = outcomes[0].as_ref().unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.name(), "ksldfjslkjfweuir");

        let outcomes =
            parse_response(r#"{"name":"x","gender":null,"probability":0.0}"#, &["x"]).unwrap();
        assert!(outcomes[0].as_ref().unwrap_err().is_not_found());

        let outcomes = parse_response(r#"{"name":"x","gender":""}"#, &["x"]).unwrap();
        assert!(outcomes[0].as_ref().unwrap_err().is_not_found());
    }

    #[test]
    fn test_outcomes_carry_input_name() {
        let body = r#"[{"name":"kasper","gender":"male"}]"#;
        let outcomes = parse_response(body, &["  Kasper"]).unwrap();
        assert_eq!(outcomes[0].as_ref().unwrap().name(), "  Kasper");
    }

    #[test]
    fn test_top_level_error_is_result_error() {
        let err = parse_response(r#"{"error": "Some error from json"}"#, &["kasper"]).unwrap_err();
        assert!(matches!(err, Error::ResultError(ref m) if m == "Some error from json"));
    }

    #[test]
    fn test_top_level_error_classification() {
        let err = parse_response(r#"{"error":"Invalid API key"}"#, &["a"]).unwrap_err();
        assert!(matches!(err, Error::InvalidApiKey(_)));

        let err = parse_response(r#"{"error":"Request limit reached"}"#, &["a", "b"]).unwrap_err();
        assert!(matches!(err, Error::LimitReached(_)));

        // Classification is by text alone.
        let err = parse_response(r#"{"error":"name length limit exceeded"}"#, &["a"]).unwrap_err();
        assert!(matches!(err, Error::LimitReached(_)));
    }

    #[test]
    fn test_entry_error_is_rejected_name() {
        let body = r#"[{"name":"a","gender":"male"},{"name":"b","error":"invalid name"}]"#;
        let outcomes = parse_response(body, &["a", "b"]).unwrap();
        assert!(outcomes[0].is_ok());
        let err = outcomes[1].as_ref().unwrap_err();
        assert_eq!(err.kind(), &NameErrorKind::Rejected("invalid name".into()));
    }

    #[test]
    fn test_malformed_bodies() {
        assert!(matches!(
            parse_response("<html>busy</html>", &["a"]),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_response(r#"[{"name":"a","gender":"male"}]"#, &["a", "b"]),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_response(r#"{"name":"a","gender":"male"}"#, &["a", "b"]),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(parse_response("42", &["a"]), Err(Error::MalformedResponse(_))));
        assert!(matches!(
            parse_response(r#"{"name":"a","gender":"robot"}"#, &["a"]),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_wrongly_typed_fields_are_malformed() {
        assert!(matches!(
            parse_response(r#"{"name":"a","gender":5}"#, &["a"]),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_response(r#"[{"name":"a","gender":"male","probability":"0.99"}]"#, &["a"]),
            Err(Error::MalformedResponse(ref m)) if m.contains("Entry for a")
        ));
        assert!(matches!(
            parse_response(r#"[{"name":"a","gender":"male"},{"name":"b","count":-1}]"#, &["a", "b"]),
            Err(Error::MalformedResponse(ref m)) if m.contains("Entry for b")
        ));
    }
}
