//! Invocation-event parameter extraction.
//!
//! The orchestration framework delivers a loosely structured JSON event with
//! no guaranteed schema. Extraction tries several known shapes in priority
//! order; every probe is a pure lookup returning `Option`, so a missing key,
//! wrong index, or wrong type simply means "not found" and the next shape is
//! tried.

use serde_json::Value;
use std::collections::BTreeMap;

/// Parameters extracted from an invocation event, keyed by parameter name.
///
/// A `BTreeMap` keeps the keys sorted, which the cache fingerprint relies on.
pub type SearchParams = BTreeMap<String, Value>;

/// Top-level keys recognized when the event carries parameters flat instead
/// of in a `parameters` array
const FLAT_PARAMETER_KEYS: [&str; 10] = [
    "query",
    "search_depth",
    "topic",
    "days",
    "max_results",
    "include_domains",
    "exclude_domains",
    "include_answer",
    "include_raw_content",
    "include_images",
];

/// Extract the full parameter set from an event (enhanced variant).
///
/// Tries, in order: the structured `parameters` array, the flat top-level
/// allow-list, and finally the legacy single-value query probes. Later
/// duplicates in the `parameters` array overwrite earlier ones.
#[must_use]
pub fn extract_all_parameters(event: &Value) -> SearchParams {
    let mut params = SearchParams::new();

    if let Some(entries) = event.get("parameters").and_then(Value::as_array) {
        for entry in entries {
            let name = entry.get("name").and_then(Value::as_str).unwrap_or("");
            if name.is_empty() {
                continue;
            }
            match entry.get("value") {
                Some(value) if !value.is_null() => {
                    params.insert(name.to_string(), value.clone());
                }
                _ => {}
            }
        }
    }

    if params.is_empty() {
        for key in FLAT_PARAMETER_KEYS {
            if let Some(value) = event.get(key) {
                params.insert(key.to_string(), value.clone());
            }
        }
    }

    if !params.contains_key("query") {
        if let Some(query) = extract_query(event) {
            params.insert("query".to_string(), Value::String(query));
        }
    }

    params
}

/// Legacy single-value query extraction (the simple variant's only path).
///
/// Probes `parameters[0].value`, `inputText`, `query`, `message` in order
/// and returns the first non-empty value, stringified.
#[must_use]
pub fn extract_query(event: &Value) -> Option<String> {
    const PROBES: [fn(&Value) -> Option<&Value>; 4] = [
        first_parameter_value,
        |event| event.get("inputText"),
        |event| event.get("query"),
        |event| event.get("message"),
    ];

    PROBES
        .iter()
        .filter_map(|probe| probe(event))
        .find_map(value_to_nonempty_string)
}

fn first_parameter_value(event: &Value) -> Option<&Value> {
    event.get("parameters")?.get(0)?.get("value")
}

/// Stringify a scalar parameter by name, used when building the provider
/// request and when echoing the query into error payloads
#[must_use]
pub fn param_as_string(params: &SearchParams, key: &str) -> Option<String> {
    match params.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Stringify a scalar value, treating null, empty strings, zero, and `false`
/// as absent
fn value_to_nonempty_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => {
            if n.as_f64() == Some(0.0) {
                None
            } else {
                Some(n.to_string())
            }
        }
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}
