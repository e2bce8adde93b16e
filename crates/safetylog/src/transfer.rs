//! JSON export and import of the observation collection.
//!
//! Export writes the whole collection as a pretty-printed array. Import
//! accepts any JSON array and runs every element through [`sanitize`], which
//! defaults or coerces each field on its own, so a partially broken file
//! still yields well-formed records. Anything that is not an array is
//! rejected as a whole.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::observation::{
    is_image_data_url, new_id, now_millis, Observation, Rating, MAX_DESCRIPTION_CHARS,
    MAX_TITLE_CHARS,
};

/// Default file name for exports.
pub const EXPORT_FILE_NAME: &str = "observations.json";

/// Serialize the collection for export.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_json(observations: &[Observation]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(observations)?;
    json.push('\n');
    Ok(json)
}

/// Parse and sanitize an import file.
///
/// # Errors
///
/// Returns [`Error::Import`] if `text` is not JSON or not a JSON array.
pub fn parse_import(text: &str) -> Result<Vec<Observation>> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| Error::import(format!("invalid JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(Error::import("expected a JSON array of observations"));
    };

    let mut seen = HashSet::with_capacity(items.len());
    let observations: Vec<Observation> = items
        .iter()
        .map(|item| sanitize(item, &mut seen))
        .collect();

    debug!("Sanitized {} imported observations", observations.len());
    Ok(observations)
}

/// Build a well-formed record from an arbitrary JSON value.
///
/// `seen` holds ids already assigned in this import; a repeated id is
/// replaced with a fresh one so ids stay unique.
pub fn sanitize(item: &Value, seen: &mut HashSet<String>) -> Observation {
    let field = |name: &str| item.get(name).unwrap_or(&Value::Null);

    let mut id = coerce_id(field("id")).unwrap_or_else(new_id);
    if !seen.insert(id.clone()) {
        warn!("Duplicate observation id {} in import, assigning a new one", id);
        id = new_id();
        seen.insert(id.clone());
    }

    let photo_data_url = match field("photoDataUrl") {
        Value::String(s) if is_image_data_url(s) => Some(s.clone()),
        _ => None,
    };

    Observation {
        id,
        created_at: coerce_timestamp(field("createdAt")).unwrap_or_else(now_millis),
        title: truncate_chars(&coerce_text(field("title")), MAX_TITLE_CHARS),
        description: truncate_chars(&coerce_text(field("description")), MAX_DESCRIPTION_CHARS),
        rating: match field("rating") {
            Value::String(s) if s == "negative" => Rating::Negative,
            _ => Rating::Positive,
        },
        photo_data_url,
    }
}

/// JavaScript-style truthiness, which decides whether a field counts as
/// present in files written by the browser version of the log.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn coerce_id(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn coerce_timestamp(value: &Value) -> Option<i64> {
    if !is_truthy(value) {
        return None;
    }
    let number = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f as i64),
        _ => None,
    };
    if number.is_none() {
        warn!("Unusable createdAt value {}, using the current time", value);
    }
    number
}

fn coerce_text(value: &Value) -> String {
    if !is_truthy(value) {
        return String::new();
    }
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
