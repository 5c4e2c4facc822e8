//! Structured output parsing — locates and validates the JSON object inside
//! raw model text.
//!
//! Models wrap payloads in code fences, preface them with prose, or append
//! commentary. The contract here: strip any fences, find the first
//! top-level balanced `{...}` span (string- and escape-aware), parse it,
//! and check required top-level fields. Extraction treats failures as
//! terminal; analysis substitutes a default result instead.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("no JSON object found in model output")]
    NoJsonObject,

    #[error("unbalanced JSON object in model output")]
    Unbalanced,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("schema mismatch: {0}")]
    Schema(String),
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Returns the first top-level balanced `{...}` span. Braces inside string
/// literals and escaped quotes do not count toward nesting.
pub fn find_json_object(text: &str) -> Result<&str, ParseError> {
    let start = text.find('{').ok_or(ParseError::NoJsonObject)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    Err(ParseError::Unbalanced)
}

/// Fence-strip, locate, and parse the JSON payload in raw model text.
pub fn extract_json_object(text: &str) -> Result<Value, ParseError> {
    let span = find_json_object(strip_fences(text))?;
    serde_json::from_str(span).map_err(|e| ParseError::InvalidJson(e.to_string()))
}

/// As `extract_json_object`, but also requires the named top-level fields
/// to be present and non-null.
pub fn parse_with_required(text: &str, required: &[&str]) -> Result<Value, ParseError> {
    let value = extract_json_object(text)?;
    for field in required {
        match value.get(field) {
            Some(v) if !v.is_null() => {}
            _ => return Err(ParseError::MissingField((*field).to_string())),
        }
    }
    Ok(value)
}

/// Full pipeline into a typed record.
pub fn parse_as<T: DeserializeOwned>(text: &str, required: &[&str]) -> Result<T, ParseError> {
    let value = parse_with_required(text, required)?;
    serde_json::from_value(value).map_err(|e| ParseError::Schema(e.to_string()))
}
