//! Document rendering.
//!
//! Markers whose identifier is a key of the data map are replaced with the
//! value, or with the `[KEY]` fallback when the value is missing. Markers
//! with no data key are left as they are unless `MissingPolicy::Flag` is
//! requested.

use std::collections::HashMap;

use regex::Captures;
use serde_json::Value;

use super::placeholder::MARKER_PATTERN;
use super::TemplatingError;

/// User data for one rendering pass. `None` and `Some("")` both mean the
/// value is missing.
pub type DataMap = HashMap<String, Option<String>>;

/// What to do with a marker whose identifier is not a key of the data map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// Keep the `{{identifier}}` text in the output.
    #[default]
    LeaveUntouched,
    /// Treat it like a missing value and emit `[IDENTIFIER]`.
    Flag,
}

/// Rendered text plus the identifiers that could not be filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub content: String,
    /// Identifiers rendered as `[IDENTIFIER]`, first-seen order.
    pub fallbacks: Vec<String>,
    /// Identifiers whose markers were left in the output, first-seen order.
    pub untouched: Vec<String>,
}

/// `nome` -> `[NOME]`
pub fn fallback_marker(identifier: &str) -> String {
    format!("[{}]", identifier.to_uppercase())
}

/// Render `template` with `data`, leaving markers without a data key as-is.
pub fn render(template: &str, data: &DataMap) -> String {
    render_with_report(template, data, MissingPolicy::LeaveUntouched).content
}

pub fn render_with_policy(template: &str, data: &DataMap, policy: MissingPolicy) -> String {
    render_with_report(template, data, policy).content
}

/// Render in a single pass over the template's markers.
///
/// Substituted values are never scanned again, so a value that itself looks
/// like a marker is emitted verbatim.
pub fn render_with_report(template: &str, data: &DataMap, policy: MissingPolicy) -> RenderReport {
    let mut fallbacks: Vec<String> = Vec::new();
    let mut untouched: Vec<String> = Vec::new();

    let content = MARKER_PATTERN
        .replace_all(template, |captures: &Captures| {
            let identifier = &captures[1];
            match data.get(identifier) {
                Some(value) => match value.as_deref().filter(|v| !v.is_empty()) {
                    Some(value) => value.to_string(),
                    None => {
                        push_unique(&mut fallbacks, identifier);
                        fallback_marker(identifier)
                    }
                },
                None => match policy {
                    MissingPolicy::LeaveUntouched => {
                        push_unique(&mut untouched, identifier);
                        captures[0].to_string()
                    }
                    MissingPolicy::Flag => {
                        push_unique(&mut fallbacks, identifier);
                        fallback_marker(identifier)
                    }
                },
            }
        })
        .into_owned();

    RenderReport {
        content,
        fallbacks,
        untouched,
    }
}

fn push_unique(list: &mut Vec<String>, identifier: &str) {
    if !list.iter().any(|seen| seen == identifier) {
        list.push(identifier.to_string());
    }
}

/// Convert a JSON request body into a data map.
///
/// `null`, `false`, `""` and `0` count as missing values. `true` and other
/// numbers are stringified. Anything that is not an object of scalars is
/// rejected before rendering starts.
pub fn data_map_from_json(value: &Value) -> Result<DataMap, TemplatingError> {
    let object = value.as_object().ok_or_else(|| {
        TemplatingError::invalid_input(format!(
            "data must be a JSON object, got {}",
            json_kind(value)
        ))
    })?;

    let mut data = DataMap::with_capacity(object.len());
    for (key, value) in object {
        let converted = match value {
            Value::Null | Value::Bool(false) => None,
            Value::Bool(true) => Some("true".to_string()),
            Value::Number(number) if number.as_f64() == Some(0.0) => None,
            Value::Number(number) => Some(number.to_string()),
            Value::String(text) => Some(text.clone()),
            Value::Array(_) | Value::Object(_) => {
                return Err(TemplatingError::invalid_input(format!(
                    "value for '{key}' must be a string, number, boolean or null, got {}",
                    json_kind(value)
                )))
            }
        };
        data.insert(key.clone(), converted);
    }

    Ok(data)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
