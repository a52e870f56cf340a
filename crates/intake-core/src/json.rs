//! JSON extraction from model responses that may carry markdown or chatter.

use serde_json::Value;

use crate::error::ServiceError;

/// Extract a JSON value from a model response.
///
/// Tries, in order: the whole (trimmed) string, the body of a markdown code
/// fence, and the first balanced `{...}` object found in the text.
pub fn extract_json(response: &str) -> Result<Value, ServiceError> {
    let trimmed = response.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    if let Some(body) = fenced_block(trimmed) {
        let candidate = match body.find('{') {
            Some(start) => extract_balanced_json(&body[start..]),
            None => body,
        };
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            return Ok(value);
        }
    }

    if let Some(start) = trimmed.find('{') {
        let candidate = extract_balanced_json(&trimmed[start..]);
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            return Ok(value);
        }
    }

    Err(ServiceError::InvalidResponse(format!(
        "no valid JSON found in response: {}",
        response
    )))
}

/// Body of the first markdown code fence, with any language tag removed.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_backticks = &text[start + 3..];
    // Skip optional language identifier
    let body_start = match after_backticks.find('\n') {
        Some(newline) if !after_backticks[..newline].contains('{') => newline + 1,
        _ => 0,
    };
    let body = &after_backticks[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Extract a balanced JSON object from a string that starts with '{'.
///
/// Handles responses with trailing characters after the object, such as
/// extra closing braces: `{"a": 1}}}` -> `{"a": 1}`.
pub fn extract_balanced_json(s: &str) -> &str {
    if !s.starts_with('{') {
        return s;
    }

    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => {
                escape_next = true;
            }
            '"' => {
                in_string = !in_string;
            }
            '{' if !in_string => {
                depth += 1;
            }
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return &s[..=i];
                }
            }
            _ => {}
        }
    }

    s
}
