use serde_json::Value;
use thiserror::Error;

use crate::MAX_SUGGESTIONS;

/// Soft failure while reading a suggestion payload. Degrades to an empty
/// suggestion list plus a diagnostic transcript entry, never a hard error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestionParseError {
    #[error("payload is not valid JSON: {0}")]
    NotJson(String),
    #[error("payload has no `suggestions` field")]
    MissingField,
    #[error("`suggestions` is not an array")]
    NotAnArray,
}

/// Strips an optional surrounding markdown code fence. The opening fence may
/// carry a language tag; the body starts after its line break.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim()
}

/// Parses a suggestion payload of the form `{"suggestions": ["…", …]}`,
/// optionally wrapped in a code fence. Non-string entries are dropped and at
/// most [`MAX_SUGGESTIONS`] entries are kept.
pub fn parse_suggestions(raw: &str) -> Result<Vec<String>, SuggestionParseError> {
    let body = strip_code_fence(raw);
    let value: Value =
        serde_json::from_str(body).map_err(|err| SuggestionParseError::NotJson(err.to_string()))?;
    let field = value
        .get("suggestions")
        .ok_or(SuggestionParseError::MissingField)?;
    let entries = field.as_array().ok_or(SuggestionParseError::NotAnArray)?;
    Ok(entries
        .iter()
        .filter_map(Value::as_str)
        .map(ToOwned::to_owned)
        .take(MAX_SUGGESTIONS)
        .collect())
}
