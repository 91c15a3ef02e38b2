/*!
 * Model response parsing and validation.
 *
 * Generative output is untrusted text: it may wrap the JSON array in prose
 * or code fences, drop scenes, or emit structurally broken entries. This
 * module is the sole schema-enforcement point between that text and the
 * typed pipeline. Individually malformed entries are dropped with a warning
 * rather than failing the batch, since a single bad element is common with
 * generative output and partial results beat total failure.
 */

use log::warn;
use serde_json::Value;

use super::{MediaSuggestion, MediaType, SceneAnalysis};
use crate::errors::ModelResponseError;

/// Parser for the model's free-form text response
#[derive(Debug, Clone, Default)]
pub struct ResponseParser;

impl ResponseParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Extract and validate the scene analyses from raw model text.
    ///
    /// Fails with `ModelResponseError` when no array-shaped substring is
    /// found, the array does not parse, or zero entries survive validation.
    pub fn parse(&self, raw: &str) -> Result<Vec<SceneAnalysis>, ModelResponseError> {
        let array_text = extract_json_array(raw).ok_or(ModelResponseError::NoJsonArray)?;

        let entries: Vec<Value> = serde_json::from_str(array_text)
            .map_err(|e| ModelResponseError::ParseError(e.to_string()))?;

        let total = entries.len();
        let mut analyses = Vec::with_capacity(total);

        for (idx, entry) in entries.into_iter().enumerate() {
            match validate_entry(&entry) {
                Ok(analysis) => analyses.push(analysis),
                Err(reason) => {
                    warn!("Dropping model response entry {}: {}", idx + 1, reason);
                }
            }
        }

        if analyses.is_empty() {
            return Err(ModelResponseError::NoValidEntries { dropped: total });
        }

        Ok(analyses)
    }
}

/// Locate the first balanced JSON array substring in free-form text.
///
/// Tracks string and escape state so brackets inside string values do not
/// unbalance the scan. Surrounding prose and code fences fall away naturally
/// since the scan starts at the first `[` and stops at its matching `]`.
fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;

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
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Validate one entry of the model's array against the per-scene schema.
///
/// Returns a human-readable rejection reason on failure, used for the
/// dropped-entry warning.
fn validate_entry(entry: &Value) -> Result<SceneAnalysis, String> {
    let obj = entry.as_object().ok_or("entry is not an object")?;

    let scene_order = obj
        .get("scene_order")
        .and_then(Value::as_u64)
        .filter(|&n| n >= 1 && n <= u32::MAX as u64)
        .ok_or("missing or invalid 'scene_order'")? as u32;

    let scene_type = non_empty_str(obj.get("scene_type")).ok_or("missing 'scene_type'")?;
    let scene_phrase = non_empty_str(obj.get("scene_phrase")).ok_or("missing 'scene_phrase'")?;

    let keywords = obj
        .get("keywords")
        .and_then(Value::as_array)
        .ok_or("missing 'keywords' array")?
        .iter()
        .map(|k| non_empty_str(Some(k)).ok_or("empty keyword"))
        .collect::<Result<Vec<_>, _>>()?;

    if keywords.is_empty() {
        return Err("'keywords' array is empty".to_string());
    }

    let media_suggestions = obj
        .get("mediaSuggestions")
        .and_then(Value::as_array)
        .ok_or("missing 'mediaSuggestions' array")?
        .iter()
        .map(validate_suggestion)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SceneAnalysis {
        scene_order,
        scene_type,
        scene_phrase,
        keywords,
        media_suggestions,
    })
}

/// Validate one media suggestion object
fn validate_suggestion(value: &Value) -> Result<MediaSuggestion, String> {
    let obj = value.as_object().ok_or("suggestion is not an object")?;

    let type_str = non_empty_str(obj.get("type")).ok_or("suggestion missing 'type'")?;
    let media_type = MediaType::parse(&type_str)
        .ok_or_else(|| format!("unknown media type '{}'", type_str))?;

    let style = non_empty_str(obj.get("style")).ok_or("suggestion missing 'style'")?;
    let search_query =
        non_empty_str(obj.get("searchQuery")).ok_or("suggestion missing 'searchQuery'")?;

    Ok(MediaSuggestion {
        media_type,
        style,
        search_query,
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
