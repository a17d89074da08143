use serde_json::{Map, Value};

use crate::engine::error::ExtractError;
use crate::model::artifacts::GeneratedArtifacts;

/// Recover the `{html, css, javascript}` object from raw model output.
///
/// The whole trimmed text is tried first, then the span from the first `{`
/// to the last `}`. Keys that are missing or not strings become empty
/// strings; at least one of the three must carry content.
pub fn parse_artifacts(raw: &str) -> Result<GeneratedArtifacts, ExtractError> {
    let object = locate_object(raw)?;

    let field = |key: &str| -> String {
        object
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let artifacts = GeneratedArtifacts::new(field("html"), field("css"), field("javascript"));

    let has_content = [&artifacts.html, &artifacts.css, &artifacts.javascript]
        .iter()
        .any(|s| !s.trim().is_empty());
    if !has_content {
        tracing::warn!("model response had none of html/css/javascript");
        return Err(ExtractError::Validation {
            raw: raw.to_string(),
        });
    }

    Ok(artifacts)
}

fn locate_object(raw: &str) -> Result<Map<String, Value>, ExtractError> {
    let trimmed = raw.trim();

    let whole_err = match parse_object(trimmed) {
        Ok(object) => return Ok(object),
        Err(e) => e,
    };

    let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) else {
        return Err(ExtractError::Parse {
            raw: raw.to_string(),
            detail: format!("no braces in response ({whole_err})"),
        });
    };

    if start >= end {
        return Err(ExtractError::Parse {
            raw: raw.to_string(),
            detail: "closing brace precedes opening brace".into(),
        });
    }

    tracing::debug!(start, end, "falling back to outer-brace capture");
    parse_object(&trimmed[start..=end]).map_err(|detail| {
        tracing::warn!(%detail, "outer-brace capture did not parse");
        ExtractError::Parse {
            raw: raw.to_string(),
            detail,
        }
    })
}

fn parse_object(text: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, found {}", kind_name(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
