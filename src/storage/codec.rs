//! Snapshot import/export
//!
//! A snapshot is the whole horse collection as a JSON array. Export is
//! pretty-printed. Import parses the text fully before anything touches the
//! in-memory pedigree, so a bad file never leaves it half replaced.

use serde_json::Value;
use thiserror::Error;

use crate::domain::Horse;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid snapshot format: {0}")]
    InvalidFormat(String),
}

/// Serializes horses as a pretty-printed JSON array
pub fn export(horses: &[Horse]) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(horses)?)
}

/// Parses a JSON array of horses
///
/// Malformed JSON is a [`CodecError::Parse`]; valid JSON that is not an
/// array of horse records is a [`CodecError::InvalidFormat`].
pub fn import(text: &str) -> Result<Vec<Horse>, CodecError> {
    let value: Value = serde_json::from_str(text)?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(CodecError::InvalidFormat(format!(
                "expected an array of horses, found {}",
                kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(pos, item)| {
            serde_json::from_value(item)
                .map_err(|e| CodecError::InvalidFormat(format!("entry {}: {}", pos, e)))
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
