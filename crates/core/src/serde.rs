//! Serde helper functions for admin request bodies.
//!
//! The admin screens post whatever their inputs hold, so empty strings mean
//! "no value" and flags may arrive as strings or numbers.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserialize a patch field.
///
/// Used with `#[serde(default)]`: an absent field stays `None` (keep the
/// stored value), `null` or an empty string becomes `Some(None)` (clear it),
/// anything else becomes `Some(Some(value))`.
pub fn deserialize_patch_string<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(Some(s.filter(|s| !s.trim().is_empty())))
}

/// Deserialize a flag the way a loosely typed form would coerce it.
///
/// `true`, non-zero numbers and non-empty strings other than `"false"`/`"0"`
/// are true; everything else, including `null`, is false.
pub fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "false" && s != "0",
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    })
}
