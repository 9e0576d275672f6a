//! Lenient deserializers for server payloads.
//!
//! The admin server writes whatever its database row holds, so identifiers
//! arrive as numbers or strings and optional columns arrive as `null`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

/// Accepts `42` or `"42"` and yields `"42"`.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Int(i) => i.to_string(),
        StringOrNumber::Float(f) => f.to_string(),
    })
}

/// Treats `null` like a missing field and falls back to `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "string_or_number")]
        id: String,
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
    }

    #[test]
    fn numeric_ids_become_strings() {
        let row: Row = serde_json::from_str(r#"{"id": 42, "tags": null}"#).unwrap();
        assert_eq!(row.id, "42");
        assert!(row.tags.is_empty());
    }

    #[test]
    fn string_ids_pass_through() {
        let row: Row = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(row.id, "abc");
    }
}
