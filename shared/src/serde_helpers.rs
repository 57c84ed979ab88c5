//! Serde helpers for loosely typed backend fields

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Uint(u64),
}

/// Accepts `"1"` or `1` and yields `"1"`.
///
/// The auth backend emits numeric ids while older mock tokens carry them
/// as strings; the console only ever compares them as text.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::Uint(n) => n.to_string(),
    })
}

/// `null` is read as the default value instead of failing.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
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
    fn test_numeric_and_string_ids() {
        let a: Row = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        let b: Row = serde_json::from_str(r#"{"id": "7"}"#).unwrap();
        assert_eq!(a.id, "7");
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_null_list_is_empty() {
        let p: Row = serde_json::from_str(r#"{"id": 1, "tags": null}"#).unwrap();
        assert!(p.tags.is_empty());
    }
}
