//! JSON parsing that refuses repeated object keys
//!
//! `serde_json::Value` keeps the last value of a repeated key. Update
//! documents are a trust boundary: a repeated `hashes` or `fileUrls` key would
//! let one reader see a different digest or URL than another, so any object
//! that names a key twice fails the whole parse.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Parse a JSON text into a [`Value`], rejecting repeated object keys
pub fn from_str_unique(text: &str) -> serde_json::Result<Value> {
    serde_json::from_str::<UniqueKeys>(text).map(|parsed| parsed.0)
}

struct UniqueKeys(Value);

impl<'de> Deserialize<'de> for UniqueKeys {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(UniqueKeysVisitor).map(UniqueKeys)
    }
}

struct UniqueKeysVisitor;

impl<'de> Visitor<'de> for UniqueKeysVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E>
    where
        E: de::Error,
    {
        Number::from_f64(v)
            .map(Value::Number)
            .ok_or_else(|| de::Error::custom("non-finite number"))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some(UniqueKeys(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = Map::new();

        // Keys are compared after escape decoding
        while let Some(key) = access.next_key::<String>()? {
            if map.contains_key(&key) {
                return Err(de::Error::custom(format!("duplicate key '{key}'")));
            }
            let UniqueKeys(value) = access.next_value()?;
            map.insert(key, value);
        }

        Ok(Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_like_serde_json() {
        let text = r#"{"b": [1, -2, 3.5, "x", null, true], "a": {"c": {}}}"#;
        let value = from_str_unique(text).unwrap();
        assert_eq!(value, serde_json::from_str::<Value>(text).unwrap());

        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_rejects_repeated_key() {
        let err = from_str_unique(r#"{"sha256": "GOOD", "sha256": "EVIL"}"#).unwrap_err();
        assert!(err.to_string().contains("duplicate key 'sha256'"));
    }

    #[test]
    fn test_rejects_repeated_key_in_nested_object() {
        let text = r#"{"files": [{"a": 1}, {"x": 1, "y": 2, "x": 3}]}"#;
        assert!(from_str_unique(text).is_err());
    }

    #[test]
    fn test_repeated_key_detected_after_escape_decoding() {
        assert!(from_str_unique(r#"{"a": 1, "\u0061": 2}"#).is_err());
    }

    #[test]
    fn test_same_key_in_sibling_objects_is_allowed() {
        let value = from_str_unique(r#"{"x": {"k": 1}, "y": {"k": 2}}"#).unwrap();
        assert_eq!(value, json!({ "x": { "k": 1 }, "y": { "k": 2 } }));
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        assert!(from_str_unique("{} {}").is_err());
    }
}
