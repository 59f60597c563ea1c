//! JSON encoding used for objects stored under hash fields.
//!
//! Two write encodings exist and both decode through the same reader:
//!
//! ```text
//! text:  serde_json::to_string  -> stored as a UTF-8 string
//! bytes: serde_json::to_vec     -> stored as raw UTF-8 bytes
//! ```
//!
//! On the wire both are identical JSON documents, so a field written as
//! text can be read back from bytes and vice versa.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode a value as JSON text.
pub fn to_json_text<V: Serialize + ?Sized>(value: &V) -> Result<String> {
    serde_json::to_string(value).map_err(Error::Serialization)
}

/// Encode a value as JSON UTF-8 bytes.
pub fn to_json_bytes<V: Serialize + ?Sized>(value: &V) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(Error::Serialization)
}

/// Decode a stored payload.
///
/// # Errors
/// `Error::Deserialization` when the bytes are not JSON or do not match `V`.
pub fn from_json_slice<V: DeserializeOwned>(bytes: &[u8]) -> Result<V> {
    serde_json::from_slice(bytes).map_err(Error::Deserialization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_text_and_bytes_are_the_same_document() {
        let point = Point { x: 1, y: -2 };
        let text = to_json_text(&point).unwrap();
        let bytes = to_json_bytes(&point).unwrap();

        assert_eq!(text.as_bytes(), bytes.as_slice());
        assert_eq!(text, r#"{"x":1,"y":-2}"#);
    }

    #[test]
    fn test_decode_wrong_shape_fails() {
        let result = from_json_slice::<Point>(br#"{"x":"one"}"#);
        assert!(matches!(result, Err(Error::Deserialization(_))));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = from_json_slice::<Point>(b"\x00\x01not-json");
        assert!(matches!(result, Err(Error::Deserialization(_))));
    }

    #[test]
    fn test_non_string_map_keys_fail_to_encode() {
        let mut map = HashMap::new();
        map.insert((1, 2), "pair");
        assert!(matches!(to_json_text(&map), Err(Error::Serialization(_))));
    }
}
