//! Values accepted by scalar `set` operations.

use std::fmt;

/// Value bound to a top-level key.
///
/// Integers are stored as their decimal text, the same way Redis keeps
/// them, so `set("n", 42)` reads back as `"42"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScalarValue {
    Text(String),
    Integer(i64),
    Bytes(Vec<u8>),
}

impl ScalarValue {
    /// Bytes written to the store for this value.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            ScalarValue::Text(s) => s.into_bytes(),
            ScalarValue::Integer(n) => n.to_string().into_bytes(),
            ScalarValue::Bytes(b) => b,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Text(s) => f.write_str(s),
            ScalarValue::Integer(n) => write!(f, "{}", n),
            ScalarValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<&String> for ScalarValue {
    fn from(value: &String) -> Self {
        ScalarValue::Text(value.clone())
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Integer(i64::from(value))
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Integer(value)
    }
}

impl From<Vec<u8>> for ScalarValue {
    fn from(value: Vec<u8>) -> Self {
        ScalarValue::Bytes(value)
    }
}

impl From<&[u8]> for ScalarValue {
    fn from(value: &[u8]) -> Self {
        ScalarValue::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for ScalarValue {
    fn from(value: &[u8; N]) -> Self {
        ScalarValue::Bytes(value.to_vec())
    }
}
