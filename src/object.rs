//! Capability trait for values stored under hash fields.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Trait that every value written to or read from a hash field implements.
///
/// Storing a value is an explicit opt-in: a type only reaches the cache
/// once it declares `CacheObject`. The encoding is fixed to JSON and the
/// provided methods are not meant to be overridden, so that every field
/// stays readable by every repository regardless of which setter wrote it.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use cache_repository::CacheObject;
///
/// #[derive(Serialize, Deserialize)]
/// pub struct Session {
///     pub user_id: String,
///     pub expires_at: u64,
/// }
///
/// impl CacheObject for Session {}
/// ```
pub trait CacheObject: Serialize + DeserializeOwned + Send + Sync {
    /// Encode as JSON text.
    fn to_json(&self) -> Result<String> {
        crate::serialization::to_json_text(self)
    }

    /// Encode as JSON UTF-8 bytes.
    fn to_json_bytes(&self) -> Result<Vec<u8>> {
        crate::serialization::to_json_bytes(self)
    }

    /// Decode from a stored payload written by either encoding.
    ///
    /// # Errors
    ///
    /// - `Error::Deserialization`: payload is not JSON or has the wrong shape
    fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        crate::serialization::from_json_slice(bytes)
    }
}

// ============================================================================
// Implementations for common types
// ============================================================================

macro_rules! impl_cache_object {
    ($($ty:ty),* $(,)?) => {
        $(impl CacheObject for $ty {})*
    };
}

impl_cache_object!(
    String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    serde_json::Value,
);

impl<T: CacheObject> CacheObject for Vec<T> {}

impl<T: CacheObject> CacheObject for Option<T> {}

impl<T: CacheObject> CacheObject for Box<T> {}

impl<T: CacheObject> CacheObject for HashMap<String, T> {}

impl<T: CacheObject> CacheObject for BTreeMap<String, T> {}
