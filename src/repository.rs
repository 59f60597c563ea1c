//! Repository contracts over a cache database.
//!
//! [`ObjectRepository`] and [`AsyncObjectRepository`] describe the same
//! operations; only the execution model differs. `T` is the type read
//! back from hash fields, while the two `set_with_*` writers accept any
//! [`CacheObject`].
//!
//! Absence is never an error: a missing key or field yields `None`, a
//! missing or empty hash yields an empty list or iterator.

use crate::error::Result;
use crate::object::CacheObject;
use crate::value::ScalarValue;
use std::future::Future;
use std::marker::PhantomData;

/// Blocking repository contract.
pub trait ObjectRepository<T: CacheObject> {
    /// Store `obj` as JSON text under field `key` of `hash`.
    fn set_with_json<O: CacheObject>(&self, hash: &str, key: &str, obj: &O) -> Result<()>;

    /// Store `obj` as JSON bytes under field `key` of `hash`.
    fn set_with_bytes<O: CacheObject>(&self, hash: &str, key: &str, obj: &O) -> Result<()>;

    /// Field names of `hash`; empty when the name is empty or the hash is absent.
    fn get_keys_by_hash(&self, hash: &str) -> Result<Vec<String>>;

    /// Object stored at field `key` of `hash`, `None` on a miss.
    fn get_object(&self, hash: &str, key: &str) -> Result<Option<T>>;

    /// Lazily decoded objects, one per field of `hash`.
    fn get_all_objects(&self, hash: &str) -> Result<ObjectIter<T>>;

    /// Bind a text, integer or byte value to `key`, overwriting it.
    fn set(&self, key: &str, value: impl Into<ScalarValue>) -> Result<()>;

    /// Text form of the value at `key`, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Raw value at `key`, `None` when absent.
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

/// Non-blocking repository contract.
///
/// Every future suspends only on the single store call it wraps.
pub trait AsyncObjectRepository<T: CacheObject> {
    fn set_with_json<O: CacheObject>(
        &self,
        hash: &str,
        key: &str,
        obj: &O,
    ) -> impl Future<Output = Result<()>> + Send;

    fn set_with_bytes<O: CacheObject>(
        &self,
        hash: &str,
        key: &str,
        obj: &O,
    ) -> impl Future<Output = Result<()>> + Send;

    fn get_keys_by_hash(&self, hash: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn get_object(
        &self,
        hash: &str,
        key: &str,
    ) -> impl Future<Output = Result<Option<T>>> + Send;

    fn get_all_objects(&self, hash: &str) -> impl Future<Output = Result<ObjectIter<T>>> + Send;

    fn set(
        &self,
        key: &str,
        value: impl Into<ScalarValue> + Send,
    ) -> impl Future<Output = Result<()>> + Send;

    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    fn get_bytes(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;
}

/// Iterator over the objects of one hash.
///
/// The raw values are fetched up front; each is decoded only when the
/// iterator reaches it, so a corrupt field fails on its own item without
/// affecting the others.
#[derive(Debug)]
pub struct ObjectIter<T> {
    entries: std::vec::IntoIter<(String, Vec<u8>)>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ObjectIter<T> {
    pub(crate) fn new(entries: Vec<(String, Vec<u8>)>) -> Self {
        ObjectIter {
            entries: entries.into_iter(),
            _marker: PhantomData,
        }
    }

    pub(crate) fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: CacheObject> ObjectIter<T> {
    /// Yield field names alongside the decoded objects.
    pub fn with_fields(self) -> impl Iterator<Item = (String, Result<T>)> {
        self.entries
            .map(|(field, bytes)| (field, T::from_json_slice(&bytes)))
    }
}

impl<T: CacheObject> Iterator for ObjectIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries
            .next()
            .map(|(_, bytes)| T::from_json_slice(&bytes))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<T: CacheObject> ExactSizeIterator for ObjectIter<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_object_iter_decodes_each_item_independently() {
        let iter: ObjectIter<u32> = ObjectIter::new(vec![
            ("a".to_string(), b"1".to_vec()),
            ("b".to_string(), b"oops".to_vec()),
            ("c".to_string(), b"3".to_vec()),
        ]);

        assert_eq!(iter.len(), 3);
        let items: Vec<Result<u32>> = iter.collect();
        assert_eq!(*items[0].as_ref().unwrap(), 1);
        assert!(matches!(items[1], Err(Error::Deserialization(_))));
        assert_eq!(*items[2].as_ref().unwrap(), 3);
    }

    #[test]
    fn test_object_iter_with_fields() {
        let iter: ObjectIter<String> =
            ObjectIter::new(vec![("name".to_string(), br#""ada""#.to_vec())]);

        let pairs: Vec<(String, String)> = iter
            .with_fields()
            .map(|(field, value)| (field, value.unwrap()))
            .collect();
        assert_eq!(pairs, vec![("name".to_string(), "ada".to_string())]);
    }

    #[test]
    fn test_empty_iter() {
        let mut iter: ObjectIter<u8> = ObjectIter::empty();
        assert_eq!(iter.len(), 0);
        assert!(iter.next().is_none());
    }
}
