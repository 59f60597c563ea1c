//! In-process backend with Redis string and hash semantics.

use super::{AsyncCacheConnection, AsyncCacheDatabase, CacheConnection, CacheDatabase};
use crate::error::{Error, Result};
use crate::value::ScalarValue;
use dashmap::DashMap;
use indexmap::IndexMap;
use std::sync::Arc;

const WRONG_TYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

#[derive(Clone, Debug)]
enum Entry {
    Scalar(Vec<u8>),
    // Insertion order is kept so field listings are stable.
    Hash(IndexMap<String, Vec<u8>>),
}

/// Store kept in process memory.
///
/// Acts both as the connection and as its single logical database; clones
/// share the same data. Useful for tests and for running without a server.
///
/// # Example
///
/// ```
/// use cache_repository::backend::{CacheDatabase, InMemoryBackend};
///
/// let backend = InMemoryBackend::new();
/// backend.hash_set("users", "u1", b"{}".to_vec()).unwrap();
/// assert_eq!(backend.hash_keys("users").unwrap(), vec!["u1".to_string()]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryBackend {
    store: Arc<DashMap<String, Entry>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of top-level keys (scalar entries and hashes).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Drop every key.
    pub fn clear(&self) {
        self.store.clear();
        warn!("⚠ In-memory store cleared");
    }
}

impl CacheDatabase for InMemoryBackend {
    fn string_set(&self, key: &str, value: ScalarValue) -> Result<()> {
        debug!("✓ InMemory SET {} = {}", key, value);
        self.store
            .insert(key.to_string(), Entry::Scalar(value.into_bytes()));
        Ok(())
    }

    fn string_get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.store.get(key).as_deref() {
            Some(Entry::Scalar(bytes)) => {
                debug!("✓ InMemory GET {} -> HIT", key);
                Ok(Some(bytes.clone()))
            }
            Some(Entry::Hash(_)) => Err(Error::Backend(WRONG_TYPE.to_string())),
            None => {
                debug!("✓ InMemory GET {} -> MISS", key);
                Ok(None)
            }
        }
    }

    fn hash_set(&self, hash: &str, field: &str, value: Vec<u8>) -> Result<()> {
        let mut entry = self
            .store
            .entry(hash.to_string())
            .or_insert_with(|| Entry::Hash(IndexMap::new()));

        match entry.value_mut() {
            Entry::Hash(fields) => {
                fields.insert(field.to_string(), value);
                debug!("✓ InMemory HSET {} {}", hash, field);
                Ok(())
            }
            Entry::Scalar(_) => Err(Error::Backend(WRONG_TYPE.to_string())),
        }
    }

    fn hash_get(&self, hash: &str, field: &str) -> Result<Option<Vec<u8>>> {
        match self.store.get(hash).as_deref() {
            Some(Entry::Hash(fields)) => {
                let value = fields.get(field).cloned();
                debug!(
                    "✓ InMemory HGET {} {} -> {}",
                    hash,
                    field,
                    if value.is_some() { "HIT" } else { "MISS" }
                );
                Ok(value)
            }
            Some(Entry::Scalar(_)) => Err(Error::Backend(WRONG_TYPE.to_string())),
            None => {
                debug!("✓ InMemory HGET {} {} -> MISS", hash, field);
                Ok(None)
            }
        }
    }

    fn hash_get_all(&self, hash: &str) -> Result<Vec<(String, Vec<u8>)>> {
        match self.store.get(hash).as_deref() {
            Some(Entry::Hash(fields)) => {
                debug!("✓ InMemory HGETALL {} ({} fields)", hash, fields.len());
                Ok(fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect())
            }
            Some(Entry::Scalar(_)) => Err(Error::Backend(WRONG_TYPE.to_string())),
            None => Ok(Vec::new()),
        }
    }

    fn hash_keys(&self, hash: &str) -> Result<Vec<String>> {
        match self.store.get(hash).as_deref() {
            Some(Entry::Hash(fields)) => {
                Ok(fields.keys().cloned().collect())
            }
            Some(Entry::Scalar(_)) => Err(Error::Backend(WRONG_TYPE.to_string())),
            None => Ok(Vec::new()),
        }
    }
}

impl AsyncCacheDatabase for InMemoryBackend {
    async fn string_set(&self, key: &str, value: ScalarValue) -> Result<()> {
        CacheDatabase::string_set(self, key, value)
    }

    async fn string_get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        CacheDatabase::string_get(self, key)
    }

    async fn hash_set(&self, hash: &str, field: &str, value: Vec<u8>) -> Result<()> {
        CacheDatabase::hash_set(self, hash, field, value)
    }

    async fn hash_get(&self, hash: &str, field: &str) -> Result<Option<Vec<u8>>> {
        CacheDatabase::hash_get(self, hash, field)
    }

    async fn hash_get_all(&self, hash: &str) -> Result<Vec<(String, Vec<u8>)>> {
        CacheDatabase::hash_get_all(self, hash)
    }

    async fn hash_keys(&self, hash: &str) -> Result<Vec<String>> {
        CacheDatabase::hash_keys(self, hash)
    }
}

impl CacheConnection for InMemoryBackend {
    type Database = InMemoryBackend;

    fn database(&self) -> Result<Self::Database> {
        Ok(self.clone())
    }
}

impl AsyncCacheConnection for InMemoryBackend {
    type Database = InMemoryBackend;

    fn database(&self) -> Result<Self::Database> {
        Ok(self.clone())
    }
}
