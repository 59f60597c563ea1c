//! Blocking repository.

use crate::backend::{CacheConnection, CacheDatabase};
use crate::error::{Error, Result};
use crate::object::CacheObject;
use crate::repository::{ObjectIter, ObjectRepository};
use crate::value::ScalarValue;
use std::marker::PhantomData;

/// Blocking repository reading objects of type `T`.
///
/// Holds the logical database obtained from the connection for its whole
/// lifetime. Every call runs on the caller's thread and maps to a single
/// store primitive.
///
/// # Example
///
/// ```
/// use cache_repository::backend::InMemoryBackend;
/// use cache_repository::{CacheRepository, ObjectRepository};
///
/// let backend = InMemoryBackend::new();
/// let repo = CacheRepository::<u32, _>::new(&backend).unwrap();
///
/// repo.set_with_json("scores", "ada", &91u32).unwrap();
/// assert_eq!(repo.get_object("scores", "ada").unwrap(), Some(91));
/// ```
pub struct CacheRepository<T, D> {
    db: D,
    _marker: PhantomData<fn() -> T>,
}

impl<T: CacheObject, D: CacheDatabase> CacheRepository<T, D> {
    /// Create a repository over the connection's logical database.
    ///
    /// # Errors
    /// Returns `Error::InvalidArgument` if the connection cannot provide a
    /// database
    pub fn new<C>(connection: &C) -> Result<Self>
    where
        C: CacheConnection<Database = D>,
    {
        let db = connection.database().map_err(|e| {
            Error::InvalidArgument(format!("connection did not yield a database: {}", e))
        })?;
        debug!("CacheRepository ready");
        Ok(Self::from_database(db))
    }

    /// Wrap an already obtained database.
    pub fn from_database(db: D) -> Self {
        CacheRepository {
            db,
            _marker: PhantomData,
        }
    }

    pub fn database(&self) -> &D {
        &self.db
    }
}

impl<T: CacheObject, D: CacheDatabase> ObjectRepository<T> for CacheRepository<T, D> {
    fn set_with_json<O: CacheObject>(&self, hash: &str, key: &str, obj: &O) -> Result<()> {
        let json = obj.to_json()?;
        self.db.hash_set(hash, key, json.into_bytes())
    }

    fn set_with_bytes<O: CacheObject>(&self, hash: &str, key: &str, obj: &O) -> Result<()> {
        let bytes = obj.to_json_bytes()?;
        self.db.hash_set(hash, key, bytes)
    }

    fn get_keys_by_hash(&self, hash: &str) -> Result<Vec<String>> {
        if hash.is_empty() {
            return Ok(Vec::new());
        }
        self.db.hash_keys(hash)
    }

    fn get_object(&self, hash: &str, key: &str) -> Result<Option<T>> {
        match self.db.hash_get(hash, key)? {
            Some(bytes) => T::from_json_slice(&bytes).map(Some),
            None => Ok(None),
        }
    }

    fn get_all_objects(&self, hash: &str) -> Result<ObjectIter<T>> {
        if hash.is_empty() {
            return Ok(ObjectIter::empty());
        }
        Ok(ObjectIter::new(self.db.hash_get_all(hash)?))
    }

    fn set(&self, key: &str, value: impl Into<ScalarValue>) -> Result<()> {
        self.db.string_set(key, value.into())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.db.string_get(key)? {
            Some(bytes) => Ok(Some(String::from_utf8(bytes)?)),
            None => Ok(None),
        }
    }

    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.db.string_get(key)
    }
}
