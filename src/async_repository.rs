//! Non-blocking repository.

use crate::backend::{AsyncCacheConnection, AsyncCacheDatabase};
use crate::error::{Error, Result};
use crate::object::CacheObject;
use crate::repository::{AsyncObjectRepository, ObjectIter};
use crate::value::ScalarValue;
use std::marker::PhantomData;

/// Async repository reading objects of type `T`.
///
/// Same contract as [`CacheRepository`](crate::CacheRepository). Each
/// operation awaits exactly one store call and spawns nothing; results
/// are decoded after the call completes.
///
/// # Example
///
/// ```
/// use cache_repository::backend::InMemoryBackend;
/// use cache_repository::{AsyncCacheRepository, AsyncObjectRepository};
///
/// # #[tokio::main]
/// # async fn main() -> cache_repository::Result<()> {
/// let backend = InMemoryBackend::new();
/// let repo = AsyncCacheRepository::<String, _>::new(&backend)?;
///
/// repo.set("greeting", "hello").await?;
/// assert_eq!(repo.get("greeting").await?.as_deref(), Some("hello"));
/// # Ok(())
/// # }
/// ```
pub struct AsyncCacheRepository<T, D> {
    db: D,
    _marker: PhantomData<fn() -> T>,
}

impl<T: CacheObject, D: AsyncCacheDatabase> AsyncCacheRepository<T, D> {
    /// Create a repository over the connection's logical database.
    ///
    /// # Errors
    /// Returns `Error::InvalidArgument` if the connection cannot provide a
    /// database
    pub fn new<C>(connection: &C) -> Result<Self>
    where
        C: AsyncCacheConnection<Database = D>,
    {
        let db = connection.database().map_err(|e| {
            Error::InvalidArgument(format!("connection did not yield a database: {}", e))
        })?;
        debug!("AsyncCacheRepository ready");
        Ok(Self::from_database(db))
    }

    /// Wrap an already obtained database.
    pub fn from_database(db: D) -> Self {
        AsyncCacheRepository {
            db,
            _marker: PhantomData,
        }
    }

    pub fn database(&self) -> &D {
        &self.db
    }
}

impl<T: CacheObject, D: AsyncCacheDatabase> AsyncObjectRepository<T> for AsyncCacheRepository<T, D> {
    async fn set_with_json<O: CacheObject>(&self, hash: &str, key: &str, obj: &O) -> Result<()> {
        let json = obj.to_json()?;
        self.db.hash_set(hash, key, json.into_bytes()).await
    }

    async fn set_with_bytes<O: CacheObject>(&self, hash: &str, key: &str, obj: &O) -> Result<()> {
        let bytes = obj.to_json_bytes()?;
        self.db.hash_set(hash, key, bytes).await
    }

    async fn get_keys_by_hash(&self, hash: &str) -> Result<Vec<String>> {
        if hash.is_empty() {
            return Ok(Vec::new());
        }
        self.db.hash_keys(hash).await
    }

    async fn get_object(&self, hash: &str, key: &str) -> Result<Option<T>> {
        match self.db.hash_get(hash, key).await? {
            Some(bytes) => T::from_json_slice(&bytes).map(Some),
            None => Ok(None),
        }
    }

    async fn get_all_objects(&self, hash: &str) -> Result<ObjectIter<T>> {
        if hash.is_empty() {
            return Ok(ObjectIter::empty());
        }
        let entries = self.db.hash_get_all(hash).await?;
        Ok(ObjectIter::new(entries))
    }

    async fn set(&self, key: &str, value: impl Into<ScalarValue> + Send) -> Result<()> {
        self.db.string_set(key, value.into()).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.db.string_get(key).await? {
            Some(bytes) => Ok(Some(String::from_utf8(bytes)?)),
            None => Ok(None),
        }
    }

    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.db.string_get(key).await
    }
}
