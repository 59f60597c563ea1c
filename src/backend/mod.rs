//! Cache connection and logical database abstractions.
//!
//! A connection is created by the application, shared, and handed to
//! repositories, which ask it once for a logical database. The database
//! exposes the string and hash primitives everything else is built on.

use crate::error::Result;
use crate::value::ScalarValue;
use std::future::Future;

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryBackend;

#[cfg(feature = "redis")]
pub use self::redis::{AsyncRedisConnection, AsyncRedisDatabase, RedisConfig, RedisConnection, RedisDatabase};

/// Blocking string and hash primitives of one logical database.
pub trait CacheDatabase {
    /// Bind `value` to `key`, replacing any previous value. No expiry.
    fn string_set(&self, key: &str, value: ScalarValue) -> Result<()>;

    /// Raw value at `key`, `None` when absent.
    fn string_get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write one field of a hash, creating the hash if needed.
    fn hash_set(&self, hash: &str, field: &str, value: Vec<u8>) -> Result<()>;

    /// Raw value of one field, `None` when the hash or field is absent.
    fn hash_get(&self, hash: &str, field: &str) -> Result<Option<Vec<u8>>>;

    /// Every field/value pair of a hash, empty when absent.
    fn hash_get_all(&self, hash: &str) -> Result<Vec<(String, Vec<u8>)>>;

    /// Every field name of a hash, empty when absent.
    fn hash_keys(&self, hash: &str) -> Result<Vec<String>>;
}

/// Non-blocking counterpart of [`CacheDatabase`].
///
/// Each future performs a single round trip to the store and nothing else.
pub trait AsyncCacheDatabase: Send + Sync {
    /// Bind `value` to `key`, replacing any previous value. No expiry.
    fn string_set(&self, key: &str, value: ScalarValue)
        -> impl Future<Output = Result<()>> + Send;

    /// Raw value at `key`, `None` when absent.
    fn string_get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Write one field of a hash, creating the hash if needed.
    fn hash_set(
        &self,
        hash: &str,
        field: &str,
        value: Vec<u8>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Raw value of one field, `None` when the hash or field is absent.
    fn hash_get(
        &self,
        hash: &str,
        field: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Every field/value pair of a hash, empty when absent.
    fn hash_get_all(
        &self,
        hash: &str,
    ) -> impl Future<Output = Result<Vec<(String, Vec<u8>)>>> + Send;

    /// Every field name of a hash, empty when absent.
    fn hash_keys(&self, hash: &str) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Shared handle that yields blocking logical databases.
pub trait CacheConnection {
    type Database: CacheDatabase;

    /// Obtain the logical database this connection points at.
    fn database(&self) -> Result<Self::Database>;
}

/// Shared handle that yields non-blocking logical databases.
pub trait AsyncCacheConnection {
    type Database: AsyncCacheDatabase;

    /// Obtain the logical database this connection points at.
    fn database(&self) -> Result<Self::Database>;
}
