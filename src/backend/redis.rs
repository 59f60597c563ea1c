//! Redis backend built on the `redis` crate.

use super::{AsyncCacheConnection, AsyncCacheDatabase, CacheConnection, CacheDatabase};
use crate::error::{Error, Result};
use crate::value::ScalarValue;
use ::redis::aio::ConnectionManager;
use ::redis::{AsyncCommands, Client, Commands, Connection};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const DEFAULT_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for Redis connections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedisConfig {
    /// Server URL, e.g. `redis://cache:6379` or `redis+unix:///tmp/redis.sock`.
    pub url: String,
    /// Logical database index selected on connect, unless the URL names one.
    pub database: i64,
    pub connection_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        RedisConfig {
            url: DEFAULT_URL.to_string(),
            database: 0,
            connection_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl RedisConfig {
    /// Build configuration from the environment.
    ///
    /// Reads `REDIS_URL`, `REDIS_DATABASE` and `REDIS_CONNECT_TIMEOUT_MS`;
    /// unset variables keep their defaults.
    ///
    /// # Errors
    /// Returns `Error::Config` when a numeric variable does not parse
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = RedisConfig::default();

        if let Some(url) = lookup("REDIS_URL") {
            config.url = url;
        }
        if let Some(db) = lookup("REDIS_DATABASE") {
            config.database = db
                .parse()
                .map_err(|_| Error::Config(format!("REDIS_DATABASE is not an integer: {}", db)))?;
        }
        if let Some(ms) = lookup("REDIS_CONNECT_TIMEOUT_MS") {
            let ms: u64 = ms.parse().map_err(|_| {
                Error::Config(format!("REDIS_CONNECT_TIMEOUT_MS is not an integer: {}", ms))
            })?;
            config.connection_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// URL handed to the client, with the database index applied.
    ///
    /// TCP URLs (`redis://`, `rediss://`) carry the index as their path,
    /// unix socket URLs (`redis+unix://`, `unix://`) as the `db` query
    /// parameter. A URL that already names a database keeps it; naming a
    /// different non-zero `database` as well is a configuration error.
    pub fn connection_url(&self) -> Result<String> {
        if self.database < 0 {
            return Err(Error::Config(format!(
                "database index must not be negative: {}",
                self.database
            )));
        }

        let (scheme, rest) = self
            .url
            .split_once("://")
            .ok_or_else(|| Error::Config(format!("Invalid Redis URL: {}", self.url)))?;
        let (base, query) = match rest.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (rest, None),
        };

        match scheme {
            "redis" | "rediss" => {
                let (authority, path) = base.split_once('/').unwrap_or((base, ""));
                let path = path.trim_matches('/');
                if !path.is_empty() {
                    self.check_url_database(path)?;
                    return Ok(self.url.clone());
                }
                let mut url = format!("{}://{}/{}", scheme, authority, self.database);
                if let Some(query) = query {
                    url.push('?');
                    url.push_str(query);
                }
                Ok(url)
            }
            "redis+unix" | "unix" => {
                let existing = query.and_then(|q| {
                    q.split('&')
                        .find_map(|pair| pair.strip_prefix("db="))
                });
                match (existing, query) {
                    (Some(db), _) => {
                        self.check_url_database(db)?;
                        Ok(self.url.clone())
                    }
                    (None, Some(query)) if !query.is_empty() => Ok(format!(
                        "{}://{}?{}&db={}",
                        scheme, base, query, self.database
                    )),
                    (None, _) => Ok(format!("{}://{}?db={}", scheme, base, self.database)),
                }
            }
            other => Err(Error::Config(format!(
                "Unsupported Redis URL scheme {}: {}",
                other, self.url
            ))),
        }
    }

    fn check_url_database(&self, db: &str) -> Result<()> {
        let in_url: i64 = db
            .parse()
            .map_err(|_| Error::Config(format!("Invalid database in Redis URL: {}", self.url)))?;
        if self.database != 0 && self.database != in_url {
            return Err(Error::Config(format!(
                "database {} conflicts with database {} in URL {}",
                self.database, in_url, self.url
            )));
        }
        Ok(())
    }

    fn client(&self) -> Result<Client> {
        let url = self.connection_url()?;
        Client::open(url.as_str())
            .map_err(|e| Error::Config(format!("Invalid Redis URL {}: {}", url, e)))
    }
}

// ============================================================================
// Blocking
// ============================================================================

/// Blocking Redis connection.
///
/// Opening parses the configuration only; each call to
/// [`CacheConnection::database`] establishes a server connection.
#[derive(Clone)]
pub struct RedisConnection {
    client: Client,
    config: RedisConfig,
}

impl RedisConnection {
    /// # Errors
    /// Returns `Error::Config` if the URL or database index is invalid
    pub fn open(config: RedisConfig) -> Result<Self> {
        let client = config.client()?;
        Ok(RedisConnection { client, config })
    }
}

impl CacheConnection for RedisConnection {
    type Database = RedisDatabase;

    fn database(&self) -> Result<Self::Database> {
        let conn = self
            .client
            .get_connection_with_timeout(self.config.connection_timeout)?;

        info!("✓ Redis connection established: {}", self.config.url);

        Ok(RedisDatabase {
            conn: Mutex::new(conn),
        })
    }
}

/// Blocking logical database over one server connection.
pub struct RedisDatabase {
    conn: Mutex<Connection>,
}

impl RedisDatabase {
    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Backend("Redis connection lock poisoned".to_string()))
    }
}

impl CacheDatabase for RedisDatabase {
    fn string_set(&self, key: &str, value: ScalarValue) -> Result<()> {
        debug!("✓ Redis SET {} = {}", key, value);
        let _: () = self.conn()?.set(key, value.into_bytes())?;
        Ok(())
    }

    fn string_get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value: Option<Vec<u8>> = self.conn()?.get(key)?;
        debug!(
            "✓ Redis GET {} -> {}",
            key,
            if value.is_some() { "HIT" } else { "MISS" }
        );
        Ok(value)
    }

    fn hash_set(&self, hash: &str, field: &str, value: Vec<u8>) -> Result<()> {
        let _: () = self.conn()?.hset(hash, field, value)?;
        debug!("✓ Redis HSET {} {}", hash, field);
        Ok(())
    }

    fn hash_get(&self, hash: &str, field: &str) -> Result<Option<Vec<u8>>> {
        let value: Option<Vec<u8>> = self.conn()?.hget(hash, field)?;
        debug!(
            "✓ Redis HGET {} {} -> {}",
            hash,
            field,
            if value.is_some() { "HIT" } else { "MISS" }
        );
        Ok(value)
    }

    fn hash_get_all(&self, hash: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let entries: Vec<(String, Vec<u8>)> = self.conn()?.hgetall(hash)?;
        debug!("✓ Redis HGETALL {} ({} fields)", hash, entries.len());
        Ok(entries)
    }

    fn hash_keys(&self, hash: &str) -> Result<Vec<String>> {
        let fields: Vec<String> = self.conn()?.hkeys(hash)?;
        debug!("✓ Redis HKEYS {} ({} fields)", hash, fields.len());
        Ok(fields)
    }
}

// ============================================================================
// Async
// ============================================================================

/// Multiplexed async Redis connection.
///
/// Clones share the underlying [`ConnectionManager`], which reconnects on
/// its own; repositories never close it.
#[derive(Clone)]
pub struct AsyncRedisConnection {
    manager: ConnectionManager,
}

impl AsyncRedisConnection {
    /// Connect to the configured server.
    ///
    /// Gives up after `connection_timeout`.
    ///
    /// # Errors
    /// Returns `Error::Config` for an invalid URL, `Error::Timeout` when the
    /// server does not answer in time and `Error::Redis` when it refuses.
    pub async fn connect(config: RedisConfig) -> Result<Self> {
        let client = config.client()?;
        let manager = tokio::time::timeout(config.connection_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| Error::Timeout(config.connection_timeout))??;

        info!("✓ Redis async connection established: {}", config.url);

        Ok(AsyncRedisConnection { manager })
    }
}

impl AsyncCacheConnection for AsyncRedisConnection {
    type Database = AsyncRedisDatabase;

    fn database(&self) -> Result<Self::Database> {
        Ok(AsyncRedisDatabase {
            conn: self.manager.clone(),
        })
    }
}

/// Async logical database sharing the multiplexed connection.
#[derive(Clone)]
pub struct AsyncRedisDatabase {
    conn: ConnectionManager,
}

impl AsyncCacheDatabase for AsyncRedisDatabase {
    async fn string_set(&self, key: &str, value: ScalarValue) -> Result<()> {
        debug!("✓ Redis SET {} = {}", key, value);
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value.into_bytes()).await?;
        Ok(())
    }

    async fn string_get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        debug!(
            "✓ Redis GET {} -> {}",
            key,
            if value.is_some() { "HIT" } else { "MISS" }
        );
        Ok(value)
    }

    async fn hash_set(&self, hash: &str, field: &str, value: Vec<u8>) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.hset(hash, field, value).await?;
        debug!("✓ Redis HSET {} {}", hash, field);
        Ok(())
    }

    async fn hash_get(&self, hash: &str, field: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.hget(hash, field).await?;
        debug!(
            "✓ Redis HGET {} {} -> {}",
            hash,
            field,
            if value.is_some() { "HIT" } else { "MISS" }
        );
        Ok(value)
    }

    async fn hash_get_all(&self, hash: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let mut conn = self.conn.clone();
        let entries: Vec<(String, Vec<u8>)> = conn.hgetall(hash).await?;
        debug!("✓ Redis HGETALL {} ({} fields)", hash, entries.len());
        Ok(entries)
    }

    async fn hash_keys(&self, hash: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let fields: Vec<String> = conn.hkeys(hash).await?;
        debug!("✓ Redis HKEYS {} ({} fields)", hash, fields.len());
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_redis_config_default() {
        let config = RedisConfig::default();
        assert_eq!(config.url, "redis://127.0.0.1:6379");
        assert_eq!(config.database, 0);
        assert_eq!(config.connection_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_redis_config_from_lookup() {
        let config = RedisConfig::from_lookup(lookup_from(&[
            ("REDIS_URL", "redis://cache:6380"),
            ("REDIS_DATABASE", "3"),
            ("REDIS_CONNECT_TIMEOUT_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.url, "redis://cache:6380");
        assert_eq!(config.database, 3);
        assert_eq!(config.connection_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_redis_config_rejects_bad_numbers() {
        let result = RedisConfig::from_lookup(lookup_from(&[("REDIS_DATABASE", "first")]));
        assert!(matches!(result, Err(Error::Config(_))));

        let result =
            RedisConfig::from_lookup(lookup_from(&[("REDIS_CONNECT_TIMEOUT_MS", "-1")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_connection_url_appends_database() {
        let config = RedisConfig {
            url: "redis://cache:6379/".to_string(),
            database: 2,
            ..Default::default()
        };
        assert_eq!(config.connection_url().unwrap(), "redis://cache:6379/2");
    }

    #[test]
    fn test_negative_database_is_config_error() {
        let config = RedisConfig {
            database: -1,
            ..Default::default()
        };
        assert!(matches!(config.connection_url(), Err(Error::Config(_))));
    }

    #[test]
    fn test_url_naming_a_database_is_kept() {
        let config = RedisConfig {
            url: "redis://127.0.0.1:6379/2".to_string(),
            ..Default::default()
        };
        assert_eq!(config.connection_url().unwrap(), "redis://127.0.0.1:6379/2");
        assert!(RedisConnection::open(config).is_ok());

        let same = RedisConfig {
            url: "redis://127.0.0.1:6379/2".to_string(),
            database: 2,
            ..Default::default()
        };
        assert_eq!(same.connection_url().unwrap(), "redis://127.0.0.1:6379/2");
    }

    #[test]
    fn test_url_database_conflict_is_config_error() {
        let config = RedisConfig {
            url: "redis://127.0.0.1:6379/2".to_string(),
            database: 5,
            ..Default::default()
        };
        assert!(matches!(config.connection_url(), Err(Error::Config(_))));
    }

    #[test]
    fn test_database_goes_before_query_string() {
        let config = RedisConfig {
            url: "redis://127.0.0.1:6379?protocol=resp3".to_string(),
            database: 4,
            ..Default::default()
        };
        assert_eq!(
            config.connection_url().unwrap(),
            "redis://127.0.0.1:6379/4?protocol=resp3"
        );
        assert!(RedisConnection::open(config).is_ok());
    }

    #[test]
    fn test_unix_socket_database_is_a_query_parameter() {
        let config = RedisConfig {
            url: "redis+unix:///tmp/redis.sock".to_string(),
            database: 3,
            ..Default::default()
        };
        assert_eq!(
            config.connection_url().unwrap(),
            "redis+unix:///tmp/redis.sock?db=3"
        );
        assert!(RedisConnection::open(config).is_ok());

        let with_query = RedisConfig {
            url: "redis+unix:///tmp/redis.sock?protocol=resp3".to_string(),
            database: 3,
            ..Default::default()
        };
        assert_eq!(
            with_query.connection_url().unwrap(),
            "redis+unix:///tmp/redis.sock?protocol=resp3&db=3"
        );

        let named = RedisConfig {
            url: "unix:///tmp/redis.sock?db=1".to_string(),
            ..Default::default()
        };
        assert_eq!(named.connection_url().unwrap(), "unix:///tmp/redis.sock?db=1");
    }

    #[test]
    fn test_unknown_scheme_is_config_error() {
        let config = RedisConfig {
            url: "http://127.0.0.1:6379".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.connection_url(), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_async_connect_honours_connection_timeout() {
        let config = RedisConfig {
            // Non-routable address: the connect attempt hangs until timed out.
            url: "redis://10.255.255.1:6379".to_string(),
            connection_timeout: Duration::from_millis(100),
            ..Default::default()
        };

        let started = std::time::Instant::now();
        let result = AsyncRedisConnection::connect(config).await;

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_open_rejects_unparseable_url() {
        let config = RedisConfig {
            url: "not a redis url".to_string(),
            ..Default::default()
        };
        assert!(matches!(RedisConnection::open(config), Err(Error::Config(_))));
    }
}
