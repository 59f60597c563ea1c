//! # cache-repository
//!
//! Typed key-value and hash repositories over a Redis-compatible cache.
//!
//! ## Features
//!
//! - **Sync and async:** [`CacheRepository`] and [`AsyncCacheRepository`] expose the same operations
//! - **Hash objects:** JSON text or JSON bytes under hash fields, both read back by one getter
//! - **Scalars:** text, integer and byte values under plain keys
//! - **Explicit connections:** the cache connection is injected, never global
//! - **Backend agnostic:** Redis (feature `redis`), in-memory (feature `inmemory`), or your own
//!
//! ## Quick Start
//!
//! ```
//! use cache_repository::{
//!     backend::InMemoryBackend, CacheObject, CacheRepository, ObjectRepository,
//! };
//! use serde::{Deserialize, Serialize};
//!
//! // 1. Declare what may be stored
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct User {
//!     id: String,
//!     name: String,
//! }
//!
//! impl CacheObject for User {}
//!
//! // 2. Build a repository over a connection
//! let backend = InMemoryBackend::new();
//! let repo = CacheRepository::<User, _>::new(&backend).unwrap();
//!
//! // 3. Use it
//! let user = User { id: "u1".into(), name: "Ada".into() };
//! repo.set_with_json("users", &user.id, &user).unwrap();
//!
//! assert_eq!(repo.get_object("users", "u1").unwrap(), Some(user));
//! assert_eq!(repo.get_keys_by_hash("users").unwrap(), vec!["u1"]);
//! ```

#[macro_use]
extern crate log;

pub mod async_repository;
pub mod backend;
pub mod cache_repository;
pub mod error;
pub mod object;
pub mod repository;
pub mod serialization;
pub mod value;

// Re-exports for convenience
pub use async_repository::AsyncCacheRepository;
pub use backend::{AsyncCacheConnection, AsyncCacheDatabase, CacheConnection, CacheDatabase};
pub use cache_repository::CacheRepository;
pub use error::{Error, Result};
pub use object::CacheObject;
pub use repository::{AsyncObjectRepository, ObjectIter, ObjectRepository};
pub use value::ScalarValue;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
