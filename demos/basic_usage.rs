//! Basic usage of the blocking and async repositories.

use cache_repository::{
    backend::InMemoryBackend, error::Result, AsyncCacheRepository, AsyncObjectRepository,
    CacheObject, CacheRepository, ObjectRepository,
};
use serde::{Deserialize, Serialize};

/// Example object: Employment
#[derive(Clone, Serialize, Deserialize, Debug)]
struct Employment {
    id: String,
    employer_name: String,
    salary: f64,
}

impl CacheObject for Employment {}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    println!("\n=== cache-repository: basic usage ===\n");

    // Swap for `RedisConnection::open(RedisConfig::from_env()?)?` with the
    // `redis` feature enabled.
    let backend = InMemoryBackend::new();

    // Blocking
    let repo = CacheRepository::<Employment, _>::new(&backend)?;

    repo.set_with_json(
        "employments",
        "emp_001",
        &Employment {
            id: "emp_001".to_string(),
            employer_name: "Acme Corp".to_string(),
            salary: 75000.0,
        },
    )?;
    repo.set_with_bytes(
        "employments",
        "emp_002",
        &Employment {
            id: "emp_002".to_string(),
            employer_name: "Tech Inc".to_string(),
            salary: 95000.0,
        },
    )?;

    println!("Fields: {:?}", repo.get_keys_by_hash("employments")?);
    println!("emp_001: {:?}", repo.get_object("employments", "emp_001")?);
    println!("emp_404: {:?}", repo.get_object("employments", "emp_404")?);

    for employment in repo.get_all_objects("employments")? {
        let employment = employment?;
        println!("  {} works at {}", employment.id, employment.employer_name);
    }

    // Async, same backend
    let async_repo = AsyncCacheRepository::<Employment, _>::new(&backend)?;

    async_repo.set("visits", 42).await?;
    async_repo.set("motd", "hello").await?;

    println!("visits = {:?}", async_repo.get("visits").await?);
    println!("motd   = {:?}", async_repo.get("motd").await?);
    println!(
        "async objects: {}",
        async_repo.get_all_objects("employments").await?.len()
    );

    Ok(())
}
