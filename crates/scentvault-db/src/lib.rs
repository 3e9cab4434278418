//! # scentvault-db
//!
//! Catalog store for ScentVault.
//!
//! This crate provides:
//! - Connection pool management
//! - PostgreSQL [`CatalogRepository`] implementation
//! - An in-memory catalog for development and tests
//! - Seeding an empty catalog from a JSON file
//!
//! ## Example
//!
//! ```rust,ignore
//! use scentvault_db::{CatalogRepository, Database, PoolConfig};
//!
//! let db = Database::connect_with_config("postgres://localhost/scentvault", PoolConfig::from_env())
//!     .await?;
//! let perfumes = db.catalog.list_all().await?;
//! ```

pub mod catalog;
pub mod memory;
pub mod pool;
pub mod seed;

// Test fixtures for integration tests
pub mod test_fixtures;

// Re-export core types
pub use scentvault_core::*;

pub use catalog::PgCatalogRepository;
pub use memory::InMemoryCatalogRepository;
pub use pool::{create_pool_with_config, log_pool_metrics, PoolConfig};
pub use seed::{load_seed_file, seed_if_empty};

/// Combined database context.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Perfume catalog repository.
    pub catalog: PgCatalogRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            catalog: PgCatalogRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to the given URL with the given pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
