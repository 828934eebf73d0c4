//! PostgreSQL persistence layer
//!
//! Implements the store ports from `domain_registry` on top of SQLx.
//! Entities own their side of the company/supplier relationship, so each
//! store persists one association table (`company_suppliers` for companies,
//! `supplier_companies` for suppliers); the domain synchronizer keeps the
//! two mirrored.

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use repositories::{CompanyRepository, SupplierRepository};

/// Applies the embedded migrations to the target database
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
}
