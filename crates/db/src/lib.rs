//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//! - The `pg_dump`-based backup service

pub mod backup;
pub mod entities;
pub mod migration;
pub mod repositories;

pub use backup::{BackupError, BackupService};
pub use repositories::{
    AuditRepository, ClientRepository, MedicineRepository, PrescriptionRepository,
    ProviderRepository, RoleRepository, SaleRepository, SessionRepository, UserRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
