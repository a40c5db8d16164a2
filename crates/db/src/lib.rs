//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the ledger tables
//! - Repositories that run ledger rules inside database transactions
//! - Database migrations with the integrity triggers

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AccountRepository, FinancialYearRepository, JournalRepository, PostingGateway,
    ReportRepository, SeedReport,
};

use std::time::Duration;

use bizbooks_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}
