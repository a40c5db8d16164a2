//! Database migration runner for Bizbooks.
//!
//! Reads `DATABASE_URL` from the environment or `.env`.
//!
//! Usage:
//!   migrator up      - Apply pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop everything and re-apply

use bizbooks_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // sets up its own tracing
    cli::run_cli(Migrator).await;
}
