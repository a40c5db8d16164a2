//! Database seeder for Bizbooks development and testing.
//!
//! Seeds the default chart of accounts for one tenant and, with `--sample`,
//! posts an opening capital entry so reports have something to show.
//!
//! Usage: seeder [TENANT_ID] [--sample]
//!
//! The tenant defaults to `SEED_TENANT_ID`, then to a fixed development id.

use anyhow::{Context, bail};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use bizbooks_core::ledger::{EntrySource, LineSpec, NewJournalEntry};
use bizbooks_db::{AccountRepository, JournalRepository, connect};
use bizbooks_shared::config::DatabaseConfig;

/// Development tenant (consistent across seeds)
const DEV_TENANT_ID: &str = "00000000-0000-0000-0000-000000000001";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut tenant_arg = None;
    let mut sample = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--sample" => sample = true,
            other if tenant_arg.is_none() => tenant_arg = Some(other.to_string()),
            other => bail!("unexpected argument: {other}"),
        }
    }
    let raw = tenant_arg
        .or_else(|| std::env::var("SEED_TENANT_ID").ok())
        .unwrap_or_else(|| DEV_TENANT_ID.to_string());
    let tenant_id = Uuid::parse_str(&raw).with_context(|| format!("invalid tenant id: {raw}"))?;

    let config = DatabaseConfig {
        url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?,
        max_connections: 2,
        min_connections: 1,
    };

    println!("Connecting to database...");
    let db = connect(&config)
        .await
        .context("failed to connect to database")?;

    println!("Seeding chart of accounts for {tenant_id}...");
    let accounts = AccountRepository::new(db.clone());
    let report = accounts.seed_defaults(tenant_id).await?;
    println!(
        "  Created {} accounts, {} already present",
        report.created, report.skipped
    );

    if sample {
        println!("Posting opening capital...");
        seed_opening_capital(&accounts, &JournalRepository::new(db), tenant_id).await?;
    }

    println!("Seeding complete!");
    Ok(())
}

/// Posts a 5,00,000.00 capital introduction on 1 January of the current year.
async fn seed_opening_capital(
    accounts: &AccountRepository,
    journal: &JournalRepository,
    tenant_id: Uuid,
) -> anyhow::Result<()> {
    let bank = accounts.get_by_code(tenant_id, "1020").await?;
    let capital = accounts.get_by_code(tenant_id, "3010").await?;
    let year = Utc::now().year();
    let entry_date =
        NaiveDate::from_ymd_opt(year, 1, 1).context("1 January is always a valid date")?;
    let amount = Decimal::new(50_000_000, 2);

    let entry = journal
        .post(NewJournalEntry {
            tenant_id,
            entry_date,
            description: "Opening capital".to_string(),
            reference: Some("SEED-CAP".to_string()),
            source: EntrySource::Manual,
            source_id: None,
            created_by: None,
            lines: vec![
                LineSpec::debit(bank.id, amount)?,
                LineSpec::credit(capital.id, amount)?,
            ],
        })
        .await?;
    println!("  Posted entry {} on {}", entry.id, entry.entry_date);
    Ok(())
}
