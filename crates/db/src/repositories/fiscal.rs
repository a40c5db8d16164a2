//! Financial year repository: the per-tenant, per-year posting lock.

use bizbooks_core::fiscal::FinancialYear;
use bizbooks_core::ledger::LedgerError;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::storage;
use crate::entities::financial_years;

/// Repository for financial year locks.
#[derive(Debug, Clone)]
pub struct FinancialYearRepository {
    db: DatabaseConnection,
}

impl FinancialYearRepository {
    /// Creates a new financial year repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the year's lock state. A year without a row is open.
    pub async fn get(&self, tenant_id: Uuid, year: i32) -> Result<FinancialYear, LedgerError> {
        let model = financial_years::Entity::find()
            .filter(financial_years::Column::TenantId.eq(tenant_id))
            .filter(financial_years::Column::Year.eq(year))
            .one(&self.db)
            .await
            .map_err(storage)?;
        Ok(model.map_or_else(|| FinancialYear::open(tenant_id, year), Into::into))
    }

    /// Whether the year refuses postings.
    pub async fn is_locked(&self, tenant_id: Uuid, year: i32) -> Result<bool, LedgerError> {
        Ok(self.get(tenant_id, year).await?.is_locked)
    }

    /// Locks the year against further postings. Locking is one-way.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AlreadyLocked` if the year is locked already,
    /// including when a concurrent caller locked it first.
    pub async fn lock(
        &self,
        tenant_id: Uuid,
        year: i32,
        locked_by: Option<Uuid>,
    ) -> Result<FinancialYear, LedgerError> {
        let txn = self.db.begin().await.map_err(storage)?;
        let now = Utc::now();

        let model = year_row_for(&txn, tenant_id, year, RowLock::Exclusive).await?;
        let mut fy = FinancialYear::from(model.clone());
        fy.lock(locked_by, now)?;

        let mut active: financial_years::ActiveModel = model.into();
        active.is_locked = Set(true);
        active.locked_by = Set(fy.locked_by);
        active.locked_at = Set(Some(now.into()));
        let locked = active.update(&txn).await.map_err(storage)?;

        txn.commit().await.map_err(storage)?;

        tracing::info!(tenant_id = %tenant_id, year, "financial_year_locked");
        Ok(locked.into())
    }
}

/// Reads the lock flag inside a posting transaction.
///
/// The row is share-locked so a concurrent `lock` waits for the posting to
/// commit, and a posting waits for a concurrent `lock`.
pub(crate) async fn is_locked_in<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    year: i32,
) -> Result<bool, LedgerError> {
    let model = year_row_for(conn, tenant_id, year, RowLock::Shared).await?;
    Ok(model.is_locked)
}

#[derive(Clone, Copy)]
enum RowLock {
    Shared,
    Exclusive,
}

/// Creates the year's row as open when missing, then row-locks it.
///
/// A missing row cannot be locked, so without the insert a posting and a
/// first-time `lock` would not serialize.
async fn year_row_for<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    year: i32,
    row_lock: RowLock,
) -> Result<financial_years::Model, LedgerError> {
    let open = financial_years::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        year: Set(year),
        is_locked: Set(false),
        locked_by: Set(None),
        locked_at: Set(None),
        created_at: Set(Utc::now().into()),
    };
    financial_years::Entity::insert(open)
        .on_conflict(
            OnConflict::columns([
                financial_years::Column::TenantId,
                financial_years::Column::Year,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(storage)?;

    let query = financial_years::Entity::find()
        .filter(financial_years::Column::TenantId.eq(tenant_id))
        .filter(financial_years::Column::Year.eq(year));
    let query = match row_lock {
        RowLock::Shared => query.lock_shared(),
        RowLock::Exclusive => query.lock_exclusive(),
    };
    query
        .one(conn)
        .await
        .map_err(storage)?
        .ok_or_else(|| LedgerError::Storage(format!("financial year {year} row missing")))
}
