//! Journal repository: posting, voiding and reading journal entries.
//!
//! Posting runs inside one database transaction. The domain checks from
//! `LedgerService` run first, in order: balance, period lock, accounts.
//! Nothing is written unless all of them pass.

use std::collections::HashMap;

use bizbooks_core::ledger::{
    EntryStatus, JournalEntry, JournalLine, JournalQuery, LedgerError, LedgerService,
    NewJournalEntry, ReversalService,
};
use bizbooks_shared::types::{PageRequest, PageResponse};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::account::active_ids;
use super::fiscal::is_locked_in;
use super::storage;
use crate::entities::sea_orm_active_enums;
use crate::entities::{accounts, journal_entries, journal_lines};

/// Repository for journal entries.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and stores a posted journal entry.
    ///
    /// # Errors
    ///
    /// Returns `Unbalanced`, `EmptyEntry`, `PeriodLocked` or
    /// `UnknownAccount` when the entry is rejected, and `Storage` on driver
    /// failures.
    pub async fn post(&self, entry: NewJournalEntry) -> Result<JournalEntry, LedgerError> {
        let txn = self.db.begin().await.map_err(storage)?;
        let posted = post_in(&txn, entry).await?;
        txn.commit().await.map_err(storage)?;
        Ok(posted)
    }

    /// Voids a posted entry by posting its reversal, dated today.
    ///
    /// The original is marked voided and linked to the reversal in the same
    /// transaction. Returns the reversing entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry is not the tenant's and
    /// `InvalidState` unless it is posted. The reversal is subject to the
    /// same posting checks as any new entry.
    pub async fn void(
        &self,
        tenant_id: Uuid,
        entry_id: Uuid,
        voided_by: Option<Uuid>,
    ) -> Result<JournalEntry, LedgerError> {
        let txn = self.db.begin().await.map_err(storage)?;

        let header = journal_entries::Entity::find_by_id(entry_id)
            .filter(journal_entries::Column::TenantId.eq(tenant_id))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        let original = assemble(&txn, vec![header.clone()])
            .await?
            .pop()
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        let reversal =
            ReversalService::reversing_entry(&original, voided_by, Utc::now().date_naive())?;
        let reversal = post_in(&txn, reversal).await?;

        let mut active: journal_entries::ActiveModel = header.into();
        active.status = Set(sea_orm_active_enums::EntryStatus::Voided);
        active.reversed_by = Set(Some(reversal.id));
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await.map_err(storage)?;

        txn.commit().await.map_err(storage)?;

        tracing::info!(
            original_id = %entry_id,
            reversal_id = %reversal.id,
            "journal_entry_voided"
        );
        Ok(reversal)
    }

    /// Fetches one entry of the tenant with its lines.
    pub async fn get(&self, tenant_id: Uuid, entry_id: Uuid) -> Result<JournalEntry, LedgerError> {
        let header = journal_entries::Entity::find_by_id(entry_id)
            .filter(journal_entries::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        assemble(&self.db, vec![header])
            .await?
            .pop()
            .ok_or(LedgerError::EntryNotFound(entry_id))
    }

    /// Lists the tenant's entries, newest first.
    pub async fn list(
        &self,
        tenant_id: Uuid,
        query: &JournalQuery,
        page: PageRequest,
    ) -> Result<PageResponse<JournalEntry>, LedgerError> {
        page.validate()
            .map_err(|e| LedgerError::Validation(e.message().to_string()))?;
        if let (Some(from), Some(to)) = (query.from_date, query.to_date)
            && from > to
        {
            return Err(LedgerError::Validation(format!(
                "from_date {from} is after to_date {to}"
            )));
        }

        let mut select =
            journal_entries::Entity::find().filter(journal_entries::Column::TenantId.eq(tenant_id));
        if let Some(status) = query.status {
            select = select.filter(
                journal_entries::Column::Status.eq(sea_orm_active_enums::EntryStatus::from(status)),
            );
        }
        if let Some(from) = query.from_date {
            select = select.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = query.to_date {
            select = select.filter(journal_entries::Column::EntryDate.lte(to));
        }

        let total = select.clone().count(&self.db).await.map_err(storage)?;
        let headers = select
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(storage)?;

        let items = assemble(&self.db, headers).await?;
        Ok(PageResponse::new(items, page, total))
    }
}

/// Posts `entry` on an open connection or transaction without committing.
pub(crate) async fn post_in<C: ConnectionTrait>(
    conn: &C,
    entry: NewJournalEntry,
) -> Result<JournalEntry, LedgerError> {
    let plan = LedgerService::prepare(&entry)?;

    let locked = is_locked_in(conn, entry.tenant_id, plan.fiscal_year).await?;
    LedgerService::ensure_period_open(plan.fiscal_year, locked)?;

    let active = active_ids(conn, entry.tenant_id, plan.account_ids.iter().copied()).await?;
    LedgerService::ensure_accounts(&plan, &active)?;

    let now = Utc::now().into();
    let entry_id = Uuid::new_v4();
    let source = entry.source;

    let header = journal_entries::ActiveModel {
        id: Set(entry_id),
        tenant_id: Set(entry.tenant_id),
        entry_date: Set(entry.entry_date),
        description: Set(entry.description),
        reference: Set(entry.reference),
        source: Set(source.into()),
        source_id: Set(entry.source_id),
        status: Set(EntryStatus::Posted.into()),
        reversed_by: Set(None),
        created_by: Set(entry.created_by),
        fiscal_year: Set(plan.fiscal_year),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(storage)?;

    let lines: Vec<journal_lines::ActiveModel> = entry
        .lines
        .iter()
        .zip(1..)
        .map(|(line, line_no)| journal_lines::ActiveModel {
            id: Set(Uuid::new_v4()),
            entry_id: Set(entry_id),
            line_no: Set(line_no),
            account_id: Set(line.account_id()),
            debit: Set(line.debit_amount()),
            credit: Set(line.credit_amount()),
            description: Set(line.description().map(ToString::to_string)),
            created_at: Set(now),
        })
        .collect();
    journal_lines::Entity::insert_many(lines)
        .exec_without_returning(conn)
        .await
        .map_err(storage)?;

    let posted = assemble(conn, vec![header])
        .await?
        .pop()
        .ok_or(LedgerError::EntryNotFound(entry_id))?;

    tracing::info!(
        entry_id = %posted.id,
        tenant_id = %posted.tenant_id,
        amount = %plan.total_debit,
        source = source.as_str(),
        "journal_entry_posted"
    );
    Ok(posted)
}

/// Loads the lines of `headers` and joins account codes and names.
async fn assemble<C: ConnectionTrait>(
    conn: &C,
    headers: Vec<journal_entries::Model>,
) -> Result<Vec<JournalEntry>, LedgerError> {
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let rows = journal_lines::Entity::find()
        .filter(journal_lines::Column::EntryId.is_in(headers.iter().map(|h| h.id)))
        .find_also_related(accounts::Entity)
        .order_by_asc(journal_lines::Column::EntryId)
        .order_by_asc(journal_lines::Column::LineNo)
        .all(conn)
        .await
        .map_err(storage)?;

    let mut by_entry: HashMap<Uuid, Vec<JournalLine>> = HashMap::new();
    for (line, account) in rows {
        by_entry.entry(line.entry_id).or_default().push(JournalLine {
            id: line.id,
            account_id: line.account_id,
            account_code: account.as_ref().map(|a| a.code.clone()),
            account_name: account.map(|a| a.name),
            debit: line.debit,
            credit: line.credit,
            description: line.description,
        });
    }

    Ok(headers
        .into_iter()
        .map(|h| JournalEntry {
            lines: by_entry.remove(&h.id).unwrap_or_default(),
            id: h.id,
            tenant_id: h.tenant_id,
            entry_date: h.entry_date,
            description: h.description,
            reference: h.reference,
            source: h.source.into(),
            source_id: h.source_id,
            status: h.status.into(),
            reversed_by: h.reversed_by,
            created_by: h.created_by,
            fiscal_year: h.fiscal_year,
            created_at: h.created_at.with_timezone(&Utc),
        })
        .collect())
}
