//! Report repository: trial balance and general ledger queries.
//!
//! Aggregation runs in SQL, shaping runs in `ReportService`. Both reports
//! count posted and voided entries, so a void and its reversal cancel out.

use bizbooks_core::ledger::LedgerError;
use bizbooks_core::reports::{
    AccountTotals, GeneralLedger, LedgerAccount, PostedLine, ReportService, TrialBalance,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult, QueryFilter,
    Statement,
};
use uuid::Uuid;

use super::storage;
use crate::entities::accounts;
use crate::entities::sea_orm_active_enums::{AccountSubType, AccountType};

const TRIAL_BALANCE_SQL: &str = r"
SELECT
    a.id AS account_id,
    a.code,
    a.name,
    a.account_type,
    a.sub_type,
    COALESCE(SUM(t.debit), 0) AS total_debit,
    COALESCE(SUM(t.credit), 0) AS total_credit
FROM accounts a
LEFT JOIN (
    SELECT l.account_id, l.debit, l.credit
    FROM journal_lines l
    JOIN journal_entries e ON e.id = l.entry_id
    WHERE e.tenant_id = $1
      AND e.status IN ('posted', 'voided')
      AND e.entry_date <= $2
) t ON t.account_id = a.id
WHERE a.tenant_id = $1
  AND a.is_active
GROUP BY a.id, a.code, a.name, a.account_type, a.sub_type
ORDER BY a.code
";

const GENERAL_LEDGER_SQL: &str = r"
SELECT
    e.id AS entry_id,
    e.entry_date,
    e.created_at,
    e.reference,
    e.description AS entry_description,
    l.description AS line_description,
    l.debit,
    l.credit
FROM journal_lines l
JOIN journal_entries e ON e.id = l.entry_id
WHERE e.tenant_id = $1
  AND l.account_id = $2
  AND e.status IN ('posted', 'voided')
  AND ($3::date IS NULL OR e.entry_date >= $3)
  AND ($4::date IS NULL OR e.entry_date <= $4)
ORDER BY e.entry_date, e.created_at, l.line_no
";

#[derive(Debug, FromQueryResult)]
struct TotalsRow {
    account_id: Uuid,
    code: String,
    name: String,
    account_type: AccountType,
    sub_type: Option<AccountSubType>,
    total_debit: Decimal,
    total_credit: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct LineRow {
    entry_id: Uuid,
    entry_date: NaiveDate,
    created_at: chrono::DateTime<chrono::FixedOffset>,
    reference: Option<String>,
    entry_description: String,
    line_description: Option<String>,
    debit: Decimal,
    credit: Decimal,
}

/// Repository for financial reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Trial balance of the tenant's active accounts as of a date,
    /// defaulting to today.
    pub async fn trial_balance(
        &self,
        tenant_id: Uuid,
        as_of: Option<NaiveDate>,
    ) -> Result<TrialBalance, LedgerError> {
        let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());

        let rows = TotalsRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            TRIAL_BALANCE_SQL,
            [tenant_id.into(), as_of.into()],
        ))
        .all(&self.db)
        .await
        .map_err(storage)?;

        let totals = rows
            .into_iter()
            .map(|r| AccountTotals {
                account_id: r.account_id,
                code: r.code,
                name: r.name,
                account_type: r.account_type.into(),
                sub_type: r.sub_type.map(Into::into),
                total_debit: r.total_debit,
                total_credit: r.total_credit,
            })
            .collect();

        Ok(ReportService::trial_balance(as_of, totals))
    }

    /// General ledger of one account over an optional date window.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account is not the tenant's and
    /// `Validation` if `from` is after `to`.
    pub async fn general_ledger(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<GeneralLedger, LedgerError> {
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(LedgerError::Validation(format!(
                "from_date {from} is after to_date {to}"
            )));
        }

        let account = accounts::Entity::find_by_id(account_id)
            .filter(accounts::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::AccountNotFound(account_id))?;

        let rows = LineRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            GENERAL_LEDGER_SQL,
            [tenant_id.into(), account_id.into(), from.into(), to.into()],
        ))
        .all(&self.db)
        .await
        .map_err(storage)?;

        let lines = rows
            .into_iter()
            .map(|r| PostedLine {
                entry_id: r.entry_id,
                entry_date: r.entry_date,
                created_at: r.created_at.with_timezone(&Utc),
                reference: r.reference,
                entry_description: r.entry_description,
                line_description: r.line_description,
                debit: r.debit,
                credit: r.credit,
            })
            .collect();

        let ledger_account = LedgerAccount {
            id: account.id,
            code: account.code,
            name: account.name,
            account_type: account.account_type.into(),
        };

        Ok(ReportService::general_ledger(ledger_account, from, to, lines))
    }
}
