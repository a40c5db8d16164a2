//! Chart of accounts, journal, report and year-lock routes.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use bizbooks_core::coa::{AccountSubType, AccountType, AccountUpdate, NewAccount};
use bizbooks_core::ledger::{EntrySource, EntryStatus, JournalQuery, LineSpec, NewJournalEntry};
use bizbooks_db::{
    AccountRepository, FinancialYearRepository, JournalRepository, ReportRepository,
};
use bizbooks_shared::types::PageRequest;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extractors::TenantContext};

/// Creates the accounting routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounting/coa", get(get_coa).post(create_account))
        .route("/accounting/coa/seed", post(seed_coa))
        .route(
            "/accounting/coa/{id}",
            patch(update_account).delete(deactivate_account),
        )
        .route(
            "/accounting/journal-entries",
            get(list_entries).post(post_entry),
        )
        .route("/accounting/journal-entries/{id}", get(get_entry))
        .route("/accounting/journal-entries/{id}/void", post(void_entry))
        .route("/accounting/trial-balance", get(trial_balance))
        .route("/accounting/general-ledger", get(general_ledger))
        .route("/accounting/lock-year", post(lock_year))
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// Distinguishes an absent field from an explicit `null`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================
// Chart of accounts
// ============================================================

/// Query parameters for the account tree.
#[derive(Debug, Default, Deserialize)]
pub struct CoaQuery {
    /// Include deactivated accounts.
    #[serde(default)]
    pub include_inactive: bool,
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account code, unique per tenant.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Optional sub-type.
    pub sub_type: Option<AccountSubType>,
    /// Optional parent account.
    pub parent_id: Option<Uuid>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Request body for updating an account.
///
/// `parent_id: null` moves the account to the root; omitting it leaves the
/// parent unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// New display name.
    pub name: Option<String>,
    /// New parent.
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<Uuid>>,
}

/// GET `/accounting/coa` - Account tree.
async fn get_coa(
    State(state): State<AppState>,
    ctx: TenantContext,
    query: Result<Query<CoaQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let repo = AccountRepository::new((*state.db).clone());
    let tree = repo.get_tree(ctx.tenant_id, query.include_inactive).await?;
    Ok(Json(json!({ "accounts": tree })))
}

/// POST `/accounting/coa` - Create a custom account.
async fn create_account(
    State(state): State<AppState>,
    ctx: TenantContext,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let repo = AccountRepository::new((*state.db).clone());
    let account = repo
        .create(NewAccount {
            tenant_id: ctx.tenant_id,
            code: body.code,
            name: body.name,
            account_type: body.account_type,
            sub_type: body.sub_type,
            parent_id: body.parent_id,
            description: body.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// PATCH `/accounting/coa/{id}` - Rename and/or move an account.
async fn update_account(
    State(state): State<AppState>,
    ctx: TenantContext,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    let Json(body) = payload?;
    let changes = AccountUpdate {
        name: body.name,
        parent_id: body.parent_id,
    };
    if changes.is_empty() {
        return Err(ApiError::bad_request("Nothing to update"));
    }

    let repo = AccountRepository::new((*state.db).clone());
    let account = repo.update(ctx.tenant_id, id, changes).await?;
    Ok(Json(account))
}

/// DELETE `/accounting/coa/{id}` - Deactivate an account.
async fn deactivate_account(
    State(state): State<AppState>,
    ctx: TenantContext,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    let repo = AccountRepository::new((*state.db).clone());
    repo.deactivate(ctx.tenant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/accounting/coa/seed` - Seed the default chart of accounts.
async fn seed_coa(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());
    let report = repo.seed_defaults(ctx.tenant_id).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

// ============================================================
// Journal
// ============================================================

/// Query parameters for listing journal entries.
#[derive(Debug, Default, Deserialize)]
pub struct ListEntriesQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub page_size: Option<u32>,
    /// Status filter: draft, posted or voided.
    pub status: Option<String>,
    /// Entries dated on or after.
    pub from_date: Option<NaiveDate>,
    /// Entries dated on or before.
    pub to_date: Option<NaiveDate>,
}

/// One line of a manual journal entry.
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    /// Account to post to.
    pub account_id: Uuid,
    /// Debit amount.
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(default)]
    pub credit: Decimal,
    /// Line memo.
    pub description: Option<String>,
}

/// Request body for posting a manual journal entry.
#[derive(Debug, Deserialize)]
pub struct PostEntryRequest {
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Narrative.
    #[serde(default)]
    pub description: String,
    /// External reference.
    pub reference: Option<String>,
    /// Lines; debits must equal credits.
    pub lines: Vec<LineRequest>,
}

/// GET `/accounting/journal-entries` - List entries, newest first.
async fn list_entries(
    State(state): State<AppState>,
    ctx: TenantContext,
    query: Result<Query<ListEntriesQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let defaults = PageRequest::default();
    let page = PageRequest::new(
        query.page.unwrap_or(defaults.page),
        query.page_size.unwrap_or(defaults.page_size),
    )?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<EntryStatus>)
        .transpose()?;

    let repo = JournalRepository::new((*state.db).clone());
    let entries = repo
        .list(
            ctx.tenant_id,
            &JournalQuery {
                status,
                from_date: query.from_date,
                to_date: query.to_date,
            },
            page,
        )
        .await?;
    Ok(Json(entries))
}

/// POST `/accounting/journal-entries` - Post a manual entry.
async fn post_entry(
    State(state): State<AppState>,
    ctx: TenantContext,
    payload: Result<Json<PostEntryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let lines = body
        .lines
        .into_iter()
        .map(|l| LineSpec::new(l.account_id, l.debit, l.credit, l.description))
        .collect::<Result<Vec<_>, _>>()?;

    let repo = JournalRepository::new((*state.db).clone());
    let entry = repo
        .post(NewJournalEntry {
            tenant_id: ctx.tenant_id,
            entry_date: body.entry_date,
            description: body.description,
            reference: body.reference,
            source: EntrySource::Manual,
            source_id: None,
            created_by: ctx.user_id,
            lines,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET `/accounting/journal-entries/{id}` - One entry with its lines.
async fn get_entry(
    State(state): State<AppState>,
    ctx: TenantContext,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    let repo = JournalRepository::new((*state.db).clone());
    Ok(Json(repo.get(ctx.tenant_id, id).await?))
}

/// POST `/accounting/journal-entries/{id}/void` - Void by reversal.
async fn void_entry(
    State(state): State<AppState>,
    ctx: TenantContext,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    let repo = JournalRepository::new((*state.db).clone());
    let reversal = repo.void(ctx.tenant_id, id, ctx.user_id).await?;
    Ok(Json(json!({
        "voided_entry_id": id,
        "reversal": reversal,
    })))
}

// ============================================================
// Reports
// ============================================================

/// Query parameters for the trial balance.
#[derive(Debug, Default, Deserialize)]
pub struct TrialBalanceQuery {
    /// Report date; defaults to today.
    pub as_of: Option<NaiveDate>,
}

/// Query parameters for the general ledger.
#[derive(Debug, Deserialize)]
pub struct GeneralLedgerQuery {
    /// Account to report on.
    pub account_id: Uuid,
    /// Window start (inclusive).
    pub from_date: Option<NaiveDate>,
    /// Window end (inclusive).
    pub to_date: Option<NaiveDate>,
}

/// GET `/accounting/trial-balance` - Trial balance as of a date.
async fn trial_balance(
    State(state): State<AppState>,
    ctx: TenantContext,
    query: Result<Query<TrialBalanceQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let repo = ReportRepository::new((*state.db).clone());
    Ok(Json(repo.trial_balance(ctx.tenant_id, query.as_of).await?))
}

/// GET `/accounting/general-ledger` - Running-balance ledger of one account.
async fn general_ledger(
    State(state): State<AppState>,
    ctx: TenantContext,
    query: Result<Query<GeneralLedgerQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let repo = ReportRepository::new((*state.db).clone());
    let ledger = repo
        .general_ledger(ctx.tenant_id, query.account_id, query.from_date, query.to_date)
        .await?;
    Ok(Json(ledger))
}

// ============================================================
// Year lock
// ============================================================

/// Request body for locking a financial year.
#[derive(Debug, Deserialize)]
pub struct LockYearRequest {
    /// Calendar year to lock.
    pub year: i32,
}

/// POST `/accounting/lock-year` - Lock a financial year.
async fn lock_year(
    State(state): State<AppState>,
    ctx: TenantContext,
    payload: Result<Json<LockYearRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    if !(1900..=9999).contains(&body.year) {
        return Err(ApiError::bad_request(format!(
            "year must be between 1900 and 9999, got {}",
            body.year
        )));
    }

    let repo = FinancialYearRepository::new((*state.db).clone());
    let year = repo.lock(ctx.tenant_id, body.year, ctx.user_id).await?;
    Ok(Json(year))
}
