//! Account repository for chart of accounts database operations.

use std::collections::{HashMap, HashSet};

use bizbooks_core::coa::{
    Account, AccountNode, AccountTree, AccountUpdate, DEFAULT_ACCOUNTS, NewAccount,
    ensure_acyclic, seed_plan, validate_parent,
};
use bizbooks_core::ledger::LedgerError;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use super::{is_unique_violation, storage};
use crate::entities::accounts;

/// Outcome of seeding the default chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Accounts inserted by this call.
    pub created: usize,
    /// Catalog accounts that already existed.
    pub skipped: usize,
}

/// Repository for chart of accounts operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts every catalog account the tenant does not have yet.
    ///
    /// Safe to call repeatedly and concurrently: existing codes are skipped
    /// and an insert that races with another seeder is ignored.
    pub async fn seed_defaults(&self, tenant_id: Uuid) -> Result<SeedReport, LedgerError> {
        let txn = self.db.begin().await.map_err(storage)?;

        let existing = accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant_id))
            .all(&txn)
            .await
            .map_err(storage)?;
        let existing_codes: HashSet<String> = existing.iter().map(|a| a.code.clone()).collect();
        let mut ids: HashMap<String, Uuid> =
            existing.into_iter().map(|a| (a.code, a.id)).collect();

        let plan = seed_plan(DEFAULT_ACCOUNTS, &existing_codes)?;
        let mut created = 0;

        for default in plan {
            let parent_id = match default.parent_code {
                Some(code) => Some(ids.get(code).copied().ok_or_else(|| {
                    LedgerError::Validation(format!("Parent account {code} missing while seeding"))
                })?),
                None => None,
            };

            let now = chrono::Utc::now().into();
            let id = Uuid::new_v4();
            let model = accounts::ActiveModel {
                id: Set(id),
                tenant_id: Set(tenant_id),
                parent_id: Set(parent_id),
                code: Set(default.code.to_string()),
                name: Set(default.name.to_string()),
                account_type: Set(default.account_type.into()),
                sub_type: Set(Some(default.sub_type.into())),
                is_system: Set(true),
                is_active: Set(true),
                description: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            };

            let inserted = accounts::Entity::insert(model)
                .on_conflict(
                    OnConflict::columns([accounts::Column::TenantId, accounts::Column::Code])
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .map_err(storage)?;

            if inserted == 0 {
                // Another seeder won the race.
                let winner = find_by_code(&txn, tenant_id, default.code).await?;
                ids.insert(default.code.to_string(), winner.id);
            } else {
                created += 1;
                ids.insert(default.code.to_string(), id);
            }
        }

        txn.commit().await.map_err(storage)?;

        let report = SeedReport {
            created,
            skipped: DEFAULT_ACCOUNTS.len() - created,
        };
        tracing::info!(
            tenant_id = %tenant_id,
            created = report.created,
            skipped = report.skipped,
            "coa_seeded"
        );
        Ok(report)
    }

    /// Resolves an active account by code.
    pub async fn get_by_code(&self, tenant_id: Uuid, code: &str) -> Result<Account, LedgerError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant_id))
            .filter(accounts::Column::Code.eq(code))
            .filter(accounts::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(storage)?
            .ok_or_else(|| LedgerError::AccountCodeNotFound(code.to_string()))?;
        Ok(model.into())
    }

    /// Fetches an account of the tenant, active or not.
    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Account, LedgerError> {
        find_in(&self.db, tenant_id, id).await.map(Into::into)
    }

    /// Lists the tenant's accounts ordered by code.
    pub async fn list(
        &self,
        tenant_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<Account>, LedgerError> {
        let mut query = accounts::Entity::find().filter(accounts::Column::TenantId.eq(tenant_id));
        if !include_inactive {
            query = query.filter(accounts::Column::IsActive.eq(true));
        }
        let models = query
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await
            .map_err(storage)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Returns the tenant's chart of accounts as a forest of code-ordered
    /// nodes. Inactive accounts appear under their stored parent when
    /// `include_inactive` is set.
    pub async fn get_tree(
        &self,
        tenant_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<AccountNode>, LedgerError> {
        let accounts = self.list(tenant_id, include_inactive).await?;
        Ok(AccountTree::build(accounts, include_inactive).into_nodes())
    }

    /// Creates a custom (non-system) account.
    pub async fn create(&self, input: NewAccount) -> Result<Account, LedgerError> {
        input.validate()?;

        if let Some(parent_id) = input.parent_id {
            let parent = accounts::Entity::find_by_id(parent_id)
                .one(&self.db)
                .await
                .map_err(storage)?
                .map(Account::from);
            validate_parent(input.tenant_id, parent_id, parent.as_ref())?;
        }

        let now = chrono::Utc::now().into();
        let model = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(input.tenant_id),
            parent_id: Set(input.parent_id),
            code: Set(input.code.clone()),
            name: Set(input.name),
            account_type: Set(input.account_type.into()),
            sub_type: Set(input.sub_type.map(Into::into)),
            is_system: Set(false),
            is_active: Set(true),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match model.insert(&self.db).await {
            Ok(created) => Ok(created.into()),
            Err(e) if is_unique_violation(&e) => Err(LedgerError::DuplicateCode(input.code)),
            Err(e) => Err(storage(e)),
        }
    }

    /// Renames a custom account.
    pub async fn rename(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> Result<Account, LedgerError> {
        let changes = AccountUpdate {
            name: Some(name.to_string()),
            parent_id: None,
        };
        self.update(tenant_id, id, changes).await
    }

    /// Moves a custom account under another parent, or to the root.
    pub async fn move_account(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        parent_id: Option<Uuid>,
    ) -> Result<Account, LedgerError> {
        let changes = AccountUpdate {
            name: None,
            parent_id: Some(parent_id),
        };
        self.update(tenant_id, id, changes).await
    }

    /// Applies a rename and/or a move in one transaction. Nothing is written
    /// unless every change is accepted.
    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        changes: AccountUpdate,
    ) -> Result<Account, LedgerError> {
        let txn = self.db.begin().await.map_err(storage)?;

        let model = accounts::Entity::find_by_id(id)
            .filter(accounts::Column::TenantId.eq(tenant_id))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::AccountNotFound(id))?;
        changes.check(&Account::from(model.clone()))?;
        if changes.is_empty() {
            return Ok(model.into());
        }

        if let Some(Some(parent_id)) = changes.parent_id {
            let parent = accounts::Entity::find_by_id(parent_id)
                .one(&txn)
                .await
                .map_err(storage)?
                .map(Account::from);
            validate_parent(tenant_id, parent_id, parent.as_ref())?;

            let links: HashMap<Uuid, Option<Uuid>> = accounts::Entity::find()
                .select_only()
                .column(accounts::Column::Id)
                .column(accounts::Column::ParentId)
                .filter(accounts::Column::TenantId.eq(tenant_id))
                .into_tuple::<(Uuid, Option<Uuid>)>()
                .all(&txn)
                .await
                .map_err(storage)?
                .into_iter()
                .collect();
            ensure_acyclic(id, parent_id, |node| links.get(&node).copied().flatten())?;
        }

        let mut active: accounts::ActiveModel = model.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(parent_id) = changes.parent_id {
            active.parent_id = Set(parent_id);
        }
        let updated = active.update(&txn).await.map_err(storage)?;

        txn.commit().await.map_err(storage)?;
        Ok(updated.into())
    }

    /// Soft-deactivates a custom account. History stays in place but the
    /// account no longer accepts postings or appears in reports.
    pub async fn deactivate(&self, tenant_id: Uuid, id: Uuid) -> Result<Account, LedgerError> {
        let model = find_in(&self.db, tenant_id, id).await?;
        Account::from(model.clone()).ensure_can_deactivate()?;

        let mut active: accounts::ActiveModel = model.into();
        active.is_active = Set(false);
        let updated = active.update(&self.db).await.map_err(storage)?;
        Ok(updated.into())
    }
}

async fn find_in<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    id: Uuid,
) -> Result<accounts::Model, LedgerError> {
    accounts::Entity::find_by_id(id)
        .filter(accounts::Column::TenantId.eq(tenant_id))
        .one(conn)
        .await
        .map_err(storage)?
        .ok_or(LedgerError::AccountNotFound(id))
}

async fn find_by_code<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    code: &str,
) -> Result<accounts::Model, LedgerError> {
    accounts::Entity::find()
        .filter(accounts::Column::TenantId.eq(tenant_id))
        .filter(accounts::Column::Code.eq(code))
        .one(conn)
        .await
        .map_err(storage)?
        .ok_or_else(|| LedgerError::AccountCodeNotFound(code.to_string()))
}

/// Ids of the tenant's active accounts among `ids`.
pub(crate) async fn active_ids<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashSet<Uuid>, LedgerError> {
    let rows = accounts::Entity::find()
        .select_only()
        .column(accounts::Column::Id)
        .filter(accounts::Column::TenantId.eq(tenant_id))
        .filter(accounts::Column::IsActive.eq(true))
        .filter(accounts::Column::Id.is_in(ids))
        .into_tuple::<Uuid>()
        .all(conn)
        .await
        .map_err(storage)?;
    Ok(rows.into_iter().collect())
}

/// Code to id map of the tenant's active accounts among `codes`.
pub(crate) async fn active_codes<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    codes: &[&str],
) -> Result<HashMap<String, Uuid>, LedgerError> {
    let rows = accounts::Entity::find()
        .select_only()
        .column(accounts::Column::Code)
        .column(accounts::Column::Id)
        .filter(accounts::Column::TenantId.eq(tenant_id))
        .filter(accounts::Column::IsActive.eq(true))
        .filter(accounts::Column::Code.is_in(codes.iter().copied()))
        .into_tuple::<(String, Uuid)>()
        .all(conn)
        .await
        .map_err(storage)?;
    Ok(rows.into_iter().collect())
}
