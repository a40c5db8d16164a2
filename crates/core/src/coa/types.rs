//! Chart of accounts domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::LedgerError;

/// Maximum length of an account code.
pub const MAX_CODE_LEN: usize = 20;
/// Maximum length of an account name.
pub const MAX_NAME_LEN: usize = 255;

/// Top-level account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned.
    Asset,
    /// Obligations owed.
    Liability,
    /// Owners' residual interest.
    Equity,
    /// Revenue and other income.
    Income,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// All account types in chart order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Income,
        Self::Expense,
    ];

    /// Returns the string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Sub-types that may be used with this type.
    #[must_use]
    pub const fn sub_types(self) -> &'static [AccountSubType] {
        use AccountSubType as S;
        match self {
            Self::Asset => &[S::CurrentAsset, S::NonCurrentAsset, S::BankCash],
            Self::Liability => &[S::CurrentLiability, S::NonCurrentLiability],
            Self::Equity => &[S::Equity],
            Self::Income => &[S::Revenue, S::OtherIncome],
            Self::Expense => &[
                S::Cogs,
                S::EmployeeExpense,
                S::Depreciation,
                S::FinanceCost,
                S::OtherExpense,
            ],
        }
    }

    /// Returns true if `sub_type` belongs under this type.
    #[must_use]
    pub fn allows(self, sub_type: AccountSubType) -> bool {
        self.sub_types().contains(&sub_type)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| LedgerError::Validation(format!("Unknown account type: {s}")))
    }
}

/// Finer account classification used by reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountSubType {
    /// Current asset.
    CurrentAsset,
    /// Non-current asset.
    NonCurrentAsset,
    /// Cash and bank balances.
    BankCash,
    /// Current liability.
    CurrentLiability,
    /// Non-current liability.
    NonCurrentLiability,
    /// Equity.
    Equity,
    /// Revenue from operations.
    Revenue,
    /// Other income.
    OtherIncome,
    /// Cost of goods sold.
    Cogs,
    /// Employee benefit expense.
    EmployeeExpense,
    /// Depreciation and amortisation.
    Depreciation,
    /// Finance costs.
    FinanceCost,
    /// Other expenses.
    OtherExpense,
}

impl AccountSubType {
    const ALL: [Self; 13] = [
        Self::CurrentAsset,
        Self::NonCurrentAsset,
        Self::BankCash,
        Self::CurrentLiability,
        Self::NonCurrentLiability,
        Self::Equity,
        Self::Revenue,
        Self::OtherIncome,
        Self::Cogs,
        Self::EmployeeExpense,
        Self::Depreciation,
        Self::FinanceCost,
        Self::OtherExpense,
    ];

    /// Returns the string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CurrentAsset => "current_asset",
            Self::NonCurrentAsset => "non_current_asset",
            Self::BankCash => "bank_cash",
            Self::CurrentLiability => "current_liability",
            Self::NonCurrentLiability => "non_current_liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::OtherIncome => "other_income",
            Self::Cogs => "cogs",
            Self::EmployeeExpense => "employee_expense",
            Self::Depreciation => "depreciation",
            Self::FinanceCost => "finance_cost",
            Self::OtherExpense => "other_expense",
        }
    }
}

impl fmt::Display for AccountSubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountSubType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| LedgerError::Validation(format!("Unknown account sub-type: {s}")))
    }
}

/// One node of a tenant's chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Parent account, if any.
    pub parent_id: Option<Uuid>,
    /// Code, unique per tenant.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Optional sub-type.
    pub sub_type: Option<AccountSubType>,
    /// Seeded and protected.
    pub is_system: bool,
    /// Soft-deactivation flag.
    pub is_active: bool,
    /// Free-text description.
    pub description: Option<String>,
}

impl Account {
    /// Rejects changes to code, type or parent of a system account.
    ///
    /// `action` completes the sentence "System accounts cannot be ...".
    pub fn ensure_editable(&self, action: &'static str) -> Result<(), LedgerError> {
        if self.is_system {
            return Err(LedgerError::SystemAccountProtected(action));
        }
        Ok(())
    }

    /// Checks that the account may be deactivated.
    pub fn ensure_can_deactivate(&self) -> Result<(), LedgerError> {
        self.ensure_editable("deactivated")?;
        if !self.is_active {
            return Err(LedgerError::AccountAlreadyInactive(self.id));
        }
        Ok(())
    }
}

/// Input for creating a custom account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Code, unique per tenant.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Optional sub-type; must belong to `account_type`.
    pub sub_type: Option<AccountSubType>,
    /// Optional parent in the same tenant.
    pub parent_id: Option<Uuid>,
    /// Free-text description.
    pub description: Option<String>,
}

impl NewAccount {
    /// Validates field shapes. Parent and uniqueness checks need storage.
    pub fn validate(&self) -> Result<(), LedgerError> {
        validate_code(&self.code)?;
        validate_name(&self.name)?;
        if let Some(sub_type) = self.sub_type
            && !self.account_type.allows(sub_type)
        {
            return Err(LedgerError::Validation(format!(
                "Sub-type '{sub_type}' is not valid for account type '{}'",
                self.account_type
            )));
        }
        Ok(())
    }
}

/// Changes to an existing account, applied together or not at all.
///
/// `parent_id: Some(None)` moves the account to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New parent.
    pub parent_id: Option<Option<Uuid>>,
}

impl AccountUpdate {
    /// True when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.parent_id.is_none()
    }

    /// Checks the requested changes against the stored account.
    pub fn check(&self, account: &Account) -> Result<(), LedgerError> {
        if let Some(name) = self.name.as_deref() {
            validate_name(name)?;
            account.ensure_editable("renamed")?;
        }
        if self.parent_id.is_some() {
            account.ensure_editable("moved")?;
        }
        Ok(())
    }
}

/// Validates an account code.
pub fn validate_code(code: &str) -> Result<(), LedgerError> {
    if code.is_empty() {
        return Err(LedgerError::Validation("Account code is required".into()));
    }
    if code.chars().count() > MAX_CODE_LEN {
        return Err(LedgerError::Validation(format!(
            "Account code must be at most {MAX_CODE_LEN} characters"
        )));
    }
    if code.chars().any(char::is_whitespace) {
        return Err(LedgerError::Validation(
            "Account code must not contain whitespace".into(),
        ));
    }
    Ok(())
}

/// Validates an account name.
pub fn validate_name(name: &str) -> Result<(), LedgerError> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation("Account name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(LedgerError::Validation(format!(
            "Account name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Checks that a parent account exists in the same tenant.
///
/// `parent` is the looked-up row for `parent_id`, if any was found.
pub fn validate_parent(
    tenant_id: Uuid,
    parent_id: Uuid,
    parent: Option<&Account>,
) -> Result<(), LedgerError> {
    match parent {
        Some(p) if p.tenant_id == tenant_id => Ok(()),
        _ => Err(LedgerError::InvalidParent(parent_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ErrorKind;
    use rstest::rstest;

    fn new_account(code: &str, account_type: AccountType, sub_type: Option<AccountSubType>) -> NewAccount {
        NewAccount {
            tenant_id: Uuid::new_v4(),
            code: code.to_string(),
            name: "Petty Cash".to_string(),
            account_type,
            sub_type,
            parent_id: None,
            description: None,
        }
    }

    fn account(is_system: bool, is_active: bool) -> Account {
        Account {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            parent_id: None,
            code: "1015".into(),
            name: "Petty Cash".into(),
            account_type: AccountType::Asset,
            sub_type: Some(AccountSubType::BankCash),
            is_system,
            is_active,
            description: None,
        }
    }

    #[rstest]
    #[case(AccountType::Asset, AccountSubType::BankCash, true)]
    #[case(AccountType::Asset, AccountSubType::Revenue, false)]
    #[case(AccountType::Liability, AccountSubType::NonCurrentLiability, true)]
    #[case(AccountType::Equity, AccountSubType::Equity, true)]
    #[case(AccountType::Income, AccountSubType::OtherIncome, true)]
    #[case(AccountType::Income, AccountSubType::Cogs, false)]
    #[case(AccountType::Expense, AccountSubType::FinanceCost, true)]
    fn test_type_allows_sub_type(
        #[case] account_type: AccountType,
        #[case] sub_type: AccountSubType,
        #[case] expected: bool,
    ) {
        assert_eq!(account_type.allows(sub_type), expected);
    }

    #[test]
    fn test_string_round_trip() {
        for t in AccountType::ALL {
            assert_eq!(t.as_str().parse::<AccountType>().unwrap(), t);
        }
        assert_eq!(
            "non_current_asset".parse::<AccountSubType>().unwrap(),
            AccountSubType::NonCurrentAsset
        );
        assert!("revenue_stream".parse::<AccountSubType>().is_err());
        assert!("Asset".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_serde_names_match_storage_names() {
        let json = serde_json::to_string(&AccountSubType::EmployeeExpense).unwrap();
        assert_eq!(json, "\"employee_expense\"");
        let json = serde_json::to_string(&AccountType::Income).unwrap();
        assert_eq!(json, "\"income\"");
    }

    #[rstest]
    #[case("")]
    #[case("10 15")]
    #[case("123456789012345678901")]
    fn test_invalid_codes(#[case] code: &str) {
        let err = new_account(code, AccountType::Asset, None).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_sub_type_must_match_type() {
        let input = new_account("1015", AccountType::Asset, Some(AccountSubType::Cogs));
        assert!(matches!(input.validate(), Err(LedgerError::Validation(_))));

        let input = new_account("1015", AccountType::Asset, Some(AccountSubType::BankCash));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_system_account_cannot_be_deactivated() {
        assert!(matches!(
            account(true, true).ensure_can_deactivate(),
            Err(LedgerError::SystemAccountProtected("deactivated"))
        ));
        assert!(matches!(
            account(false, false).ensure_can_deactivate(),
            Err(LedgerError::AccountAlreadyInactive(_))
        ));
        assert!(account(false, true).ensure_can_deactivate().is_ok());
    }

    #[test]
    fn test_parent_must_share_tenant() {
        let parent = account(false, true);
        assert!(validate_parent(parent.tenant_id, parent.id, Some(&parent)).is_ok());
        assert!(matches!(
            validate_parent(Uuid::new_v4(), parent.id, Some(&parent)),
            Err(LedgerError::InvalidParent(_))
        ));
        assert!(matches!(
            validate_parent(parent.tenant_id, parent.id, None),
            Err(LedgerError::InvalidParent(_))
        ));
    }

    #[test]
    fn test_account_update_checks_every_field() {
        let custom = account(false, true);
        let system = account(true, true);

        let rename = AccountUpdate {
            name: Some("Petty".to_string()),
            parent_id: None,
        };
        assert!(rename.check(&custom).is_ok());
        assert!(matches!(
            rename.check(&system),
            Err(LedgerError::SystemAccountProtected("renamed"))
        ));

        let to_root = AccountUpdate {
            name: None,
            parent_id: Some(None),
        };
        assert!(matches!(
            to_root.check(&system),
            Err(LedgerError::SystemAccountProtected("moved"))
        ));

        let blank = AccountUpdate {
            name: Some("  ".to_string()),
            parent_id: Some(None),
        };
        assert!(matches!(blank.check(&custom), Err(LedgerError::Validation(_))));
        assert!(AccountUpdate::default().is_empty());
    }
}
