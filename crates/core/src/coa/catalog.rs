//! Default chart of accounts seeded for every tenant.

use std::collections::{HashMap, HashSet};

use super::types::{AccountSubType, AccountType};
use crate::ledger::LedgerError;

/// A catalog entry. Parents are referenced by code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultAccount {
    /// Account code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Account type.
    pub account_type: AccountType,
    /// Sub-type.
    pub sub_type: AccountSubType,
    /// Parent code, `None` for roots.
    pub parent_code: Option<&'static str>,
}

const fn entry(
    code: &'static str,
    name: &'static str,
    account_type: AccountType,
    sub_type: AccountSubType,
    parent_code: Option<&'static str>,
) -> DefaultAccount {
    DefaultAccount {
        code,
        name,
        account_type,
        sub_type,
        parent_code,
    }
}

use AccountSubType as S;
use AccountType as T;

/// System accounts created by seeding. All of them are protected.
pub const DEFAULT_ACCOUNTS: &[DefaultAccount] = &[
    // Assets
    entry("1000", "Assets", T::Asset, S::CurrentAsset, None),
    entry("1010", "Cash in Hand", T::Asset, S::BankCash, Some("1000")),
    entry("1020", "Bank Accounts", T::Asset, S::BankCash, Some("1000")),
    entry("1100", "Accounts Receivable", T::Asset, S::CurrentAsset, Some("1000")),
    entry("1200", "Inventory", T::Asset, S::CurrentAsset, Some("1000")),
    entry("1300", "Prepaid Expenses", T::Asset, S::CurrentAsset, Some("1000")),
    entry("1500", "Fixed Assets", T::Asset, S::NonCurrentAsset, Some("1000")),
    entry("1510", "Accumulated Depreciation", T::Asset, S::NonCurrentAsset, Some("1500")),
    // Liabilities
    entry("2000", "Liabilities", T::Liability, S::CurrentLiability, None),
    entry("2010", "Accounts Payable", T::Liability, S::CurrentLiability, Some("2000")),
    entry("2100", "GST Payable", T::Liability, S::CurrentLiability, Some("2000")),
    entry("2110", "CGST Payable", T::Liability, S::CurrentLiability, Some("2100")),
    entry("2120", "SGST Payable", T::Liability, S::CurrentLiability, Some("2100")),
    entry("2130", "IGST Payable", T::Liability, S::CurrentLiability, Some("2100")),
    entry("2200", "Short-term Borrowings", T::Liability, S::CurrentLiability, Some("2000")),
    entry("2500", "Long-term Borrowings", T::Liability, S::NonCurrentLiability, Some("2000")),
    // Equity
    entry("3000", "Equity", T::Equity, S::Equity, None),
    entry("3010", "Share Capital", T::Equity, S::Equity, Some("3000")),
    entry("3020", "Retained Earnings", T::Equity, S::Equity, Some("3000")),
    // Income
    entry("4000", "Revenue from Operations", T::Income, S::Revenue, None),
    entry("4010", "Service Revenue", T::Income, S::Revenue, Some("4000")),
    entry("4020", "Product Sales", T::Income, S::Revenue, Some("4000")),
    entry("4100", "Other Income", T::Income, S::OtherIncome, Some("4000")),
    // Expenses
    entry("5000", "Expenses", T::Expense, S::OtherExpense, None),
    entry("5010", "Cost of Goods Sold", T::Expense, S::Cogs, Some("5000")),
    entry("5100", "Employee Benefit Expense", T::Expense, S::EmployeeExpense, Some("5000")),
    entry("5200", "Depreciation & Amortisation", T::Expense, S::Depreciation, Some("5000")),
    entry("5300", "Finance Costs", T::Expense, S::FinanceCost, Some("5000")),
    entry("5400", "Other Expenses", T::Expense, S::OtherExpense, Some("5000")),
    entry("5410", "Rent", T::Expense, S::OtherExpense, Some("5400")),
    entry("5420", "Utilities", T::Expense, S::OtherExpense, Some("5400")),
    entry("5430", "Marketing & Advertising", T::Expense, S::OtherExpense, Some("5400")),
    entry("5440", "Travel & Conveyance", T::Expense, S::OtherExpense, Some("5400")),
];

/// Returns the catalog entries missing from `existing_codes`, parents first.
///
/// Entries are ordered by depth in the hierarchy, then by code, so the result
/// does not depend on the order of `catalog`. A parent code may refer to a
/// catalog entry or to an account that already exists for the tenant.
///
/// # Errors
///
/// Returns `LedgerError::Validation` if the catalog references an unknown
/// parent code, contains a duplicate code, or contains a cycle.
pub fn seed_plan<'a>(
    catalog: &'a [DefaultAccount],
    existing_codes: &HashSet<String>,
) -> Result<Vec<&'a DefaultAccount>, LedgerError> {
    let mut by_code: HashMap<&str, &DefaultAccount> = HashMap::with_capacity(catalog.len());
    for account in catalog {
        if by_code.insert(account.code, account).is_some() {
            return Err(LedgerError::Validation(format!(
                "Duplicate code '{}' in account catalog",
                account.code
            )));
        }
    }

    let mut depths: HashMap<&str, usize> = HashMap::with_capacity(catalog.len());
    for account in catalog {
        let depth = depth_of(account, &by_code, existing_codes)?;
        depths.insert(account.code, depth);
    }

    let mut plan: Vec<&DefaultAccount> = catalog
        .iter()
        .filter(|a| !existing_codes.contains(a.code))
        .collect();
    plan.sort_by(|a, b| {
        depths[a.code]
            .cmp(&depths[b.code])
            .then_with(|| a.code.cmp(b.code))
    });
    Ok(plan)
}

fn depth_of(
    account: &DefaultAccount,
    by_code: &HashMap<&str, &DefaultAccount>,
    existing_codes: &HashSet<String>,
) -> Result<usize, LedgerError> {
    let mut depth = 0;
    let mut current = account;
    while let Some(parent_code) = current.parent_code {
        depth += 1;
        if depth > by_code.len() {
            return Err(LedgerError::Validation(format!(
                "Account catalog has a parent cycle through '{}'",
                account.code
            )));
        }
        match by_code.get(parent_code) {
            Some(parent) => current = parent,
            None if existing_codes.contains(parent_code) => break,
            None => {
                return Err(LedgerError::Validation(format!(
                    "Account '{}' references unknown parent code '{parent_code}'",
                    current.code
                )));
            }
        }
    }
    Ok(depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(plan: &[&DefaultAccount], code: &str) -> usize {
        plan.iter().position(|a| a.code == code).unwrap()
    }

    #[test]
    fn test_catalog_entries_are_consistent() {
        assert_eq!(DEFAULT_ACCOUNTS.len(), 33);
        for account in DEFAULT_ACCOUNTS {
            assert!(
                account.account_type.allows(account.sub_type),
                "{} has mismatched sub-type",
                account.code
            );
        }
    }

    #[test]
    fn test_full_plan_puts_parents_first() {
        let plan = seed_plan(DEFAULT_ACCOUNTS, &HashSet::new()).unwrap();
        assert_eq!(plan.len(), DEFAULT_ACCOUNTS.len());
        for account in &plan {
            if let Some(parent) = account.parent_code {
                assert!(position(&plan, parent) < position(&plan, account.code));
            }
        }
        assert_eq!(plan[0].code, "1000");
    }

    #[test]
    fn test_plan_skips_existing_codes() {
        let existing: HashSet<String> = ["1000", "2100", "5410"].iter().map(ToString::to_string).collect();
        let plan = seed_plan(DEFAULT_ACCOUNTS, &existing).unwrap();
        assert_eq!(plan.len(), DEFAULT_ACCOUNTS.len() - 3);
        assert!(plan.iter().all(|a| !existing.contains(a.code)));
        // children of an existing parent are still planned
        assert!(plan.iter().any(|a| a.code == "2110"));
    }

    #[test]
    fn test_plan_is_independent_of_literal_order() {
        let mut reversed: Vec<DefaultAccount> = DEFAULT_ACCOUNTS.to_vec();
        reversed.reverse();
        let forward: Vec<&str> = seed_plan(DEFAULT_ACCOUNTS, &HashSet::new())
            .unwrap()
            .iter()
            .map(|a| a.code)
            .collect();
        let backward: Vec<&str> = seed_plan(&reversed, &HashSet::new())
            .unwrap()
            .iter()
            .map(|a| a.code)
            .collect();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_existing_parent_outside_catalog() {
        let catalog = [entry("9010", "Suspense", T::Asset, S::CurrentAsset, Some("9000"))];
        assert!(seed_plan(&catalog, &HashSet::new()).is_err());

        let existing: HashSet<String> = std::iter::once("9000".to_string()).collect();
        let plan = seed_plan(&catalog, &existing).unwrap();
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_cyclic_catalog_rejected() {
        let catalog = [
            entry("1", "A", T::Asset, S::CurrentAsset, Some("2")),
            entry("2", "B", T::Asset, S::CurrentAsset, Some("1")),
        ];
        assert!(matches!(
            seed_plan(&catalog, &HashSet::new()),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_duplicate_catalog_code_rejected() {
        let catalog = [
            entry("1", "A", T::Asset, S::CurrentAsset, None),
            entry("1", "B", T::Asset, S::CurrentAsset, None),
        ];
        assert!(seed_plan(&catalog, &HashSet::new()).is_err());
    }
}
