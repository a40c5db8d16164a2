//! String-backed enums stored in CHECK-constrained VARCHAR columns.

use bizbooks_core::coa;
use bizbooks_core::ledger;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum AccountSubType {
    #[sea_orm(string_value = "current_asset")]
    CurrentAsset,
    #[sea_orm(string_value = "non_current_asset")]
    NonCurrentAsset,
    #[sea_orm(string_value = "bank_cash")]
    BankCash,
    #[sea_orm(string_value = "current_liability")]
    CurrentLiability,
    #[sea_orm(string_value = "non_current_liability")]
    NonCurrentLiability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "other_income")]
    OtherIncome,
    #[sea_orm(string_value = "cogs")]
    Cogs,
    #[sea_orm(string_value = "employee_expense")]
    EmployeeExpense,
    #[sea_orm(string_value = "depreciation")]
    Depreciation,
    #[sea_orm(string_value = "finance_cost")]
    FinanceCost,
    #[sea_orm(string_value = "other_expense")]
    OtherExpense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntryStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "posted")]
    Posted,
    #[sea_orm(string_value = "voided")]
    Voided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntrySource {
    #[sea_orm(string_value = "manual")]
    Manual,
    #[sea_orm(string_value = "invoice")]
    Invoice,
    #[sea_orm(string_value = "payment")]
    Payment,
    #[sea_orm(string_value = "inventory")]
    Inventory,
    #[sea_orm(string_value = "void")]
    Void,
}

impl From<AccountType> for coa::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Income => Self::Income,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<coa::AccountType> for AccountType {
    fn from(value: coa::AccountType) -> Self {
        match value {
            coa::AccountType::Asset => Self::Asset,
            coa::AccountType::Liability => Self::Liability,
            coa::AccountType::Equity => Self::Equity,
            coa::AccountType::Income => Self::Income,
            coa::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountSubType> for coa::AccountSubType {
    fn from(value: AccountSubType) -> Self {
        match value {
            AccountSubType::CurrentAsset => Self::CurrentAsset,
            AccountSubType::NonCurrentAsset => Self::NonCurrentAsset,
            AccountSubType::BankCash => Self::BankCash,
            AccountSubType::CurrentLiability => Self::CurrentLiability,
            AccountSubType::NonCurrentLiability => Self::NonCurrentLiability,
            AccountSubType::Equity => Self::Equity,
            AccountSubType::Revenue => Self::Revenue,
            AccountSubType::OtherIncome => Self::OtherIncome,
            AccountSubType::Cogs => Self::Cogs,
            AccountSubType::EmployeeExpense => Self::EmployeeExpense,
            AccountSubType::Depreciation => Self::Depreciation,
            AccountSubType::FinanceCost => Self::FinanceCost,
            AccountSubType::OtherExpense => Self::OtherExpense,
        }
    }
}

impl From<coa::AccountSubType> for AccountSubType {
    fn from(value: coa::AccountSubType) -> Self {
        match value {
            coa::AccountSubType::CurrentAsset => Self::CurrentAsset,
            coa::AccountSubType::NonCurrentAsset => Self::NonCurrentAsset,
            coa::AccountSubType::BankCash => Self::BankCash,
            coa::AccountSubType::CurrentLiability => Self::CurrentLiability,
            coa::AccountSubType::NonCurrentLiability => Self::NonCurrentLiability,
            coa::AccountSubType::Equity => Self::Equity,
            coa::AccountSubType::Revenue => Self::Revenue,
            coa::AccountSubType::OtherIncome => Self::OtherIncome,
            coa::AccountSubType::Cogs => Self::Cogs,
            coa::AccountSubType::EmployeeExpense => Self::EmployeeExpense,
            coa::AccountSubType::Depreciation => Self::Depreciation,
            coa::AccountSubType::FinanceCost => Self::FinanceCost,
            coa::AccountSubType::OtherExpense => Self::OtherExpense,
        }
    }
}

impl From<EntryStatus> for ledger::EntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Draft => Self::Draft,
            EntryStatus::Posted => Self::Posted,
            EntryStatus::Voided => Self::Voided,
        }
    }
}

impl From<ledger::EntryStatus> for EntryStatus {
    fn from(value: ledger::EntryStatus) -> Self {
        match value {
            ledger::EntryStatus::Draft => Self::Draft,
            ledger::EntryStatus::Posted => Self::Posted,
            ledger::EntryStatus::Voided => Self::Voided,
        }
    }
}

impl From<EntrySource> for ledger::EntrySource {
    fn from(value: EntrySource) -> Self {
        match value {
            EntrySource::Manual => Self::Manual,
            EntrySource::Invoice => Self::Invoice,
            EntrySource::Payment => Self::Payment,
            EntrySource::Inventory => Self::Inventory,
            EntrySource::Void => Self::Void,
        }
    }
}

impl From<ledger::EntrySource> for EntrySource {
    fn from(value: ledger::EntrySource) -> Self {
        match value {
            ledger::EntrySource::Manual => Self::Manual,
            ledger::EntrySource::Invoice => Self::Invoice,
            ledger::EntrySource::Payment => Self::Payment,
            ledger::EntrySource::Inventory => Self::Inventory,
            ledger::EntrySource::Void => Self::Void,
        }
    }
}
