//! Chart of accounts.
//!
//! Account types and sub-types, the default catalog with its seeding order,
//! field validation for custom accounts, and the id-indexed hierarchy.

pub mod catalog;
pub mod tree;
pub mod types;

#[cfg(test)]
mod catalog_props;

pub use catalog::{DEFAULT_ACCOUNTS, DefaultAccount, seed_plan};
pub use tree::{AccountNode, AccountTree, ensure_acyclic};
pub use types::{
    Account, AccountSubType, AccountType, AccountUpdate, MAX_CODE_LEN, MAX_NAME_LEN, NewAccount,
    validate_code, validate_name, validate_parent,
};
