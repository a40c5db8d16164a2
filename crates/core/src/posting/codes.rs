//! Default account codes collaborators post to.
//!
//! All of them are created by seeding the default chart of accounts.

/// Accounts Receivable.
pub const ACCOUNTS_RECEIVABLE: &str = "1100";
/// Bank Accounts.
pub const BANK: &str = "1020";
/// Service Revenue.
pub const SERVICE_REVENUE: &str = "4010";
/// CGST Payable.
pub const CGST_PAYABLE: &str = "2110";
/// SGST Payable.
pub const SGST_PAYABLE: &str = "2120";
/// IGST Payable.
pub const IGST_PAYABLE: &str = "2130";
/// Inventory.
pub const INVENTORY: &str = "1200";
/// Cost of Goods Sold.
pub const COGS: &str = "5010";
