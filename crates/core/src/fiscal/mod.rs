//! Financial year lock.

pub mod year;

pub use year::{FinancialYear, fiscal_year_of};
