//! Core business logic for Bizbooks.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `coa` - Chart of accounts hierarchy and default catalog
//! - `ledger` - Double-entry posting rules and reversals
//! - `fiscal` - Financial year lock
//! - `reports` - Trial balance and general ledger
//! - `posting` - Invoice, payment and inventory postings

pub mod coa;
pub mod fiscal;
pub mod ledger;
pub mod posting;
pub mod reports;
