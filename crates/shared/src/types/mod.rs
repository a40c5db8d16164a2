//! Common types used across the application.

pub mod money;
pub mod pagination;

pub use money::{MONEY_SCALE, has_money_scale, round_money};
pub use pagination::{PageRequest, PageResponse};
