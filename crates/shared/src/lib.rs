//! Building blocks used by every Bizbooks crate.
//!
//! Layered configuration, the error categories the HTTP layer renders,
//! page requests for list endpoints and two-place money helpers.

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
