//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;

/// Header naming the tenant a request acts on.
pub const TENANT_HEADER: &str = "x-organization-id";

/// Header naming the acting user, recorded on postings and locks.
pub const USER_HEADER: &str = "x-user-id";

/// Tenant and actor of a request.
///
/// Authentication runs in front of this service and forwards the resolved
/// organization and user as headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    /// Tenant every operation is scoped to.
    pub tenant_id: Uuid,
    /// Acting user, when known.
    pub user_id: Option<Uuid>,
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant_id = header_uuid(parts, TENANT_HEADER)?.ok_or_else(|| {
            ApiError::bad_request(format!("{TENANT_HEADER} header is required"))
        })?;
        let user_id = header_uuid(parts, USER_HEADER)?;
        Ok(Self { tenant_id, user_id })
    }
}

fn header_uuid(parts: &Parts, name: &str) -> Result<Option<Uuid>, ApiError> {
    let Some(value) = parts.headers.get(name) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .map(Some)
        .ok_or_else(|| ApiError::bad_request(format!("{name} header must be a UUID")))
}
