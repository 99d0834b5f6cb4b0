//! `AuthUser` extractor: reads the identity provider's user id and builds the
//! request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use pixvault_core::error::AppError;
use pixvault_core::types::OwnerId;
use pixvault_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header set by the identity provider's edge middleware.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }

    /// Reject requests whose `userId` parameter names someone else.
    pub fn ensure_matches(&self, claimed: Option<&str>) -> Result<(), AppError> {
        match claimed.map(str::trim) {
            Some(claimed) if !claimed.is_empty() && claimed != self.0.owner_id.as_str() => {
                Err(AppError::authentication("userId does not match the signed-in user"))
            }
            _ => Ok(()),
        }
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing user identity"))?;

        let owner_id = OwnerId::parse(raw)?;
        Ok(AuthUser(RequestContext::new(owner_id)))
    }
}
