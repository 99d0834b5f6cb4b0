//! Request context carrying the authenticated owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pixvault_core::types::OwnerId;

/// Context for the current authenticated request.
///
/// Built by the API layer from the identity provider's user id and passed
/// into every service method so that each operation is scoped to one owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated owner.
    pub owner_id: OwnerId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(owner_id: OwnerId) -> Self {
        Self {
            owner_id,
            request_time: Utc::now(),
        }
    }
}
