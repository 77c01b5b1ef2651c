//! Access decision audit models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::Role;

/// One decision record, written per evaluation. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessAuditEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    pub category: String,
    pub action: String,
    pub resource: Option<String>,
    pub granted: bool,
    /// Human-readable decision reason, e.g. `user_override_denied`.
    pub reason: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccessAuditEntry {
    pub user_id: Uuid,
    pub role: Role,
    pub category: String,
    pub action: String,
    pub resource: Option<String>,
    pub granted: bool,
    pub reason: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// The evaluation timestamp, carried from the [`AccessContext`].
    ///
    /// [`AccessContext`]: crate::models::context::AccessContext
    pub timestamp: DateTime<Utc>,
}
