//! Per-request evaluation input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::Role;

/// The ephemeral context an access decision is evaluated against.
/// Derived from the authenticated session per request; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessContext {
    pub user_id: Uuid,
    pub role: Role,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// Evaluation wall-clock time. Defaults to now at construction.
    pub timestamp: DateTime<Utc>,
}

impl AccessContext {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self {
            user_id,
            role,
            ip_address: None,
            user_agent: None,
            timestamp: Utc::now(),
        }
    }
}

/// A requested `(category, action, resource)` triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessRequest {
    pub category: String,
    pub action: String,
    pub resource: Option<String>,
}

impl AccessRequest {
    pub fn new(category: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            action: action.into(),
            resource: None,
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }
}
