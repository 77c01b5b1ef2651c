//! Grant domain models.
//!
//! A grant is an atomic `(category, action, resource, granted)` permission
//! statement. Role grants are the defaults shared by every principal
//! holding a role; user grants are per-principal overrides that take
//! precedence over the role default for the same triple.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::Role;

/// Wildcard resource scope: matches any specific resource.
pub const RESOURCE_ALL: &str = "all";

/// Inclusive hour-of-day window, e.g. `9..=17` for office hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl TimeWindow {
    pub fn contains(&self, hour: u8) -> bool {
        self.start_hour <= hour && hour <= self.end_hour
    }
}

/// Contextual conditions attached to a user-level grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantConditions {
    /// When set, the grant only applies from one of these IP addresses.
    pub ip_allowlist: Option<Vec<String>>,
    /// When set, the grant only applies inside this hour-of-day window.
    pub time_window: Option<TimeWindow>,
}

/// Role-level default grant.
///
/// Created at provisioning time and mutated only by administrative
/// re-seeding. No expiry or conditions apply at the role layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleGrant {
    pub id: Uuid,
    pub role: Role,
    pub category: String,
    pub action: String,
    pub resource: Option<String>,
    pub granted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoleGrant {
    pub category: String,
    pub action: String,
    pub resource: Option<String>,
    pub granted: bool,
}

/// Per-user override grant. Takes precedence over the role default for
/// the same `(category, action, resource)` triple. Revocation sets
/// `granted = false` rather than deleting the row, preserving history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGrant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub action: String,
    pub resource: Option<String>,
    pub granted: bool,
    pub conditions: Option<GrantConditions>,
    /// A grant whose expiry is at or before the evaluation timestamp is
    /// inert: evaluation falls through to the role default.
    pub expires_at: Option<DateTime<Utc>>,
    /// The administrative principal that issued this override.
    pub granted_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserGrant {
    pub user_id: Uuid,
    pub category: String,
    pub action: String,
    pub resource: Option<String>,
    pub granted: bool,
    pub conditions: Option<GrantConditions>,
    pub expires_at: Option<DateTime<Utc>>,
    pub granted_by: Uuid,
}

/// A stored scope of `None` matches any request; `"all"` matches any
/// request; a specific scope only matches that exact value.
fn scope_matches(stored: Option<&str>, requested: Option<&str>) -> bool {
    match stored {
        None => true,
        Some(RESOURCE_ALL) => true,
        Some(specific) => requested == Some(specific),
    }
}

impl UserGrant {
    /// Whether this override applies to the requested triple.
    pub fn matches(&self, category: &str, action: &str, resource: Option<&str>) -> bool {
        self.category == category
            && self.action == action
            && scope_matches(self.resource.as_deref(), resource)
    }
}

impl RoleGrant {
    /// Whether this default applies to the requested triple.
    ///
    /// At the role layer a request without a resource scope matches any
    /// grant for the `(category, action)` pair, even one scoped to a
    /// specific resource. This asymmetry with [`UserGrant::matches`] is
    /// intended behavior.
    pub fn matches(&self, category: &str, action: &str, resource: Option<&str>) -> bool {
        self.category == category
            && self.action == action
            && (resource.is_none() || scope_matches(self.resource.as_deref(), resource))
    }
}
