//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. The evaluator consumes only the
//! read operations; the mutation operations belong to administrative
//! workflows (grant issuance, revocation, role re-seeding).

use uuid::Uuid;

use crate::error::GreenroomResult;
use crate::models::{
    audit::{AccessAuditEntry, CreateAccessAuditEntry},
    grant::{CreateRoleGrant, CreateUserGrant, RoleGrant, UserGrant},
    role::Role,
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Grant stores
// ---------------------------------------------------------------------------

pub trait RoleGrantRepository: Send + Sync {
    /// All defaults for a role, in seeding order.
    fn get_role_grants(&self, role: Role)
    -> impl Future<Output = GreenroomResult<Vec<RoleGrant>>> + Send;

    /// Replace the role's defaults with the given set (administrative
    /// re-seeding). Returns the stored grants.
    fn seed_role_grants(
        &self,
        role: Role,
        grants: Vec<CreateRoleGrant>,
    ) -> impl Future<Output = GreenroomResult<Vec<RoleGrant>>> + Send;
}

pub trait UserGrantRepository: Send + Sync {
    /// All overrides for a user, newest first. History rows from repeated
    /// grant/revoke cycles are preserved; callers resolve duplicates by
    /// taking the most recent match.
    fn get_user_grants(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = GreenroomResult<Vec<UserGrant>>> + Send;

    /// Issue a new override (administrative path, not used by evaluation).
    fn create(
        &self,
        input: CreateUserGrant,
    ) -> impl Future<Output = GreenroomResult<UserGrant>> + Send;

    /// Revoke matching overrides by setting `granted = false`, preserving
    /// history. A `resource` of `None` matches only rows with no resource.
    fn revoke(
        &self,
        user_id: Uuid,
        category: &str,
        action: &str,
        resource: Option<&str>,
    ) -> impl Future<Output = GreenroomResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Audit (append-only)
// ---------------------------------------------------------------------------

/// Query filters for access audit entries.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub user_id: Option<Uuid>,
    pub category: Option<String>,
    pub granted: Option<bool>,
    pub from: Option<chrono::DateTime<chrono::Utc>>,
    pub to: Option<chrono::DateTime<chrono::Utc>>,
}

pub trait AccessAuditRepository: Send + Sync {
    /// Append a new decision record. No update or delete operations exist.
    fn append(
        &self,
        input: CreateAccessAuditEntry,
    ) -> impl Future<Output = GreenroomResult<AccessAuditEntry>> + Send;

    fn list(
        &self,
        filter: AuditFilter,
        pagination: Pagination,
    ) -> impl Future<Output = GreenroomResult<PaginatedResult<AccessAuditEntry>>> + Send;
}
