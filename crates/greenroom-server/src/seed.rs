//! Default role-grant matrix for the marketplace roles.

use greenroom_core::error::GreenroomResult;
use greenroom_core::models::grant::{CreateRoleGrant, RESOURCE_ALL};
use greenroom_core::models::role::Role;
use greenroom_core::repository::RoleGrantRepository;
use tracing::info;

fn grant(category: &str, action: &str, resource: Option<&str>) -> CreateRoleGrant {
    CreateRoleGrant {
        category: category.into(),
        action: action.into(),
        resource: resource.map(String::from),
        granted: true,
    }
}

/// The default permission baseline for a role.
pub fn default_grants(role: Role) -> Vec<CreateRoleGrant> {
    match role {
        Role::Talent => vec![
            grant("profile_management", "read", Some("own")),
            grant("profile_management", "update", Some("own")),
            grant("media_portfolio", "create", Some("own")),
            grant("media_portfolio", "read", Some("own")),
            grant("media_portfolio", "delete", Some("own")),
            grant("job_management", "read", Some(RESOURCE_ALL)),
            grant("applications", "create", Some("own")),
            grant("applications", "read", Some("own")),
            grant("social_feed", "create", Some("own")),
            grant("social_feed", "read", Some(RESOURCE_ALL)),
            grant("messaging", "create", Some("own")),
            grant("messaging", "read", Some("own")),
            grant("billing", "read", Some("own")),
        ],
        Role::Manager => vec![
            grant("profile_management", "read", Some(RESOURCE_ALL)),
            grant("profile_management", "update", Some("own")),
            grant("job_management", "read", Some(RESOURCE_ALL)),
            grant("applications", "read", Some(RESOURCE_ALL)),
            grant("social_feed", "create", Some("own")),
            grant("social_feed", "read", Some(RESOURCE_ALL)),
            grant("messaging", "create", Some("own")),
            grant("messaging", "read", Some("own")),
            grant("billing", "read", Some("own")),
        ],
        Role::Producer => vec![
            grant("profile_management", "read", Some(RESOURCE_ALL)),
            grant("profile_management", "update", Some("own")),
            grant("job_management", "create", Some("own")),
            grant("job_management", "read", Some(RESOURCE_ALL)),
            grant("job_management", "update", Some("own")),
            grant("job_management", "delete", Some("own")),
            grant("applications", "read", Some("own")),
            grant("applications", "approve", Some("own")),
            grant("social_feed", "create", Some("own")),
            grant("social_feed", "read", Some(RESOURCE_ALL)),
            grant("messaging", "create", Some("own")),
            grant("messaging", "read", Some("own")),
            grant("billing", "read", Some("own")),
        ],
        Role::Agent => vec![
            grant("profile_management", "read", Some(RESOURCE_ALL)),
            grant("profile_management", "update", Some("own")),
            grant("job_management", "read", Some(RESOURCE_ALL)),
            grant("applications", "create", Some("own")),
            grant("applications", "read", Some("own")),
            grant("social_feed", "create", Some("own")),
            grant("social_feed", "read", Some(RESOURCE_ALL)),
            grant("messaging", "create", Some("own")),
            grant("messaging", "read", Some("own")),
            grant("billing", "read", Some("own")),
        ],
        Role::Admin => vec![
            grant("profile_management", "manage", Some(RESOURCE_ALL)),
            grant("media_portfolio", "manage", Some(RESOURCE_ALL)),
            grant("job_management", "manage", Some(RESOURCE_ALL)),
            grant("applications", "manage", Some(RESOURCE_ALL)),
            grant("social_feed", "manage", Some(RESOURCE_ALL)),
            grant("messaging", "manage", Some(RESOURCE_ALL)),
            grant("billing", "manage", Some(RESOURCE_ALL)),
            grant("admin_panel", "read", Some(RESOURCE_ALL)),
            grant("admin_panel", "update", Some(RESOURCE_ALL)),
        ],
    }
}

/// Seed (or re-seed) the defaults for every role.
pub async fn apply<R: RoleGrantRepository>(repo: &R) -> GreenroomResult<()> {
    for role in Role::ALL {
        let grants = default_grants(role);
        info!(role = %role, count = grants.len(), "Seeding role defaults");
        repo.seed_role_grants(role, grants).await?;
    }
    Ok(())
}
