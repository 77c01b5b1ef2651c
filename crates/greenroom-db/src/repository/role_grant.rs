//! SurrealDB implementation of [`RoleGrantRepository`].

use chrono::{DateTime, Utc};
use greenroom_core::error::GreenroomResult;
use greenroom_core::models::grant::{CreateRoleGrant, RoleGrant};
use greenroom_core::models::role::Role;
use greenroom_core::repository::RoleGrantRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RoleGrantRow {
    record_id: String,
    role: String,
    category: String,
    action: String,
    resource: Option<String>,
    granted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RoleGrantRow {
    fn try_into_grant(self) -> Result<RoleGrant, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::MalformedRow(format!("invalid UUID: {e}")))?;
        let role = self
            .role
            .parse::<Role>()
            .map_err(|e| DbError::MalformedRow(e.to_string()))?;
        Ok(RoleGrant {
            id,
            role,
            category: self.category,
            action: self.action,
            resource: self.resource,
            granted: self.granted,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the role-grant store.
#[derive(Clone)]
pub struct SurrealRoleGrantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoleGrantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RoleGrantRepository for SurrealRoleGrantRepository<C> {
    async fn get_role_grants(&self, role: Role) -> GreenroomResult<Vec<RoleGrant>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role_grant \
                 WHERE role = $role \
                 ORDER BY created_at ASC",
            )
            .bind(("role", role.as_str()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleGrantRow> = result.take(0).map_err(DbError::from)?;

        let grants = rows
            .into_iter()
            .map(|row| row.try_into_grant())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(grants)
    }

    async fn seed_role_grants(
        &self,
        role: Role,
        grants: Vec<CreateRoleGrant>,
    ) -> GreenroomResult<Vec<RoleGrant>> {
        // Re-seeding replaces the role's existing defaults wholesale.
        self.db
            .query("DELETE role_grant WHERE role = $role")
            .bind(("role", role.as_str()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        for grant in grants {
            let id = Uuid::new_v4().to_string();
            self.db
                .query(
                    "CREATE type::record('role_grant', $id) SET \
                     role = $role, category = $category, action = $action, \
                     resource = $resource, granted = $granted",
                )
                .bind(("id", id))
                .bind(("role", role.as_str()))
                .bind(("category", grant.category))
                .bind(("action", grant.action))
                .bind(("resource", grant.resource))
                .bind(("granted", grant.granted))
                .await
                .map_err(DbError::from)?
                .check()
                .map_err(|e| DbError::Migration(e.to_string()))?;
        }

        self.get_role_grants(role).await
    }
}
