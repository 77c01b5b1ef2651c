//! SurrealDB implementation of [`UserGrantRepository`].

use chrono::{DateTime, Utc};
use greenroom_core::error::GreenroomResult;
use greenroom_core::models::grant::{CreateUserGrant, GrantConditions, TimeWindow, UserGrant};
use greenroom_core::repository::UserGrantRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, Clone, SurrealValue)]
struct TimeWindowRow {
    start_hour: u8,
    end_hour: u8,
}

#[derive(Debug, Clone, SurrealValue)]
struct ConditionsRow {
    ip_allowlist: Option<Vec<String>>,
    time_window: Option<TimeWindowRow>,
}

impl From<GrantConditions> for ConditionsRow {
    fn from(c: GrantConditions) -> Self {
        Self {
            ip_allowlist: c.ip_allowlist,
            time_window: c.time_window.map(|w| TimeWindowRow {
                start_hour: w.start_hour,
                end_hour: w.end_hour,
            }),
        }
    }
}

impl From<ConditionsRow> for GrantConditions {
    fn from(row: ConditionsRow) -> Self {
        Self {
            ip_allowlist: row.ip_allowlist,
            time_window: row.time_window.map(|w| TimeWindow {
                start_hour: w.start_hour,
                end_hour: w.end_hour,
            }),
        }
    }
}

#[derive(Debug, SurrealValue)]
struct UserGrantRow {
    user_id: String,
    category: String,
    action: String,
    resource: Option<String>,
    granted: bool,
    conditions: Option<ConditionsRow>,
    expires_at: Option<DateTime<Utc>>,
    granted_by: String,
    created_at: DateTime<Utc>,
}

impl UserGrantRow {
    fn try_into_grant(self, id: Uuid) -> Result<UserGrant, DbError> {
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::MalformedRow(format!("invalid user UUID: {e}")))?;
        let granted_by = Uuid::parse_str(&self.granted_by)
            .map_err(|e| DbError::MalformedRow(format!("invalid grantor UUID: {e}")))?;
        Ok(UserGrant {
            id,
            user_id,
            category: self.category,
            action: self.action,
            resource: self.resource,
            granted: self.granted,
            conditions: self.conditions.map(GrantConditions::from),
            expires_at: self.expires_at,
            granted_by,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct UserGrantRowWithId {
    record_id: String,
    user_id: String,
    category: String,
    action: String,
    resource: Option<String>,
    granted: bool,
    conditions: Option<ConditionsRow>,
    expires_at: Option<DateTime<Utc>>,
    granted_by: String,
    created_at: DateTime<Utc>,
}

impl UserGrantRowWithId {
    fn try_into_grant(self) -> Result<UserGrant, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::MalformedRow(format!("invalid UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::MalformedRow(format!("invalid user UUID: {e}")))?;
        let granted_by = Uuid::parse_str(&self.granted_by)
            .map_err(|e| DbError::MalformedRow(format!("invalid grantor UUID: {e}")))?;
        Ok(UserGrant {
            id,
            user_id,
            category: self.category,
            action: self.action,
            resource: self.resource,
            granted: self.granted,
            conditions: self.conditions.map(GrantConditions::from),
            expires_at: self.expires_at,
            granted_by,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the user-grant store.
#[derive(Clone)]
pub struct SurrealUserGrantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserGrantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserGrantRepository for SurrealUserGrantRepository<C> {
    async fn get_user_grants(&self, user_id: Uuid) -> GreenroomResult<Vec<UserGrant>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user_grant \
                 WHERE user_id = $user_id \
                 ORDER BY created_at DESC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserGrantRowWithId> = result.take(0).map_err(DbError::from)?;

        let grants = rows
            .into_iter()
            .map(|row| row.try_into_grant())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(grants)
    }

    async fn create(&self, input: CreateUserGrant) -> GreenroomResult<UserGrant> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('user_grant', $id) SET \
                 user_id = $user_id, category = $category, action = $action, \
                 resource = $resource, granted = $granted, \
                 conditions = $conditions, expires_at = $expires_at, \
                 granted_by = $granted_by",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("category", input.category))
            .bind(("action", input.action))
            .bind(("resource", input.resource))
            .bind(("granted", input.granted))
            .bind(("conditions", input.conditions.map(ConditionsRow::from)))
            .bind(("expires_at", input.expires_at))
            .bind(("granted_by", input.granted_by.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<UserGrantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user_grant".into(),
            id: id_str,
        })?;

        Ok(row.try_into_grant(id)?)
    }

    async fn revoke(
        &self,
        user_id: Uuid,
        category: &str,
        action: &str,
        resource: Option<&str>,
    ) -> GreenroomResult<()> {
        // A `None` scope revokes only rows with no resource, not every
        // scope for the pair.
        let query = if resource.is_some() {
            "UPDATE user_grant SET granted = false \
             WHERE user_id = $user_id AND category = $category \
             AND action = $action AND resource = $resource"
        } else {
            "UPDATE user_grant SET granted = false \
             WHERE user_id = $user_id AND category = $category \
             AND action = $action AND resource IS NONE"
        };

        let mut builder = self
            .db
            .query(query)
            .bind(("user_id", user_id.to_string()))
            .bind(("category", category.to_string()))
            .bind(("action", action.to_string()));

        if let Some(resource) = resource {
            builder = builder.bind(("resource", resource.to_string()));
        }

        builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        Ok(())
    }
}
