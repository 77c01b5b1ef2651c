//! SurrealDB implementation of [`AccessAuditRepository`].

use chrono::{DateTime, Utc};
use greenroom_core::error::GreenroomResult;
use greenroom_core::models::audit::{AccessAuditEntry, CreateAccessAuditEntry};
use greenroom_core::models::role::Role;
use greenroom_core::repository::{AccessAuditRepository, AuditFilter, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AuditRow {
    user_id: String,
    role: String,
    category: String,
    action: String,
    resource: Option<String>,
    granted: bool,
    reason: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    timestamp: DateTime<Utc>,
}

impl AuditRow {
    fn try_into_entry(self, id: Uuid) -> Result<AccessAuditEntry, DbError> {
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::MalformedRow(format!("invalid user UUID: {e}")))?;
        let role = self
            .role
            .parse::<Role>()
            .map_err(|e| DbError::MalformedRow(e.to_string()))?;
        Ok(AccessAuditEntry {
            id,
            user_id,
            role,
            category: self.category,
            action: self.action,
            resource: self.resource,
            granted: self.granted,
            reason: self.reason,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            timestamp: self.timestamp,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct AuditRowWithId {
    record_id: String,
    user_id: String,
    role: String,
    category: String,
    action: String,
    resource: Option<String>,
    granted: bool,
    reason: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    timestamp: DateTime<Utc>,
}

impl AuditRowWithId {
    fn try_into_entry(self) -> Result<AccessAuditEntry, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::MalformedRow(format!("invalid UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::MalformedRow(format!("invalid user UUID: {e}")))?;
        let role = self
            .role
            .parse::<Role>()
            .map_err(|e| DbError::MalformedRow(e.to_string()))?;
        Ok(AccessAuditEntry {
            id,
            user_id,
            role,
            category: self.category,
            action: self.action,
            resource: self.resource,
            granted: self.granted,
            reason: self.reason,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            timestamp: self.timestamp,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the access audit trail.
#[derive(Clone)]
pub struct SurrealAccessAuditRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAccessAuditRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

fn filter_clauses(filter: &AuditFilter) -> Vec<&'static str> {
    let mut clauses = Vec::new();
    if filter.user_id.is_some() {
        clauses.push("user_id = $user_id");
    }
    if filter.category.is_some() {
        clauses.push("category = $category");
    }
    if filter.granted.is_some() {
        clauses.push("granted = $granted");
    }
    if filter.from.is_some() {
        clauses.push("timestamp >= $from");
    }
    if filter.to.is_some() {
        clauses.push("timestamp <= $to");
    }
    clauses
}

impl<C: Connection> AccessAuditRepository for SurrealAccessAuditRepository<C> {
    async fn append(&self, input: CreateAccessAuditEntry) -> GreenroomResult<AccessAuditEntry> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('access_audit', $id) SET \
                 user_id = $user_id, role = $role, \
                 category = $category, action = $action, \
                 resource = $resource, granted = $granted, \
                 reason = $reason, ip_address = $ip_address, \
                 user_agent = $user_agent, timestamp = $timestamp",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("role", input.role.as_str()))
            .bind(("category", input.category))
            .bind(("action", input.action))
            .bind(("resource", input.resource))
            .bind(("granted", input.granted))
            .bind(("reason", input.reason))
            .bind(("ip_address", input.ip_address))
            .bind(("user_agent", input.user_agent))
            .bind(("timestamp", input.timestamp))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<AuditRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "access_audit".into(),
            id: id_str,
        })?;

        Ok(row.try_into_entry(id)?)
    }

    async fn list(
        &self,
        filter: AuditFilter,
        pagination: Pagination,
    ) -> GreenroomResult<PaginatedResult<AccessAuditEntry>> {
        let clauses = filter_clauses(&filter);
        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {} ", clauses.join(" AND "))
        };

        let count_query = format!(
            "SELECT count() AS total FROM access_audit {where_clause}GROUP ALL"
        );
        let select_query = format!(
            "SELECT meta::id(id) AS record_id, * FROM access_audit {where_clause}\
             ORDER BY timestamp DESC \
             LIMIT $limit START $offset"
        );

        let mut count_builder = self.db.query(&count_query);
        let mut select_builder = self
            .db
            .query(&select_query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));

        if let Some(user_id) = filter.user_id {
            count_builder = count_builder.bind(("user_id", user_id.to_string()));
            select_builder = select_builder.bind(("user_id", user_id.to_string()));
        }
        if let Some(category) = filter.category {
            count_builder = count_builder.bind(("category", category.clone()));
            select_builder = select_builder.bind(("category", category));
        }
        if let Some(granted) = filter.granted {
            count_builder = count_builder.bind(("granted", granted));
            select_builder = select_builder.bind(("granted", granted));
        }
        if let Some(from) = filter.from {
            count_builder = count_builder.bind(("from", from));
            select_builder = select_builder.bind(("from", from));
        }
        if let Some(to) = filter.to {
            count_builder = count_builder.bind(("to", to));
            select_builder = select_builder.bind(("to", to));
        }

        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = select_builder.await.map_err(DbError::from)?;
        let rows: Vec<AuditRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_entry())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
