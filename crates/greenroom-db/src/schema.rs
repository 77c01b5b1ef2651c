//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Roles are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — grant and audit tables
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Role grants (role-level defaults, seeded at provisioning time)
-- =======================================================================
DEFINE TABLE role_grant SCHEMAFULL;
DEFINE FIELD role ON TABLE role_grant TYPE string \
    ASSERT $value IN ['talent', 'manager', 'producer', 'agent', 'admin'];
DEFINE FIELD category ON TABLE role_grant TYPE string;
DEFINE FIELD action ON TABLE role_grant TYPE string;
DEFINE FIELD resource ON TABLE role_grant TYPE option<string>;
DEFINE FIELD granted ON TABLE role_grant TYPE bool;
DEFINE FIELD created_at ON TABLE role_grant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE role_grant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_role_grant_lookup ON TABLE role_grant \
    COLUMNS role, category, action;

-- =======================================================================
-- User grants (per-user overrides; revocation preserves history)
-- =======================================================================
DEFINE TABLE user_grant SCHEMAFULL;
DEFINE FIELD user_id ON TABLE user_grant TYPE string;
DEFINE FIELD category ON TABLE user_grant TYPE string;
DEFINE FIELD action ON TABLE user_grant TYPE string;
DEFINE FIELD resource ON TABLE user_grant TYPE option<string>;
DEFINE FIELD granted ON TABLE user_grant TYPE bool;
DEFINE FIELD conditions ON TABLE user_grant TYPE option<object> FLEXIBLE;
DEFINE FIELD expires_at ON TABLE user_grant TYPE option<datetime>;
DEFINE FIELD granted_by ON TABLE user_grant TYPE string;
DEFINE FIELD created_at ON TABLE user_grant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_grant_lookup ON TABLE user_grant \
    COLUMNS user_id, category, action;

-- =======================================================================
-- Access audit trail (append-only)
-- =======================================================================
DEFINE TABLE access_audit SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD user_id ON TABLE access_audit TYPE string;
DEFINE FIELD role ON TABLE access_audit TYPE string \
    ASSERT $value IN ['talent', 'manager', 'producer', 'agent', 'admin'];
DEFINE FIELD category ON TABLE access_audit TYPE string;
DEFINE FIELD action ON TABLE access_audit TYPE string;
DEFINE FIELD resource ON TABLE access_audit TYPE option<string>;
DEFINE FIELD granted ON TABLE access_audit TYPE bool;
DEFINE FIELD reason ON TABLE access_audit TYPE string;
DEFINE FIELD ip_address ON TABLE access_audit TYPE option<string>;
DEFINE FIELD user_agent ON TABLE access_audit TYPE option<string>;
DEFINE FIELD timestamp ON TABLE access_audit TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_access_audit_user_time ON TABLE access_audit \
    COLUMNS user_id, timestamp;
DEFINE INDEX idx_access_audit_time ON TABLE access_audit \
    COLUMNS timestamp;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            db.query("CREATE _migration SET version = $version, name = $name")
                .bind(("version", migration.version))
                .bind(("name", migration.name))
                .await?
                .check()
                .map_err(|e| {
                    DbError::Migration(format!(
                        "Failed to record migration v{}: {}",
                        migration.version, e,
                    ))
                })?;

            info!(version = migration.version, "Migration applied");
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_defines_all_tables() {
        for table in ["role_grant", "user_grant", "access_audit"] {
            assert!(
                SCHEMA_V1.contains(&format!("DEFINE TABLE {table} SCHEMAFULL")),
                "missing table definition for {table}"
            );
        }
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
