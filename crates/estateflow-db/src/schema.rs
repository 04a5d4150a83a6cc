//! Schema definitions and migration runner.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs and timestamps are stored as strings (RFC 3339 for
//! timestamps). Enums are stored as strings with ASSERT constraints
//! for validation.

use serde::Deserialize;
use surrealdb::{Connection, Surreal};
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

#[derive(Debug, Deserialize)]
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
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Accounts (the shared tenant registry)
-- =======================================================================
DEFINE TABLE account SCHEMAFULL;
DEFINE FIELD email ON TABLE account TYPE string;
DEFINE FIELD password_hash ON TABLE account TYPE string;
DEFINE FIELD plan ON TABLE account TYPE string \
    ASSERT $value IN ['FREE', 'PRO'];
DEFINE FIELD is_admin ON TABLE account TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE account TYPE string;
DEFINE FIELD updated_at ON TABLE account TYPE string;
DEFINE INDEX idx_account_email ON TABLE account COLUMNS email UNIQUE;

-- =======================================================================
-- Leads (tenant scope)
-- =======================================================================
DEFINE TABLE lead SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE lead TYPE string;
DEFINE FIELD full_name ON TABLE lead TYPE string;
DEFINE FIELD phone ON TABLE lead TYPE string;
DEFINE FIELD budget ON TABLE lead TYPE string;
DEFINE FIELD area ON TABLE lead TYPE string;
DEFINE FIELD purpose ON TABLE lead TYPE string \
    ASSERT $value IN ['Buy', 'Rent'];
DEFINE FIELD source ON TABLE lead TYPE string \
    ASSERT $value IN ['WhatsApp', 'Call', 'Instagram', 'Referral'];
DEFINE FIELD status ON TABLE lead TYPE string \
    ASSERT $value IN ['New', 'Contacted', 'Visit Done', \
    'Deal Closed', 'Lost'];
DEFINE FIELD notes ON TABLE lead TYPE string;
DEFINE FIELD next_follow_up ON TABLE lead TYPE option<string>;
DEFINE FIELD recurrence ON TABLE lead TYPE string \
    ASSERT $value IN ['none', 'daily', 'weekly', 'monthly', 'custom'];
DEFINE FIELD recurrence_interval ON TABLE lead TYPE int \
    ASSERT $value >= 1;
DEFINE FIELD created_at ON TABLE lead TYPE string;
DEFINE INDEX idx_lead_tenant ON TABLE lead COLUMNS tenant_id;

-- =======================================================================
-- Active session (singleton slot)
-- =======================================================================
DEFINE TABLE active_session SCHEMAFULL;
DEFINE FIELD account_id ON TABLE active_session TYPE string;
DEFINE FIELD email ON TABLE active_session TYPE string;
DEFINE FIELD plan ON TABLE active_session TYPE string \
    ASSERT $value IN ['FREE', 'PRO'];
DEFINE FIELD is_admin ON TABLE active_session TYPE bool DEFAULT false;
DEFINE FIELD started_at ON TABLE active_session TYPE string;
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
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
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

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
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

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
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
