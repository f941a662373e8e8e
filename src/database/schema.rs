/*!
 * Job store schema and its versioned migrations.
 *
 * One table maps host jobs to the GlobalSight job names they were
 * submitted under. Each migration brings the store to the next version
 * inside its own transaction.
 */

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension};

/// Version the store is migrated to on open
pub const SCHEMA_VERSION: i32 = 1;

/// `(version, sql)` applied in order to stores older than `version`
const MIGRATIONS: &[(i32, &str)] = &[(
    1,
    r#"
    CREATE TABLE IF NOT EXISTS globalsight_jobs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        host_job_id TEXT NOT NULL,
        job_name TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'active',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_globalsight_jobs_host ON globalsight_jobs(host_job_id);
    CREATE INDEX IF NOT EXISTS idx_globalsight_jobs_name ON globalsight_jobs(job_name);
    "#,
)];

/// Bring the store to [`SCHEMA_VERSION`], refusing stores written by a newer release
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         CREATE TABLE IF NOT EXISTS schema_version (
             id INTEGER PRIMARY KEY CHECK (id = 1),
             version INTEGER NOT NULL,
             updated_at TEXT NOT NULL
         );",
    )
    .context("Failed to create schema_version table")?;

    let current = schema_version(conn)?;
    if current > SCHEMA_VERSION {
        return Err(anyhow!(
            "Job store schema v{} is newer than supported v{}",
            current,
            SCHEMA_VERSION
        ));
    }
    if current == SCHEMA_VERSION {
        debug!("Job store schema is up to date (v{})", current);
        return Ok(());
    }

    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        info!("Migrating job store schema to v{}", version);
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)
            .with_context(|| format!("Job store migration to v{} failed", version))?;
        tx.execute(
            "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
            [version],
        )?;
        tx.commit()?;
    }

    Ok(())
}

/// Stored schema version, 0 for a fresh store
fn schema_version(conn: &Connection) -> Result<i32> {
    let version = conn
        .query_row("SELECT version FROM schema_version WHERE id = 1", [], |row| {
            row.get(0)
        })
        .optional()
        .context("Failed to read job store schema version")?;
    Ok(version.unwrap_or(0))
}
