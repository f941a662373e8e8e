/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API over the job name table,
 * abstracting away the SQL details and providing type-safe access.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::{JobRecord, JobRecordStatus};
use crate::translator::JobNameStore;

/// Repository for database operations
#[derive(Clone, Debug)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Get the most recent record of a host job
    pub async fn get_record(&self, host_job_id: &str) -> Result<Option<JobRecord>> {
        let host_job_id = host_job_id.to_string();

        self.db
            .execute_async(move |conn| Self::get_record_sync(conn, &host_job_id))
            .await
    }

    fn get_record_sync(conn: &Connection, host_job_id: &str) -> Result<Option<JobRecord>> {
        let result = conn
            .query_row(
                r#"
                SELECT host_job_id, job_name, status, created_at, updated_at
                FROM globalsight_jobs WHERE host_job_id = ?1
                ORDER BY id DESC LIMIT 1
                "#,
                [host_job_id],
                |row| {
                    Ok(JobRecord {
                        host_job_id: row.get(0)?,
                        job_name: row.get(1)?,
                        status: row
                            .get::<_, String>(2)?
                            .parse()
                            .unwrap_or(JobRecordStatus::Active),
                        created_at: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                },
            )
            .optional()?;

        Ok(result)
    }

    /// Replace the records of a host job with a new active one
    pub async fn replace_record(&self, record: &JobRecord) -> Result<()> {
        let record = record.clone();

        self.db
            .transaction_async(move |tx| {
                tx.execute(
                    "DELETE FROM globalsight_jobs WHERE host_job_id = ?1",
                    [&record.host_job_id],
                )?;
                tx.execute(
                    r#"
                    INSERT INTO globalsight_jobs (host_job_id, job_name, status, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                    params![
                        record.host_job_id,
                        record.job_name,
                        record.status.to_string(),
                        record.created_at,
                        record.updated_at,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    /// Update the status of every record of a host job
    pub async fn update_status(&self, host_job_id: &str, status: JobRecordStatus) -> Result<usize> {
        let host_job_id = host_job_id.to_string();
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                let updated = conn.execute(
                    "UPDATE globalsight_jobs SET status = ?1, updated_at = ?2 WHERE host_job_id = ?3",
                    params![status.to_string(), now, host_job_id],
                )?;
                Ok(updated)
            })
            .await
    }

    /// Delete every record of a host job
    pub async fn delete_records(&self, host_job_id: &str) -> Result<usize> {
        let host_job_id = host_job_id.to_string();

        self.db
            .execute_async(move |conn| {
                let deleted = conn.execute(
                    "DELETE FROM globalsight_jobs WHERE host_job_id = ?1",
                    [&host_job_id],
                )?;
                Ok(deleted)
            })
            .await
    }

    /// Active records, newest first
    pub async fn list_active(&self) -> Result<Vec<JobRecord>> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT host_job_id, job_name, status, created_at, updated_at
                    FROM globalsight_jobs WHERE status = 'active'
                    ORDER BY id DESC
                    "#,
                )?;
                let records = stmt
                    .query_map([], |row| {
                        Ok(JobRecord {
                            host_job_id: row.get(0)?,
                            job_name: row.get(1)?,
                            status: JobRecordStatus::Active,
                            created_at: row.get(3)?,
                            updated_at: row.get(4)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(records)
            })
            .await
    }
}

#[async_trait]
impl JobNameStore for Repository {
    async fn save(&self, host_job_id: &str, job_name: &str) -> Result<()> {
        debug!("Recording job {} as '{}'", host_job_id, job_name);
        self.replace_record(&JobRecord::new(host_job_id, job_name)).await
    }

    async fn find_job_name(&self, host_job_id: &str) -> Result<Option<String>> {
        Ok(self
            .get_record(host_job_id)
            .await?
            .map(|record| record.job_name))
    }

    async fn find_record(&self, host_job_id: &str) -> Result<Option<JobRecord>> {
        self.get_record(host_job_id).await
    }

    async fn archive(&self, host_job_id: &str) -> Result<()> {
        let updated = self
            .update_status(host_job_id, JobRecordStatus::Archived)
            .await?;
        if updated == 0 {
            return Err(anyhow::anyhow!("No job record for host job {}", host_job_id));
        }
        Ok(())
    }

    async fn delete(&self, host_job_id: &str) -> Result<()> {
        self.delete_records(host_job_id).await?;
        Ok(())
    }
}
