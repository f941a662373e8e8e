/*!
 * Database entity models.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a stored job name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobRecordStatus {
    /// The remote job is live
    Active,
    /// The remote job was canceled and the host job aborted
    Archived,
}

impl fmt::Display for JobRecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobRecordStatus::Active => write!(f, "active"),
            JobRecordStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for JobRecordStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(JobRecordStatus::Active),
            "archived" => Ok(JobRecordStatus::Archived),
            _ => Err(anyhow::anyhow!("Invalid job record status: {}", s)),
        }
    }
}

/// The GlobalSight job name a host job was submitted under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Host job identifier
    pub host_job_id: String,
    /// GlobalSight job name
    pub job_name: String,
    pub status: JobRecordStatus,
    /// RFC 3339 timestamps
    pub created_at: String,
    pub updated_at: String,
}

impl JobRecord {
    /// A fresh active record stamped with the current time
    pub fn new(host_job_id: impl Into<String>, job_name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            host_job_id: host_job_id.into(),
            job_name: job_name.into(),
            status: JobRecordStatus::Active,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn is_archived(&self) -> bool {
        self.status == JobRecordStatus::Archived
    }
}
