/*!
 * Host-facing translator.
 *
 * `GlobalSightTranslator` is what a translation management host calls. It
 * combines the connector with a [`JobNameStore`] remembering which remote
 * job belongs to which host job, and a [`FieldSource`] turning host jobs
 * into translatable fields.
 *
 * Failures never escape as errors where the host needs a decision: they
 * come back as outcome values that tell the host to reject or keep its job.
 */

use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use log::{error, info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::connector::GlobalSightConnector;
use crate::database::models::{JobRecord, JobRecordStatus};
use crate::errors::AppError;
use crate::job::{EmbeddedFields, FieldSource, TranslationJob};
use crate::status::StatusResult;

/// Persistence of host job id to GlobalSight job name mappings
#[async_trait]
pub trait JobNameStore: Send + Sync {
    /// Record the job name of a host job, replacing any previous record
    async fn save(&self, host_job_id: &str, job_name: &str) -> Result<()>;

    /// The job name recorded for a host job
    async fn find_job_name(&self, host_job_id: &str) -> Result<Option<String>>;

    /// The full record of a host job
    async fn find_record(&self, host_job_id: &str) -> Result<Option<JobRecord>>;

    /// Mark the record of a host job archived
    async fn archive(&self, host_job_id: &str) -> Result<()>;

    /// Forget a host job
    async fn delete(&self, host_job_id: &str) -> Result<()>;
}

/// Job name store kept in memory
#[derive(Debug, Default)]
pub struct InMemoryJobNameStore {
    records: Mutex<HashMap<String, JobRecord>>,
}

impl InMemoryJobNameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl JobNameStore for InMemoryJobNameStore {
    async fn save(&self, host_job_id: &str, job_name: &str) -> Result<()> {
        self.records
            .lock()
            .insert(host_job_id.to_string(), JobRecord::new(host_job_id, job_name));
        Ok(())
    }

    async fn find_job_name(&self, host_job_id: &str) -> Result<Option<String>> {
        Ok(self
            .records
            .lock()
            .get(host_job_id)
            .map(|record| record.job_name.clone()))
    }

    async fn find_record(&self, host_job_id: &str) -> Result<Option<JobRecord>> {
        Ok(self.records.lock().get(host_job_id).cloned())
    }

    async fn archive(&self, host_job_id: &str) -> Result<()> {
        let mut records = self.records.lock();
        let record = records
            .get_mut(host_job_id)
            .ok_or_else(|| anyhow::anyhow!("No job record for host job {}", host_job_id))?;
        record.status = JobRecordStatus::Archived;
        record.updated_at = chrono::Utc::now().to_rfc3339();
        Ok(())
    }

    async fn delete(&self, host_job_id: &str) -> Result<()> {
        self.records.lock().remove(host_job_id);
        Ok(())
    }
}

/// Result of a translation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The host job is now with GlobalSight under `job_name`
    Submitted { job_name: String },
    /// The host must cancel its job
    Rejected { reason: String },
}

/// Result of an abort request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortOutcome {
    /// The remote job was canceled; the host may mark its job aborted
    Aborted,
    /// The host job must stay as it is
    NotAborted { reason: String },
}

/// Whether the translator can be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable { reason: String },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// The GlobalSight translator as seen by the host
pub struct GlobalSightTranslator {
    connector: GlobalSightConnector,
    store: Arc<dyn JobNameStore>,
    fields: Arc<dyn FieldSource>,
}

impl GlobalSightTranslator {
    /// Create a translator using the fields each job carries
    pub fn new(connector: GlobalSightConnector, store: Arc<dyn JobNameStore>) -> Self {
        Self {
            connector,
            store,
            fields: Arc::new(EmbeddedFields),
        }
    }

    /// Use a host-specific field extraction
    pub fn with_field_source(mut self, fields: Arc<dyn FieldSource>) -> Self {
        self.fields = fields;
        self
    }

    pub fn connector(&self) -> &GlobalSightConnector {
        &self.connector
    }

    /// Submit a host job and record its remote name
    pub async fn request_translation(&self, job: &TranslationJob) -> RequestOutcome {
        self.request_translation_named(job, None).await
    }

    /// Submit a host job under a caller supplied name
    pub async fn request_translation_named(
        &self,
        job: &TranslationJob,
        name: Option<String>,
    ) -> RequestOutcome {
        let fields = match self.fields.translatable_fields(job) {
            Ok(fields) => fields,
            Err(e) => return self.reject(job, e.to_string()),
        };
        let job = job.clone().with_fields(fields);

        let handle = match self.connector.submit(&job, name).await {
            Ok(handle) => handle,
            Err(e) => return self.reject(&job, e.to_string()),
        };

        if let Err(e) = self.store.delete(&job.job_id).await {
            warn!("Could not clear previous record of job {}: {}", job.job_id, e);
        }
        if let Err(e) = self.store.save(&job.job_id, &handle.job_name).await {
            return self.reject(
                &job,
                format!(
                    "submitted as '{}' but the job name could not be recorded: {}",
                    handle.job_name, e
                ),
            );
        }

        info!("Job {} submitted to GlobalSight as '{}'", job.job_id, handle.job_name);
        RequestOutcome::Submitted {
            job_name: handle.job_name,
        }
    }

    fn reject(&self, job: &TranslationJob, reason: String) -> RequestOutcome {
        error!("Translation of job {} rejected: {}", job.job_id, reason);
        RequestOutcome::Rejected { reason }
    }

    /// Whether the configured service and file profile can be reached
    pub async fn check_available(&self) -> Availability {
        match self.connector.resolve_locales().await {
            Ok(_) => Availability::Available,
            Err(e) => {
                warn!("GlobalSight translator unavailable: {}", e);
                Availability::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Target locales for content in `source_language`
    ///
    /// Empty when the profile does not serve that language or the service
    /// cannot be reached.
    pub async fn supported_target_languages(&self, source_language: &str) -> Vec<String> {
        match self
            .connector
            .list_supported_target_locales(Some(source_language))
            .await
        {
            Ok(locales) => locales,
            Err(e) => {
                error!("Could not list GlobalSight target locales: {}", e);
                Vec::new()
            }
        }
    }

    /// Status of the remote job of a host job
    pub async fn job_status(&self, host_job_id: &str) -> StatusResult {
        match self.store.find_job_name(host_job_id).await {
            Ok(Some(job_name)) => self.connector.poll_status(&job_name).await,
            Ok(None) => {
                error!("No GlobalSight job recorded for job {}", host_job_id);
                StatusResult::PermanentError
            }
            Err(e) => {
                error!("Could not look up job {}: {}", host_job_id, e);
                StatusResult::PermanentError
            }
        }
    }

    /// Cancel the remote job of a host job
    ///
    /// The record is archived only once the service confirmed the cancel.
    pub async fn abort_translation(&self, host_job_id: &str) -> AbortOutcome {
        let job_name = match self.store.find_job_name(host_job_id).await {
            Ok(Some(job_name)) => job_name,
            Ok(None) => {
                return AbortOutcome::NotAborted {
                    reason: format!("no GlobalSight job recorded for job {}", host_job_id),
                }
            }
            Err(e) => {
                return AbortOutcome::NotAborted {
                    reason: e.to_string(),
                }
            }
        };

        if let Err(e) = self.connector.cancel(&job_name).await {
            error!("Could not cancel GlobalSight job '{}': {}", job_name, e);
            return AbortOutcome::NotAborted {
                reason: e.to_string(),
            };
        }

        if let Err(e) = self.store.archive(host_job_id).await {
            warn!("GlobalSight job '{}' canceled but not archived: {}", job_name, e);
        }
        info!("Job {} aborted", host_job_id);
        AbortOutcome::Aborted
    }

    /// Translated fields of a host job
    pub async fn fetch_translation(
        &self,
        host_job_id: &str,
    ) -> Result<IndexMap<String, String>, AppError> {
        let job_name = self
            .store
            .find_job_name(host_job_id)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?
            .ok_or_else(|| {
                AppError::Storage(format!("No GlobalSight job recorded for job {}", host_job_id))
            })?;

        Ok(self.connector.receive(&job_name).await?)
    }
}
