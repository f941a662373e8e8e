/*!
 * The GlobalSight connector.
 *
 * Owns the SOAP session and drives the remote job lifecycle:
 * authenticate, discover the file profile and its locales, submit,
 * poll status, verify the upload, cancel and receive translations.
 *
 * Every remote call happens in sequence on the caller's task. The only
 * built-in wait is the recheck of a job that is still `UPLOADING` right
 * after submission.
 */

use base64::{engine::general_purpose::STANDARD, Engine as _};
use indexmap::IndexMap;
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::app_config::{ConnectorConfig, FileProfileRef, TokenPolicy};
use crate::errors::ConnectorError;
use crate::job::{RemoteJobHandle, TranslationJob};
use crate::job_title::JobTitleGenerator;
use crate::language_utils;
use crate::soap::{HttpSoapTransport, SoapParams, SoapTransport};
use crate::status::{JobState, StatusResult};
use crate::wire::fields::UPLOAD_FILE_NAME;
use crate::wire::{
    decode_fields, encode_fields, CancelAck, ExportFiles, FileProfile, FileProfileListing,
    JobStatusReport, LocaleSet, LocalizedDocuments,
};

/// Client for one configured GlobalSight translator
#[derive(Debug)]
pub struct GlobalSightConnector {
    config: ConnectorConfig,
    transport: Arc<dyn SoapTransport>,
    titles: JobTitleGenerator,
    /// Cached access token, only used with `TokenPolicy::PerInstance`
    token: Mutex<Option<String>>,
}

impl GlobalSightConnector {
    /// Create a connector on top of an existing transport
    pub fn new(config: ConnectorConfig, transport: Arc<dyn SoapTransport>) -> Self {
        let titles = JobTitleGenerator::new(config.base_url.clone(), config.title_policy.clone());
        Self {
            config,
            transport,
            titles,
            token: Mutex::new(None),
        }
    }

    /// Create a connector talking HTTP to the configured endpoint
    pub fn from_config(config: ConnectorConfig) -> Result<Self, ConnectorError> {
        config
            .validate()
            .map_err(|e| ConnectorError::ConfigurationError(e.to_string()))?;
        let transport = HttpSoapTransport::new(&config)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Log in and return a fresh access token
    pub async fn authenticate(&self) -> Result<String, ConnectorError> {
        let params = SoapParams::new()
            .with("p_username", self.config.username.as_str())
            .with("p_password", self.config.password.as_str());

        let token = self
            .transport
            .call("login", &params)
            .await
            .map_err(|e| {
                error!("GlobalSight login failed for user '{}': {}", self.config.username, e);
                ConnectorError::AuthenticationFailure(e.to_string())
            })?;

        let token = token.trim();
        if token.is_empty() {
            error!("GlobalSight login for user '{}' returned no token", self.config.username);
            return Err(ConnectorError::AuthenticationFailure(
                "login returned an empty access token".to_string(),
            ));
        }

        debug!("Logged in to GlobalSight as '{}'", self.config.username);
        Ok(token.to_string())
    }

    /// Token for the next operation, according to the token policy
    pub async fn access_token(&self) -> Result<String, ConnectorError> {
        if self.config.token_policy == TokenPolicy::PerCall {
            return self.authenticate().await;
        }

        let cached = self.token.lock().clone();
        if let Some(token) = cached {
            return Ok(token);
        }

        let token = self.authenticate().await?;
        *self.token.lock() = Some(token.clone());
        Ok(token)
    }

    /// Run a remote operation, dropping a cached token when it fails
    async fn invoke(&self, operation: &str, params: SoapParams) -> Result<String, ConnectorError> {
        let result = self.transport.call(operation, &params).await;
        self.forget_token_on_error(result)
    }

    /// Download an exported document, dropping a cached token when it fails
    async fn fetch(&self, url: &str) -> Result<String, ConnectorError> {
        let result = self.transport.download(url).await;
        self.forget_token_on_error(result)
    }

    fn forget_token_on_error<T>(
        &self,
        result: Result<T, ConnectorError>,
    ) -> Result<T, ConnectorError> {
        if result.is_err() && self.config.token_policy == TokenPolicy::PerInstance {
            self.token.lock().take();
        }
        result
    }

    /// All file profiles visible to the user
    pub async fn list_file_profiles(
        &self,
        token: &str,
    ) -> Result<FileProfileListing, ConnectorError> {
        let listing = self
            .invoke(
                "getFileProfileInfoEx",
                SoapParams::new().with("p_accessToken", token),
            )
            .await?;
        FileProfileListing::decode(&listing)
    }

    /// The configured profile, looked up by id with a fallback on names
    pub fn resolve_file_profile<'a>(
        &self,
        listing: &'a FileProfileListing,
    ) -> Result<&'a FileProfile, ConnectorError> {
        let found = match &self.config.file_profile {
            FileProfileRef::Id(id) => listing.by_id(id).or_else(|| listing.by_name(id)),
            FileProfileRef::Name(name) => listing.by_name(name),
        };

        found.ok_or_else(|| {
            ConnectorError::ConfigurationError(format!(
                "File profile with {} not found among {} profiles",
                self.config.file_profile,
                listing.profiles().len()
            ))
        })
    }

    /// Source and target locales of the configured profile
    pub async fn resolve_locales(&self) -> Result<LocaleSet, ConnectorError> {
        Ok(self.current_profile().await?.locales())
    }

    async fn current_profile(&self) -> Result<FileProfile, ConnectorError> {
        let token = self.access_token().await?;
        let listing = self.list_file_profiles(&token).await?;
        self.resolve_file_profile(&listing).cloned()
    }

    /// Whether locale discovery succeeds with the current settings
    pub async fn is_available(&self) -> bool {
        match self.resolve_locales().await {
            Ok(_) => true,
            Err(e) => {
                warn!("GlobalSight translator unavailable: {}", e);
                false
            }
        }
    }

    /// Target locales offered for content in `source_language`
    ///
    /// Empty when the profile does not translate from that language.
    pub async fn list_supported_target_locales(
        &self,
        source_language: Option<&str>,
    ) -> Result<Vec<String>, ConnectorError> {
        let profile = self.current_profile().await?;

        if let Some(language) = source_language {
            if !language_utils::locale_matches_language(&profile.source_locale, language) {
                debug!(
                    "Profile '{}' translates from {}, not {}",
                    profile.name, profile.source_locale, language
                );
                return Ok(Vec::new());
            }
        }

        Ok(profile.target_locales)
    }

    /// Upload a job's fields and create the remote job
    ///
    /// The job is only reported as submitted once its status confirms the
    /// upload was imported. `name` overrides the generated title.
    pub async fn submit(
        &self,
        job: &TranslationJob,
        name: Option<String>,
    ) -> Result<RemoteJobHandle, ConnectorError> {
        let token = self.access_token().await?;
        let listing = self.list_file_profiles(&token).await?;
        let profile = self.resolve_file_profile(&listing)?;

        if !profile
            .target_locales
            .iter()
            .any(|locale| locale == &job.target_locale)
        {
            warn!(
                "Target locale {} is not listed by file profile '{}'",
                job.target_locale, profile.name
            );
        }

        let job_name = name.unwrap_or_else(|| {
            self.titles
                .generate(&job.job_id, &job.label, job.source_language.as_deref())
        });

        let document = encode_fields(&job.job_id, &job.fields, self.config.name_encoding);
        info!(
            "Uploading job {} as '{}' ({} translatable fields) to {}",
            job.job_id,
            job_name,
            job.translatable_count(),
            job.target_locale
        );

        self.invoke(
            "uploadFile",
            SoapParams::new()
                .with("accessToken", token.as_str())
                .with("jobName", job_name.as_str())
                .with("filePath", UPLOAD_FILE_NAME)
                .with("fileProfileId", profile.id.as_str())
                .with("content", STANDARD.encode(document.as_bytes())),
        )
        .await?;

        self.invoke(
            "createJob",
            SoapParams::new()
                .with("accessToken", token.as_str())
                .with("jobName", job_name.as_str())
                .with("comment", self.config.comment.as_str())
                .with("filePaths", UPLOAD_FILE_NAME)
                .with("fileProfileIds", profile.id.as_str())
                .with("targetLocales", job.target_locale.as_str()),
        )
        .await?;

        self.verify_upload(&job_name).await?;
        info!("GlobalSight job '{}' created", job_name);
        Ok(RemoteJobHandle::new(job_name))
    }

    /// Current status of a remote job
    pub async fn get_status(&self, job_name: &str) -> Result<JobStatusReport, ConnectorError> {
        let token = self.access_token().await?;
        let status = self
            .invoke(
                "getStatus",
                SoapParams::new()
                    .with("p_accessToken", token.as_str())
                    .with("p_jobName", job_name),
            )
            .await?;

        if status.trim().is_empty() {
            return Err(ConnectorError::parse("job status", "empty response"));
        }
        JobStatusReport::decode(&status)
    }

    /// Status of a remote job, with every failure folded into `PermanentError`
    pub async fn poll_status(&self, job_name: &str) -> StatusResult {
        match self.get_status(job_name).await {
            Ok(report) => StatusResult::Reported(report),
            Err(e) => {
                error!("Could not get status of GlobalSight job '{}': {}", job_name, e);
                StatusResult::PermanentError
            }
        }
    }

    /// Confirm that a freshly created job was imported
    pub async fn verify_upload(&self, job_name: &str) -> Result<(), ConnectorError> {
        let check = &self.config.upload_check;
        let mut rechecks = 0;

        loop {
            let status = self.poll_status(job_name).await;
            let failure = |state: &str| ConnectorError::RemoteJobFailure {
                job_name: job_name.to_string(),
                state: state.to_string(),
            };

            match status.state() {
                None => return Err(failure(StatusResult::PERMANENT_ERROR)),
                Some(JobState::Leveraging) => return Ok(()),
                // After a recheck only a stuck upload counts as failure
                Some(JobState::ImportFailed) if rechecks == 0 => {
                    error!(
                        "GlobalSight could not import '{}': the document is corrupt or the server timed out",
                        job_name
                    );
                    return Err(failure(JobState::ImportFailed.as_str()));
                }
                Some(JobState::Uploading) if rechecks < check.max_rechecks => {
                    rechecks += 1;
                    debug!(
                        "Job '{}' still uploading, rechecking in {:?} ({}/{})",
                        job_name,
                        check.recheck_delay(),
                        rechecks,
                        check.max_rechecks
                    );
                    tokio::time::sleep(check.recheck_delay()).await;
                }
                Some(JobState::Uploading) => {
                    error!("GlobalSight job '{}' is stuck uploading", job_name);
                    return Err(failure(JobState::Uploading.as_str()));
                }
                Some(other) => {
                    debug!("Job '{}' reported {} after upload", job_name, other);
                    return Ok(());
                }
            }
        }
    }

    /// Cancel a remote job
    pub async fn cancel(&self, job_name: &str) -> Result<CancelAck, ConnectorError> {
        let token = self.access_token().await?;
        let ack = self
            .invoke(
                "cancelJob",
                SoapParams::new()
                    .with("p_accessToken", token.as_str())
                    .with("p_jobName", job_name),
            )
            .await?;

        let ack = CancelAck::decode(&ack)?;
        info!("GlobalSight job '{}' canceled", job_name);
        Ok(ack)
    }

    /// Download and merge every exported translation of a job
    ///
    /// Export files are merged in listing order; a key present in several
    /// files keeps the value of the last one.
    pub async fn receive(&self, job_name: &str) -> Result<IndexMap<String, String>, ConnectorError> {
        let token = self.access_token().await?;
        let job_params = || {
            SoapParams::new()
                .with("p_accessToken", token.as_str())
                .with("p_jobName", job_name)
        };

        let documents = self.invoke("getLocalizedDocuments", job_params()).await?;
        let documents = LocalizedDocuments::decode(&documents)?;

        let exports = self.invoke("getJobExportFiles", job_params()).await?;
        let exports = ExportFiles::decode(&exports)?;
        if exports.paths.is_empty() {
            warn!("GlobalSight job '{}' has no export files", job_name);
        }

        let mut translations = IndexMap::new();
        for path in &exports.paths {
            let url = documents.url_for(path);
            let document = self.fetch(&url).await?;
            let fields = decode_fields(&document)?;
            debug!("Received {} fields from {}", fields.len(), url);
            translations.extend(fields);
        }

        info!(
            "Received {} translated fields for '{}'",
            translations.len(),
            job_name
        );
        Ok(translations)
    }
}
