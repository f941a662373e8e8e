use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::job_title::TitlePolicy;
use crate::wire::fields::NameEncoding;

/// Application configuration module
/// This module handles the connector configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Per-translator connector settings
    pub connector: ConnectorConfig,

    /// Location of the job-name database (defaults to the user data dir)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Reference to the GlobalSight file profile used for uploads
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileProfileRef {
    /// Profile identifier, used directly as the lookup key
    Id(String),
    /// Profile name, resolved by scanning the profile listing
    Name(String),
}

impl FileProfileRef {
    /// The raw identifier or name
    pub fn value(&self) -> &str {
        match self {
            Self::Id(value) | Self::Name(value) => value,
        }
    }
}

impl std::fmt::Display for FileProfileRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id '{}'", id),
            Self::Name(name) => write!(f, "name '{}'", name),
        }
    }
}

impl Default for FileProfileRef {
    fn default() -> Self {
        Self::Id(String::new())
    }
}

/// When the connector obtains an access token
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenPolicy {
    /// Log in before every remote operation
    #[default]
    PerCall,
    /// Log in once and reuse the token for the connector's lifetime
    PerInstance,
}

/// HTTP proxy used for both SOAP calls and export downloads
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy host name or address
    pub host: String,
    /// Proxy port
    pub port: u16,
}

impl ProxyConfig {
    /// Proxy URL in the form reqwest expects
    pub fn url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            format!("{}:{}", self.host.trim_end_matches('/'), self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

/// Settings for the post-submission `UPLOADING` recheck
///
/// GlobalSight offers no completion notification, so a job still reporting
/// `UPLOADING` is checked again after a fixed delay. The defaults (5 seconds,
/// one recheck) are a heuristic with no documented basis in the service.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UploadCheckConfig {
    /// Delay before each recheck, in milliseconds
    #[serde(default = "default_recheck_delay_ms")]
    pub recheck_delay_ms: u64,

    /// How many times an `UPLOADING` job is rechecked before giving up
    #[serde(default = "default_max_rechecks")]
    pub max_rechecks: u32,
}

impl UploadCheckConfig {
    pub fn recheck_delay(&self) -> Duration {
        Duration::from_millis(self.recheck_delay_ms)
    }
}

impl Default for UploadCheckConfig {
    fn default() -> Self {
        Self {
            recheck_delay_ms: default_recheck_delay_ms(),
            max_rechecks: default_max_rechecks(),
        }
    }
}

/// GlobalSight connector configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConnectorConfig {
    /// Web service endpoint (the WSDL lives at `{endpoint}?wsdl`)
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// GlobalSight user name
    #[serde(default = "String::new")]
    pub username: String,

    /// GlobalSight password
    #[serde(default = "String::new")]
    pub password: String,

    /// File profile selecting locale pairs and routing
    #[serde(default)]
    pub file_profile: FileProfileRef,

    /// Namespace of the SOAP operation elements
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Installation identifier mixed into generated job titles
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Comment attached to every created job
    #[serde(default = "default_comment")]
    pub comment: String,

    /// Token reuse policy
    #[serde(default)]
    pub token_policy: TokenPolicy,

    /// Job title policy
    #[serde(default)]
    pub title_policy: TitlePolicy,

    /// How field names are written into the upload document
    #[serde(default)]
    pub name_encoding: NameEncoding,

    /// `UPLOADING` recheck settings
    #[serde(default)]
    pub upload_check: UploadCheckConfig,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional HTTP proxy
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
}

impl ConnectorConfig {
    /// Create a configuration with the given endpoint, credentials and profile
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        file_profile: FileProfileRef,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: username.into(),
            password: password.into(),
            file_profile,
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the connector settings
    pub fn validate(&self) -> Result<()> {
        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| anyhow!("Invalid endpoint URL '{}': {}", self.endpoint, e))?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(anyhow!(
                "Endpoint must use http or https, got '{}'",
                endpoint.scheme()
            ));
        }

        if self.username.trim().is_empty() {
            return Err(anyhow!("GlobalSight username is required"));
        }

        if self.file_profile.value().trim().is_empty() {
            return Err(anyhow!("A file profile id or name is required"));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }

        if let Some(proxy) = &self.proxy {
            if proxy.host.trim().is_empty() {
                return Err(anyhow!("Proxy host must not be empty"));
            }
            if proxy.port == 0 {
                return Err(anyhow!("Proxy port must not be zero"));
            }
        }

        if let TitlePolicy::AnonymousForForeignSource { primary_language } = &self.title_policy {
            crate::language_utils::validate_language_code(primary_language)?;
        }

        Ok(())
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            username: String::new(),
            password: String::new(),
            file_profile: FileProfileRef::default(),
            namespace: default_namespace(),
            base_url: default_base_url(),
            comment: default_comment(),
            token_policy: TokenPolicy::default(),
            title_policy: TitlePolicy::default(),
            name_encoding: NameEncoding::default(),
            upload_check: UploadCheckConfig::default(),
            timeout_secs: default_timeout_secs(),
            proxy: None,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_namespace() -> String {
    "http://www.globalsight.com/webservices/".to_string()
}

fn default_base_url() -> String {
    "http://localhost".to_string()
}

fn default_comment() -> String {
    "Drupal GlobalSight Translation Module".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_recheck_delay_ms() -> u64 {
    5000
}

fn default_max_rechecks() -> u32 {
    1
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.connector.validate()
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            connector: ConnectorConfig::default(),
            database_path: None,
            log_level: LogLevel::default(),
        }
    }
}
