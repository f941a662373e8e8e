/*!
 * Error types for the GlobalSight connector.
 *
 * Every remote operation returns `Result<_, ConnectorError>`, so callers can
 * always tell "the remote answered with nothing" apart from "the call failed".
 * The CLI and the job-name store sit behind `AppError`.
 */

use thiserror::Error;

/// Errors that can occur when talking to the GlobalSight service
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// The SOAP or HTTP call failed, or the service answered with a SOAP fault
    #[error("Call to '{operation}' failed: {message}")]
    TransportFault {
        /// Remote operation (or download URL) that failed
        operation: String,
        /// Transport error or fault description
        message: String,
    },

    /// Login was rejected or returned no token
    #[error("Authentication error: {0}")]
    AuthenticationFailure(String),

    /// The connector is not usable with its current settings
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A response document could not be decoded
    #[error("Failed to parse {document}: {message}")]
    ParseError {
        /// Kind of document being decoded
        document: &'static str,
        /// Decoder error
        message: String,
    },

    /// The remote job reached a failed state after submission
    #[error("Remote job '{job_name}' failed with status {state}")]
    RemoteJobFailure {
        /// GlobalSight job name
        job_name: String,
        /// Last state observed
        state: String,
    },
}

impl ConnectorError {
    /// Build a transport fault for the given operation
    pub fn transport(operation: impl Into<String>, message: impl ToString) -> Self {
        Self::TransportFault {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Build a parse error for the given document kind
    pub fn parse(document: &'static str, message: impl ToString) -> Self {
        Self::ParseError {
            document,
            message: message.to_string(),
        }
    }

    /// Whether this error means the connector cannot be used at all
    ///
    /// Authentication and configuration problems make the translator
    /// unavailable; the other kinds concern a single call or job.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailure(_) | Self::ConfigurationError(_)
        )
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the connector
    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),

    /// Error from the job-name store
    #[error("Storage error: {0}")]
    Storage(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Storage(error.to_string())
    }
}
