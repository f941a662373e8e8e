/*!
 * Tests for error types and conversions
 */

use globalsight_connector::errors::{AppError, ConnectorError};

#[test]
fn test_transportFault_shouldDisplayOperationAndMessage() {
    let error = ConnectorError::transport("cancelJob", "SOAP fault soapenv:Server: no such job");
    let display = error.to_string();
    assert!(display.contains("cancelJob"));
    assert!(display.contains("no such job"));
}

#[test]
fn test_parseError_shouldDisplayDocumentKind() {
    let error = ConnectorError::parse("job status", "missing status element");
    assert_eq!(
        error.to_string(),
        "Failed to parse job status: missing status element"
    );
}

#[test]
fn test_remoteJobFailure_shouldDisplayState() {
    let error = ConnectorError::RemoteJobFailure {
        job_name: "Article_abc".to_string(),
        state: "IMPORT_FAILED".to_string(),
    };
    let display = error.to_string();
    assert!(display.contains("Article_abc"));
    assert!(display.contains("IMPORT_FAILED"));
}

#[test]
fn test_isUnavailable_shouldOnlyHoldForAuthAndConfig() {
    assert!(ConnectorError::AuthenticationFailure("denied".to_string()).is_unavailable());
    assert!(ConnectorError::ConfigurationError("no profile".to_string()).is_unavailable());
    assert!(!ConnectorError::transport("getStatus", "timeout").is_unavailable());
    assert!(!ConnectorError::parse("job status", "empty").is_unavailable());
}

#[test]
fn test_appError_fromConnectorError_shouldWrapCorrectly() {
    let app_error: AppError = ConnectorError::AuthenticationFailure("denied".to_string()).into();
    assert!(matches!(app_error, AppError::Connector(_)));
    assert!(app_error.to_string().contains("Authentication error"));
}

#[test]
fn test_appError_fromIoAndAnyhow_shouldMapVariants() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "job.json");
    assert!(matches!(AppError::from(io_error), AppError::File(_)));

    let other = AppError::from(anyhow::anyhow!("boom"));
    assert!(matches!(other, AppError::Unknown(ref message) if message == "boom"));
}
