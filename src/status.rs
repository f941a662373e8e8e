/*!
 * GlobalSight job status vocabulary.
 *
 * `getStatus` reports string states; older responses carry numeric codes
 * from a fixed table. Both spellings are reproduced verbatim.
 */

use std::fmt;

use crate::wire::JobStatusReport;

/// Remote job state as reported by `getStatus`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobState {
    /// Upload still in flight, or stuck
    Uploading,
    /// Translation memory matching started: the submission was accepted
    Leveraging,
    /// The uploaded document could not be imported
    ImportFailed,
    Archived,
    Dispatched,
    Exported,
    Localized,
    Canceled,
    /// Any other state, kept verbatim
    Other(String),
}

impl JobState {
    /// Parse a state string or a numeric status code
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            return match raw.parse::<u32>().ok().and_then(StatusCode::from_code) {
                Some(code) => code.into(),
                None => Self::Other(raw.to_string()),
            };
        }

        match raw {
            "UPLOADING" => Self::Uploading,
            "LEVERAGING" => Self::Leveraging,
            "IMPORT_FAILED" => Self::ImportFailed,
            "ARCHIVED" => Self::Archived,
            "DISPATCHED" => Self::Dispatched,
            "EXPORTED" => Self::Exported,
            "LOCALIZED" => Self::Localized,
            "CANCELED" => Self::Canceled,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire spelling of the state
    pub fn as_str(&self) -> &str {
        match self {
            Self::Uploading => "UPLOADING",
            Self::Leveraging => "LEVERAGING",
            Self::ImportFailed => "IMPORT_FAILED",
            Self::Archived => "ARCHIVED",
            Self::Dispatched => "DISPATCHED",
            Self::Exported => "EXPORTED",
            Self::Localized => "LOCALIZED",
            Self::Canceled => "CANCELED",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric status codes used by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Archived = 0,
    Dispatched = 1,
    Exported = 2,
    Localized = 3,
    Canceled = 4,
}

impl StatusCode {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Archived),
            1 => Some(Self::Dispatched),
            2 => Some(Self::Exported),
            3 => Some(Self::Localized),
            4 => Some(Self::Canceled),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }
}

impl From<StatusCode> for JobState {
    fn from(code: StatusCode) -> Self {
        match code {
            StatusCode::Archived => Self::Archived,
            StatusCode::Dispatched => Self::Dispatched,
            StatusCode::Exported => Self::Exported,
            StatusCode::Localized => Self::Localized,
            StatusCode::Canceled => Self::Canceled,
        }
    }
}

/// Outcome of a status poll
///
/// `PermanentError` means the status could not be fetched or decoded. The
/// host must treat it as fatal and cancel its job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusResult {
    Reported(JobStatusReport),
    PermanentError,
}

impl StatusResult {
    pub const PERMANENT_ERROR: &'static str = "PERMANENT ERROR";

    pub fn state(&self) -> Option<&JobState> {
        match self {
            Self::Reported(report) => Some(&report.state),
            Self::PermanentError => None,
        }
    }

    pub fn is_permanent_error(&self) -> bool {
        matches!(self, Self::PermanentError)
    }
}

impl fmt::Display for StatusResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reported(report) => write!(f, "{}", report.state),
            Self::PermanentError => f.write_str(Self::PERMANENT_ERROR),
        }
    }
}
