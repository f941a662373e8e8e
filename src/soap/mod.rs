/*!
 * SOAP channel to the GlobalSight web service.
 *
 * The connector never talks to the network directly. It goes through a
 * [`SoapTransport`], which carries both the SOAP operations and the plain
 * downloads of exported documents:
 * - `http`: reqwest implementation used in production
 * - `mock`: scripted implementation for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ConnectorError;

pub mod envelope;
pub mod http;
pub mod mock;

pub use http::HttpSoapTransport;
pub use mock::MockTransport;

/// Parameters whose values must never reach the logs
const SECRET_PARAMS: &[&str] = &["p_password", "p_accessToken", "accessToken"];

/// Ordered SOAP operation parameters
///
/// GlobalSight binds RPC parameters by position, so order is part of the
/// contract alongside the names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoapParams {
    entries: Vec<(String, String)>,
}

impl SoapParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|(n, _)| n).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render for logging with credentials masked and long values shortened
    pub fn redacted(&self) -> String {
        self.iter()
            .map(|(name, value)| {
                if SECRET_PARAMS.contains(&name) {
                    format!("{}=***", name)
                } else if value.chars().count() > 64 {
                    let head: String = value.chars().take(64).collect();
                    format!("{}={}...", name, head)
                } else {
                    format!("{}={}", name, value)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Transport carrying GlobalSight calls
#[async_trait]
pub trait SoapTransport: Send + Sync + Debug {
    /// Invoke a SOAP operation and return its string return value
    ///
    /// A void operation returns an empty string. SOAP faults and HTTP
    /// failures are `ConnectorError::TransportFault`.
    async fn call(&self, operation: &str, params: &SoapParams) -> Result<String, ConnectorError>;

    /// Fetch a plain document (exported translations) over the same
    /// proxy and timeout settings as the SOAP calls
    async fn download(&self, url: &str) -> Result<String, ConnectorError>;
}
