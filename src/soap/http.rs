use async_trait::async_trait;
use log::{debug, error};
use reqwest::{header, Client, Proxy};

use super::envelope;
use super::{SoapParams, SoapTransport};
use crate::app_config::ConnectorConfig;
use crate::errors::ConnectorError;

/// SOAP over HTTP transport for the GlobalSight web service
#[derive(Debug, Clone)]
pub struct HttpSoapTransport {
    /// Service location; requests are POSTed here
    endpoint: String,
    /// Namespace of the operation elements
    namespace: String,
    /// HTTP client shared by SOAP calls and downloads
    client: Client,
}

impl HttpSoapTransport {
    /// Create a transport from connector settings
    ///
    /// The timeout and optional proxy apply to every request, including
    /// downloads of exported documents.
    pub fn new(config: &ConnectorConfig) -> Result<Self, ConnectorError> {
        let mut builder = Client::builder()
            .timeout(config.timeout())
            .pool_idle_timeout(std::time::Duration::from_secs(90));

        if let Some(proxy) = &config.proxy {
            let proxy = Proxy::all(proxy.url()).map_err(|e| {
                ConnectorError::ConfigurationError(format!("Invalid proxy settings: {}", e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            ConnectorError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            namespace: config.namespace.clone(),
            client,
        })
    }

    /// The WSDL location of the configured endpoint
    pub fn wsdl_url(&self) -> String {
        format!("{}?wsdl", self.endpoint)
    }
}

#[async_trait]
impl SoapTransport for HttpSoapTransport {
    async fn call(&self, operation: &str, params: &SoapParams) -> Result<String, ConnectorError> {
        debug!("SOAP call {} ({})", operation, params.redacted());

        let request = envelope::build_request(&self.namespace, operation, params);
        let response = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", "\"\"")
            .body(request)
            .send()
            .await
            .map_err(|e| ConnectorError::transport(operation, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ConnectorError::transport(operation, e))?;

        // Faults usually arrive with HTTP 500, so the body is decoded first.
        match envelope::parse_response(operation, &body) {
            Ok(value) if status.is_success() => Ok(value),
            Err(fault @ ConnectorError::TransportFault { .. }) => {
                error!("GlobalSight rejected {}: {}", operation, fault);
                Err(fault)
            }
            Err(parse_error) if status.is_success() => Err(parse_error),
            _ => {
                let snippet: String = body.chars().take(200).collect();
                error!("GlobalSight HTTP error on {} ({}): {}", operation, status, snippet);
                Err(ConnectorError::transport(
                    operation,
                    format!("HTTP {}: {}", status, snippet),
                ))
            }
        }
    }

    async fn download(&self, url: &str) -> Result<String, ConnectorError> {
        debug!("Downloading {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ConnectorError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            error!("Download of {} failed with HTTP {}", url, status);
            return Err(ConnectorError::transport(url, format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| ConnectorError::transport(url, e))
    }
}
