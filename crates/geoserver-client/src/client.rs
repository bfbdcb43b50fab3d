//! HTTP transport bound to one GeoServer instance.

use reqwest::{header, Client};
use tracing::{debug, error, info, warn};

use ogc_common::{GeoServerError, GeoServerResult};

use crate::config::GeoServerConfig;

pub(crate) const CAPABILITIES_QUERY: &str = "service=WMS&version=1.1.1&request=GetCapabilities";

/// Reusable request executor for one GeoServer.
///
/// The client holds no per-request state: every call to
/// [`get_text`](Self::get_text) counts its own attempts, so concurrent calls
/// never share a retry budget.
#[derive(Debug, Clone)]
pub struct GeoServerClient {
    http: Client,
    config: GeoServerConfig,
}

impl GeoServerClient {
    /// Validate the configuration and build the HTTP client.
    pub fn new(config: GeoServerConfig) -> GeoServerResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                GeoServerError::InvalidConfig(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GeoServerConfig {
        &self.config
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Full URL of a service endpoint (`wms`, `wfs`) with a query string.
    pub fn endpoint_url(&self, service: &str, query: &str) -> String {
        format!("{}/{}?{}", self.base_url(), service, query)
    }

    /// GET `{base}/{service}?{query}` and return the body.
    ///
    /// A timed-out attempt is retried immediately, up to `max_retries`
    /// times. HTTP errors and other network failures are returned after the
    /// first attempt.
    pub async fn get_text(
        &self,
        service: &str,
        query: &str,
        accept: &str,
    ) -> GeoServerResult<String> {
        let url = self.endpoint_url(service, query);
        let max_retries = self.config.max_retries;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match self.send_once(&url, accept).await {
                Ok(body) => {
                    debug!(url = %url, attempt, bytes = body.len(), "Request completed");
                    return Ok(body);
                }
                Err(e) if e.is_retryable() && attempt <= max_retries => {
                    warn!(
                        url = %url,
                        retry = attempt,
                        max_retries,
                        "Request timed out, retrying"
                    );
                }
                Err(e) => {
                    let e = match e {
                        GeoServerError::Timeout { url, .. } => GeoServerError::Timeout {
                            url,
                            attempts: attempt,
                        },
                        other => other,
                    };
                    error!(url = %url, attempts = attempt, error = %e, "Request failed");
                    return Err(e);
                }
            }
        }
    }

    async fn send_once(&self, url: &str, accept: &str) -> GeoServerResult<String> {
        let mut request = self.http.get(url).header(header::ACCEPT, accept);
        if let Some((username, password)) = self.config.credentials() {
            request = request.basic_auth(username, Some(password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoServerError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| transport_error(url, e))
    }

    /// Check that the server answers a WMS GetCapabilities request.
    ///
    /// Failures are logged and reported as `false`, never raised.
    pub async fn test_connection(&self) -> bool {
        match self
            .get_text("wms", CAPABILITIES_QUERY, "application/vnd.ogc.wms_xml, text/xml")
            .await
        {
            Ok(_) => {
                info!(base_url = %self.base_url(), "GeoServer connection test successful");
                true
            }
            Err(e) => {
                warn!(base_url = %self.base_url(), error = %e, "GeoServer connection test failed");
                false
            }
        }
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> GeoServerError {
    if e.is_timeout() {
        GeoServerError::Timeout {
            url: url.to_string(),
            attempts: 1,
        }
    } else {
        GeoServerError::Network {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_trims_trailing_slash() {
        let client = GeoServerClient::new(GeoServerConfig::new("http://gs:8080/geoserver/")).unwrap();
        assert_eq!(
            client.endpoint_url("wfs", "a=b"),
            "http://gs:8080/geoserver/wfs?a=b"
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = GeoServerClient::new(GeoServerConfig::new("not a url")).unwrap_err();
        assert_eq!(err.kind(), ogc_common::ErrorKind::Config);
    }
}
