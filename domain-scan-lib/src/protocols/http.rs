//! HTTP activity probing.
//!
//! A registered domain counts as active when a plain-HTTP GET to its root
//! answers with status 200. HTTPS is never attempted.

use crate::error::DomainScanError;
use crate::protocols::ActivityProbe;
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// HTTP client used for activity probes.
#[derive(Clone)]
pub struct HttpProbe {
    /// HTTP client for making probe requests
    http_client: reqwest::Client,
    /// Timeout for each probe request
    timeout: Duration,
}

impl HttpProbe {
    /// Create a new probe with the default 3 second timeout.
    pub fn new() -> Result<Self, DomainScanError> {
        Self::with_timeout(Duration::from_secs(3))
    }

    /// Create a new probe with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainScanError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainScanError::internal(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            timeout,
        })
    }

    /// Issue `GET http://<domain>` and return the response status.
    pub async fn fetch_status(&self, domain: &str) -> Result<StatusCode, DomainScanError> {
        let url = probe_url(domain);

        let response = tokio::time::timeout(self.timeout, self.http_client.get(&url).send())
            .await
            .map_err(|_| DomainScanError::timeout(format!("HTTP GET {}", url), self.timeout))?
            .map_err(|e| DomainScanError::from_request(domain, e, self.timeout))?;

        Ok(response.status())
    }
}

impl ActivityProbe for HttpProbe {
    fn status(&self, domain: &str) -> impl Future<Output = Result<u16, DomainScanError>> + Send {
        async move { self.fetch_status(domain).await.map(|status| status.as_u16()) }
    }
}

/// Decide whether a domain is actively served.
///
/// Only an exact 200 counts; any other status or any request failure is
/// reported as inactive.
pub async fn is_active<P: ActivityProbe>(probe: &P, domain: &str) -> bool {
    match probe.status(domain).await {
        Ok(status) => {
            debug!(domain, status, "HTTP probe answered");
            status == StatusCode::OK.as_u16()
        }
        Err(e) => {
            debug!(domain, error = %e, "HTTP probe failed");
            false
        }
    }
}

/// Build the plain-HTTP URL probed for a domain.
fn probe_url(domain: &str) -> String {
    format!("http://{}", domain)
}
