use std::time::Duration;
use ureq::Agent;

use bugreport_core::{HttpResponse, PageTransport, TransportError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking GitHub REST transport
///
/// Non-2xx responses come back as ordinary responses; only connection-level
/// failures are errors.
pub struct UreqTransport {
    agent: Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent }
    }
}

impl PageTransport for UreqTransport {
    fn get(&self, url: &str, authorization: &str) -> Result<HttpResponse, TransportError> {
        let mut response = self
            .agent
            .get(url)
            .header("Authorization", authorization)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .call()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        tracing::trace!(url, status, "GitHub response");
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
