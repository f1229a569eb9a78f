use serde::Deserialize;
use std::time::Duration;
use ureq::unversioned::multipart::{Form, Part};
use ureq::Agent;

use bugreport_core::{
    ReportSubmitter, Session, SessionError, SessionSource, SubmissionAck, SubmissionError,
    SubmissionPayload,
};

use crate::error::{PortalError, Result};

/// Error body returned by `/api/bug-report` on failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for the bug report backend
pub struct PortalClient {
    agent: Agent,
    base_url: String,
    session_cookie: Option<String>,
}

impl PortalClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_cookie: None,
        }
    }

    /// Cookie header sent with the session check, standing in for browser credentials
    pub fn with_session_cookie(mut self, cookie: Option<String>) -> Self {
        self.session_cookie = cookie.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Where the OAuth flow starts; the browser is sent here
    pub fn login_url(&self) -> String {
        format!("{}/login/github", self.base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/user`
    pub fn get_session(&self) -> Result<Session> {
        let mut request = self
            .agent
            .get(&self.url("/api/user"))
            .header("Accept", "application/json");
        if let Some(cookie) = &self.session_cookie {
            request = request.header("Cookie", cookie);
        }

        let mut response = request.call()?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(PortalError::Api {
                status,
                message: None,
            });
        }

        let body = response.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }

    /// `POST /api/bug-report` as multipart form data
    pub fn submit_report(&self, payload: &SubmissionPayload) -> Result<SubmissionAck> {
        let device_info = payload.device_info_json();
        let repository_id = payload.repository_id.map(|id| id.to_string());

        let mut form = Form::new()
            .text("title", &payload.title)
            .text("description", &payload.description)
            .text("deviceInfo", &device_info);
        if let Some(id) = &repository_id {
            form = form.text("repository_id", id);
        }
        if let Some(screenshot) = &payload.screenshot {
            let part = Part::bytes(&screenshot.data)
                .file_name(&screenshot.file_name)
                .mime_str(&screenshot.content_type)?;
            form = form.part("screenshot", part);
        }

        let mut response = self.agent.post(&self.url("/api/bug-report")).send(form)?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;

        if !(200..300).contains(&status) {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            return Err(PortalError::Api { status, message });
        }

        // A 2xx with an unexpected body still counts as accepted
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }
}

impl SessionSource for PortalClient {
    fn current_session(&self) -> std::result::Result<Session, SessionError> {
        self.get_session().map_err(SessionError::from)
    }
}

impl ReportSubmitter for PortalClient {
    fn submit(&self, payload: &SubmissionPayload) -> std::result::Result<SubmissionAck, SubmissionError> {
        tracing::debug!(
            url = %self.url("/api/bug-report"),
            repository_id = ?payload.repository_id,
            has_screenshot = payload.screenshot.is_some(),
            "Submitting bug report"
        );
        self.submit_report(payload).map_err(SubmissionError::from)
    }
}
