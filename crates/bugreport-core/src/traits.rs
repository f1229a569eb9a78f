use serde::{Deserialize, Serialize};

use crate::device::{DeviceInfo, EnvironmentSnapshot};
use crate::error::{SessionError, SubmissionError, TransportError};
use crate::models::{Credential, Screenshot};

/// A raw HTTP response as seen by the pagination loop
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Issues authenticated GET requests for the repository listing
///
/// Implementations return `Ok` for every HTTP response, whatever its status;
/// `Err` is reserved for failures where no response arrived at all.
pub trait PageTransport {
    fn get(&self, url: &str, authorization: &str) -> Result<HttpResponse, TransportError>;
}

impl<T: PageTransport + ?Sized> PageTransport for &T {
    fn get(&self, url: &str, authorization: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url, authorization)
    }
}

/// The logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionUser {
    pub login: String,
}

/// Body of a successful `GET /api/user`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Session {
    pub user: SessionUser,
    pub access_token: Credential,
}

/// Answers whether the user already has an authenticated session
pub trait SessionSource {
    fn current_session(&self) -> Result<Session, SessionError>;
}

/// A validated report ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub title: String,
    pub description: String,
    pub device_info: DeviceInfo,
    pub repository_id: Option<u64>,
    pub screenshot: Option<Screenshot>,
}

impl SubmissionPayload {
    /// `deviceInfo` form field value
    pub fn device_info_json(&self) -> String {
        self.device_info.to_json()
    }
}

/// Body of a successful `POST /api/bug-report`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmissionAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub bug_report_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Delivers a report to the backend
pub trait ReportSubmitter {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionAck, SubmissionError>;
}

/// Source of the runtime facts recorded in [`DeviceInfo`]
pub trait EnvironmentProvider {
    fn snapshot(&self) -> EnvironmentSnapshot;
}

impl EnvironmentProvider for EnvironmentSnapshot {
    fn snapshot(&self) -> EnvironmentSnapshot {
        self.clone()
    }
}
