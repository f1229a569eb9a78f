use bugreport_core::{SessionError, SubmissionError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, PortalError>;

impl From<PortalError> for SessionError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::Http(e) => SessionError::Transport(e.to_string()),
            PortalError::Parse(e) => SessionError::Parse(e.to_string()),
            PortalError::Api { status, .. } => SessionError::NotAuthenticated(status),
        }
    }
}

impl From<PortalError> for SubmissionError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::Http(e) => SubmissionError::Transport(e.to_string()),
            PortalError::Parse(e) => SubmissionError::Transport(e.to_string()),
            PortalError::Api { status, message } => SubmissionError::Rejected { status, message },
        }
    }
}
