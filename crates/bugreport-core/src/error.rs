use thiserror::Error;

use crate::form::ValidationErrors;

/// Failures of the repository listing. Display strings are the user-facing messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Invalid token")]
    Unauthorized,

    #[error("Rate limited")]
    RateLimited,

    /// Non-success status other than 401/403, network failure, or an unreadable body
    #[error("Failed to fetch repositories")]
    TransferFailed {
        status: Option<u16>,
        detail: String,
    },

    #[error("Too many pages (limit {limit})")]
    TooManyPages { limit: usize },
}

/// Failure below HTTP: no usable response arrived
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        FetchError::transport(err.to_string())
    }
}

/// Coarse classification of a [`FetchError`], kept by the selector's failed state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Unauthorized,
    RateLimited,
    TransferFailed,
    TooManyPages,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Unauthorized => FetchErrorKind::Unauthorized,
            FetchError::RateLimited => FetchErrorKind::RateLimited,
            FetchError::TransferFailed { .. } => FetchErrorKind::TransferFailed,
            FetchError::TooManyPages { .. } => FetchErrorKind::TooManyPages,
        }
    }

    /// Map a failed HTTP status to its error class
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        match status {
            401 => FetchError::Unauthorized,
            403 => FetchError::RateLimited,
            _ => FetchError::TransferFailed {
                status: Some(status),
                detail: detail.into(),
            },
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        FetchError::TransferFailed {
            status: None,
            detail: detail.into(),
        }
    }
}

impl FetchErrorKind {
    /// The message shown next to a disabled repository picker
    pub fn message(&self) -> &'static str {
        match self {
            FetchErrorKind::Unauthorized => "Invalid token",
            FetchErrorKind::RateLimited => "Rate limited",
            FetchErrorKind::TransferFailed | FetchErrorKind::TooManyPages => {
                "Failed to fetch repositories"
            }
        }
    }
}

pub const SUBMISSION_FALLBACK_MESSAGE: &str = "Failed to submit bug report. Please try again.";

/// Failure reported by the bug report submission endpoint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Submission rejected ({status}): {}", .message.as_deref().unwrap_or(SUBMISSION_FALLBACK_MESSAGE))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("Submission transport error: {0}")]
    Transport(String),
}

impl SubmissionError {
    /// The server's `error` string when it sent one, else the generic fallback
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            SubmissionError::Transport(message) if !message.trim().is_empty() => message.clone(),
            _ => SUBMISSION_FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Failure of a form submit attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("A submission is already in progress")]
    InFlight,

    #[error("{}", .0.user_message())]
    Submission(SubmissionError),
}

/// Failure of the "am I logged in" check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Not authenticated (HTTP {0})")]
    NotAuthenticated(u16),

    #[error("Session check failed: {0}")]
    Transport(String),

    #[error("Malformed session response: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(FetchError::from_status(401, ""), FetchError::Unauthorized);
        assert_eq!(FetchError::from_status(403, ""), FetchError::RateLimited);
        assert_eq!(
            FetchError::from_status(500, "boom").kind(),
            FetchErrorKind::TransferFailed
        );
        assert_eq!(
            FetchError::from_status(404, "missing").to_string(),
            "Failed to fetch repositories"
        );
    }

    #[test]
    fn transport_errors_become_transfer_failed() {
        let err = FetchError::from(TransportError::Request("connection refused".to_string()));

        assert_eq!(err.kind(), FetchErrorKind::TransferFailed);
        match err {
            FetchError::TransferFailed { status, detail } => {
                assert_eq!(status, None);
                assert_eq!(detail, "Request failed: connection refused");
            }
            other => panic!("expected TransferFailed, got {:?}", other),
        }
    }

    #[test]
    fn user_messages() {
        assert_eq!(FetchError::Unauthorized.to_string(), "Invalid token");
        assert_eq!(FetchErrorKind::RateLimited.message(), "Rate limited");
        assert_eq!(
            FetchErrorKind::TooManyPages.message(),
            "Failed to fetch repositories"
        );
    }

    #[test]
    fn submission_message_falls_back_when_missing() {
        let verbatim = SubmissionError::Rejected {
            status: 500,
            message: Some("Server temporarily unavailable".to_string()),
        };
        assert_eq!(verbatim.user_message(), "Server temporarily unavailable");

        let bare = SubmissionError::Rejected {
            status: 502,
            message: None,
        };
        assert_eq!(bare.user_message(), SUBMISSION_FALLBACK_MESSAGE);

        let blank = SubmissionError::Transport(String::new());
        assert_eq!(blank.user_message(), SUBMISSION_FALLBACK_MESSAGE);
    }
}
