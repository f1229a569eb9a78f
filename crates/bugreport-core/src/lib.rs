pub mod device;
pub mod error;
pub mod form;
pub mod models;
pub mod pagination;
pub mod selector;
pub mod session;
pub mod traits;

pub use device::{DeviceInfo, EnvironmentSnapshot};
pub use error::{
    FetchError, FetchErrorKind, SessionError, SubmissionError, SubmitError, TransportError,
};
pub use form::{BugReportForm, DraftReport, FormField, SubmitPhase, SubmitStatus, ValidationErrors};
pub use models::*;
pub use pagination::{next_link, parse_link_header, RepoFetcher, DEFAULT_API_URL, DEFAULT_MAX_PAGES};
pub use selector::{RepositorySelector, SelectorState};
pub use session::{SessionBootstrap, SessionState};
pub use traits::{
    EnvironmentProvider, HttpResponse, PageTransport, ReportSubmitter, Session, SessionSource,
    SessionUser, SubmissionAck, SubmissionPayload,
};
