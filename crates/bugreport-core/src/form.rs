use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::device::DeviceInfo;
use crate::error::{SubmissionError, SubmitError};
use crate::models::{RepositoryRecord, Screenshot, ACCEPTED_IMAGE_TYPES, MAX_SCREENSHOT_BYTES};
use crate::traits::{EnvironmentProvider, ReportSubmitter, SubmissionAck, SubmissionPayload};

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Bug report submitted successfully!";
pub const INVALID_IMAGE_MESSAGE: &str = "Please upload a valid image file (JPEG, PNG, GIF, WebP)";
pub const IMAGE_TOO_LARGE_MESSAGE: &str = "File size must be less than 5MB";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Title,
    Description,
    Screenshot,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::Description => "description",
            FormField::Screenshot => "screenshot",
        }
    }
}

/// Per-field error messages; a field without an entry is valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<FormField, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn set(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    fn clear(&mut self, field: FormField) {
        self.0.remove(&field);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        f.write_str(&messages.join("; "))
    }
}

/// The report being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftReport {
    pub title: String,
    pub description: String,
    pub screenshot: Option<Screenshot>,
    pub device_info: DeviceInfo,
    pub repository_id: Option<u64>,
}

impl DraftReport {
    fn empty(device_info: DeviceInfo) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            screenshot: None,
            device_info,
            repository_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
}

/// Outcome banner of the last submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Success(String),
    Error(String),
}

/// Check type then size; `None` means the file is acceptable
pub fn screenshot_error(file: &Screenshot) -> Option<&'static str> {
    if !ACCEPTED_IMAGE_TYPES.contains(&file.content_type.as_str()) {
        return Some(INVALID_IMAGE_MESSAGE);
    }
    if file.size() > MAX_SCREENSHOT_BYTES {
        return Some(IMAGE_TOO_LARGE_MESSAGE);
    }
    None
}

/// Form state for one bug report
pub struct BugReportForm {
    draft: DraftReport,
    errors: ValidationErrors,
    phase: SubmitPhase,
    status: Option<SubmitStatus>,
    environment: Box<dyn EnvironmentProvider>,
}

impl BugReportForm {
    /// Empty form; device info is captured once, here
    pub fn new(environment: Box<dyn EnvironmentProvider>) -> Self {
        let device_info = DeviceInfo::capture(environment.as_ref());
        Self {
            draft: DraftReport::empty(device_info),
            errors: ValidationErrors::default(),
            phase: SubmitPhase::Idle,
            status: None,
            environment,
        }
    }

    pub fn draft(&self) -> &DraftReport {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn status(&self) -> Option<&SubmitStatus> {
        self.status.as_ref()
    }

    pub fn device_summary(&self) -> String {
        self.draft.device_info.summary()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
        self.errors.clear(FormField::Title);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
        self.errors.clear(FormField::Description);
    }

    /// Attach or clear the screenshot.
    ///
    /// A rejected file also drops any screenshot accepted earlier.
    pub fn select_screenshot(&mut self, file: Option<Screenshot>) -> Result<(), &'static str> {
        let Some(file) = file else {
            self.draft.screenshot = None;
            self.errors.clear(FormField::Screenshot);
            return Ok(());
        };

        if let Some(message) = screenshot_error(&file) {
            tracing::debug!(file = %file.file_name, content_type = %file.content_type, size = file.size(), "Rejected screenshot");
            self.draft.screenshot = None;
            self.errors.set(FormField::Screenshot, message);
            return Err(message);
        }

        self.draft.screenshot = Some(file);
        self.errors.clear(FormField::Screenshot);
        Ok(())
    }

    /// Recompute required-field errors, replacing the previous set
    pub fn validate(&mut self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        if self.draft.title.trim().is_empty() {
            errors.set(FormField::Title, "Title is required");
        }
        if self.draft.description.trim().is_empty() {
            errors.set(FormField::Description, "Description is required");
        }
        self.errors = errors.clone();
        errors
    }

    /// Validate and move to `Submitting`, returning the payload to send
    pub fn begin_submit(
        &mut self,
        repository: Option<&RepositoryRecord>,
    ) -> Result<SubmissionPayload, SubmitError> {
        if self.phase == SubmitPhase::Submitting {
            return Err(SubmitError::InFlight);
        }

        let errors = self.validate();
        if !errors.is_empty() {
            return Err(SubmitError::Validation(errors));
        }

        self.draft.repository_id = repository.map(|r| r.id);
        self.status = None;
        self.phase = SubmitPhase::Submitting;

        Ok(SubmissionPayload {
            title: self.draft.title.clone(),
            description: self.draft.description.clone(),
            device_info: self.draft.device_info.clone(),
            repository_id: self.draft.repository_id,
            screenshot: self.draft.screenshot.clone(),
        })
    }

    /// Record the collaborator's answer and return to `Idle`
    pub fn finish_submit(
        &mut self,
        outcome: Result<SubmissionAck, SubmissionError>,
    ) -> Result<SubmissionAck, SubmitError> {
        self.phase = SubmitPhase::Idle;

        match outcome {
            Ok(ack) => {
                tracing::info!(bug_report_id = ?ack.bug_report_id, "Bug report submitted");
                self.reset();
                self.status = Some(SubmitStatus::Success(SUBMIT_SUCCESS_MESSAGE.to_string()));
                Ok(ack)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Bug report submission failed");
                self.status = Some(SubmitStatus::Error(err.user_message()));
                Err(SubmitError::Submission(err))
            }
        }
    }

    pub fn submit(
        &mut self,
        submitter: &dyn ReportSubmitter,
        repository: Option<&RepositoryRecord>,
    ) -> Result<SubmissionAck, SubmitError> {
        let payload = self.begin_submit(repository)?;
        let outcome = submitter.submit(&payload);
        self.finish_submit(outcome)
    }

    fn reset(&mut self) {
        let device_info = DeviceInfo::capture(self.environment.as_ref());
        self.draft = DraftReport::empty(device_info);
        self.errors = ValidationErrors::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::EnvironmentSnapshot;
    use crate::models::{RepositoryOwner, RepositoryPermissions};
    use chrono::{DateTime, Utc};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSubmitter {
        payloads: RefCell<Vec<SubmissionPayload>>,
        failure: Option<SubmissionError>,
    }

    impl ReportSubmitter for RecordingSubmitter {
        fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionAck, SubmissionError> {
            self.payloads.borrow_mut().push(payload.clone());
            match &self.failure {
                Some(err) => Err(err.clone()),
                None => Ok(SubmissionAck {
                    success: true,
                    bug_report_id: Some("bug_12345".to_string()),
                    message: Some("Bug report submitted successfully".to_string()),
                }),
            }
        }
    }

    fn form() -> BugReportForm {
        BugReportForm::new(Box::new(EnvironmentSnapshot {
            user_agent: Some("test-agent".to_string()),
            platform: Some("test".to_string()),
            language: Some("en-US".to_string()),
            screen: Some((800, 600)),
            viewport: Some((640, 480)),
        }))
    }

    fn image(content_type: &str, size: usize) -> Screenshot {
        Screenshot::new("shot", content_type, vec![0u8; size])
    }

    fn repo() -> RepositoryRecord {
        RepositoryRecord {
            id: 42,
            name: "test-repo".to_string(),
            full_name: Some("testuser/test-repo".to_string()),
            owner: RepositoryOwner {
                login: "testuser".to_string(),
            },
            description: None,
            private: false,
            permissions: RepositoryPermissions::default(),
        }
    }

    #[test]
    fn empty_form_reports_both_required_fields() {
        let mut form = form();

        let errors = form.validate();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(FormField::Title), Some("Title is required"));
        assert_eq!(errors.get(FormField::Description), Some("Description is required"));
    }

    #[test]
    fn whitespace_title_fails_without_calling_submitter() {
        let mut form = form();
        let submitter = RecordingSubmitter::default();
        form.set_title("   ");
        form.set_description("Crashes on save");

        let err = form.submit(&submitter, None).unwrap_err();

        let SubmitError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(FormField::Title), Some("Title is required"));
        assert!(submitter.payloads.borrow().is_empty());
        assert_eq!(form.phase(), SubmitPhase::Idle);
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut form = form();
        form.validate();

        form.set_title("Something");

        assert!(form.errors().get(FormField::Title).is_none());
        assert_eq!(
            form.errors().get(FormField::Description),
            Some("Description is required")
        );
    }

    #[test]
    fn oversized_png_is_rejected() {
        let mut form = form();

        let err = form
            .select_screenshot(Some(image("image/png", 6 * 1024 * 1024)))
            .unwrap_err();

        assert_eq!(err, "File size must be less than 5MB");
        assert!(form.draft().screenshot.is_none());
        assert_eq!(form.errors().get(FormField::Screenshot), Some(IMAGE_TOO_LARGE_MESSAGE));
    }

    #[test]
    fn executable_is_rejected() {
        let mut form = form();

        let err = form
            .select_screenshot(Some(image("application/x-msdownload", 1024)))
            .unwrap_err();

        assert_eq!(err, "Please upload a valid image file (JPEG, PNG, GIF, WebP)");
    }

    #[test]
    fn small_jpeg_is_accepted() {
        let mut form = form();

        form.select_screenshot(Some(image("image/jpeg", 1024))).unwrap();

        assert_eq!(form.draft().screenshot.as_ref().map(Screenshot::size), Some(1024));
        assert!(form.errors().get(FormField::Screenshot).is_none());
    }

    #[test]
    fn exactly_five_mib_is_accepted() {
        let mut form = form();
        assert!(form
            .select_screenshot(Some(image("image/webp", MAX_SCREENSHOT_BYTES)))
            .is_ok());
    }

    #[test]
    fn rejected_file_drops_previous_screenshot() {
        let mut form = form();
        form.select_screenshot(Some(image("image/gif", 10))).unwrap();

        let _ = form.select_screenshot(Some(image("text/plain", 10)));

        assert!(form.draft().screenshot.is_none());
    }

    #[test]
    fn clearing_the_file_clears_its_error() {
        let mut form = form();
        let _ = form.select_screenshot(Some(image("text/plain", 10)));

        form.select_screenshot(None).unwrap();

        assert!(form.errors().is_empty());
        assert!(form.draft().screenshot.is_none());
    }

    #[test]
    fn successful_submission_resets_draft() {
        let mut form = form();
        let submitter = RecordingSubmitter::default();
        let repo = repo();
        form.set_title("Integration Test Bug");
        form.set_description("Steps to reproduce");
        form.select_screenshot(Some(image("image/png", 1024))).unwrap();

        let ack = form.submit(&submitter, Some(&repo)).unwrap();

        assert_eq!(ack.bug_report_id.as_deref(), Some("bug_12345"));
        let payloads = submitter.payloads.borrow();
        assert_eq!(payloads[0].title, "Integration Test Bug");
        assert_eq!(payloads[0].repository_id, Some(42));
        assert!(payloads[0].screenshot.is_some());

        let draft = form.draft();
        assert!(draft.title.is_empty());
        assert!(draft.description.is_empty());
        assert!(draft.screenshot.is_none());
        assert!(draft.repository_id.is_none());
        let stamped = DateTime::parse_from_rfc3339(&draft.device_info.timestamp).unwrap();
        let age = Utc::now() - stamped.with_timezone(&Utc);
        assert!(age.num_seconds().abs() < 5);
        assert_eq!(
            form.status(),
            Some(&SubmitStatus::Success(SUBMIT_SUCCESS_MESSAGE.to_string()))
        );
        assert_eq!(form.phase(), SubmitPhase::Idle);
    }

    #[test]
    fn failed_submission_keeps_draft_and_surfaces_message() {
        let mut form = form();
        let submitter = RecordingSubmitter {
            failure: Some(SubmissionError::Rejected {
                status: 503,
                message: Some("Server temporarily unavailable".to_string()),
            }),
            ..Default::default()
        };
        form.set_title("Test Bug");
        form.set_description("Test Description");

        let err = form.submit(&submitter, None).unwrap_err();

        assert_eq!(err.to_string(), "Server temporarily unavailable");
        assert_eq!(form.draft().title, "Test Bug");
        assert_eq!(
            form.status(),
            Some(&SubmitStatus::Error("Server temporarily unavailable".to_string()))
        );
        assert_eq!(submitter.payloads.borrow()[0].repository_id, None);
    }

    #[test]
    fn failed_submission_without_message_uses_fallback() {
        let mut form = form();
        let submitter = RecordingSubmitter {
            failure: Some(SubmissionError::Rejected {
                status: 500,
                message: None,
            }),
            ..Default::default()
        };
        form.set_title("t");
        form.set_description("d");

        let _ = form.submit(&submitter, None);

        assert_eq!(
            form.status(),
            Some(&SubmitStatus::Error(
                "Failed to submit bug report. Please try again.".to_string()
            ))
        );
    }

    #[test]
    fn second_begin_while_submitting_is_rejected() {
        let mut form = form();
        form.set_title("t");
        form.set_description("d");

        form.begin_submit(None).unwrap();
        assert_eq!(form.phase(), SubmitPhase::Submitting);
        assert_eq!(form.begin_submit(None).unwrap_err(), SubmitError::InFlight);

        form.finish_submit(Ok(SubmissionAck::default())).unwrap();
        assert_eq!(form.phase(), SubmitPhase::Idle);
    }

    #[test]
    fn payload_carries_device_info_json() {
        let mut form = form();
        form.set_title("t");
        form.set_description("d");

        let payload = form.begin_submit(None).unwrap();

        let value: serde_json::Value = serde_json::from_str(&payload.device_info_json()).unwrap();
        assert_eq!(value["userAgent"], "test-agent");
        assert_eq!(value["viewport"], "640x480");
    }

    #[test]
    fn validation_errors_serialize_by_field_name() {
        let mut form = form();
        let errors = form.validate();

        let value = serde_json::to_value(&errors).unwrap();

        assert_eq!(value["title"], "Title is required");
        assert_eq!(value["description"], "Description is required");
    }
}
