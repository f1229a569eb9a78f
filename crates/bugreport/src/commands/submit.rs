use anyhow::{anyhow, bail, Context, Result};
use bugreport_core::{
    BugReportForm, DeviceInfo, DraftReport, RepositorySelector, Screenshot, SubmitError,
};
use serde::Serialize;
use std::path::Path;

use super::Services;
use crate::cli::OutputFormat;
use crate::environment::HostEnvironment;
use crate::local_config::LocalConfig;
use crate::output::{output_result, output_validation_errors, Displayable};

/// How the report's repository is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryChoice {
    None,
    Default(u64),
    Label(String),
    Index(usize),
}

impl RepositoryChoice {
    pub fn resolve(
        repo: Option<&str>,
        repo_index: Option<usize>,
        no_repo: bool,
        local: &LocalConfig,
    ) -> Self {
        if no_repo {
            return RepositoryChoice::None;
        }
        if let Some(label) = repo {
            return RepositoryChoice::Label(label.to_string());
        }
        if let Some(index) = repo_index {
            return RepositoryChoice::Index(index);
        }
        match local.default_repository_id {
            Some(id) => RepositoryChoice::Default(id),
            None => RepositoryChoice::None,
        }
    }
}

pub struct SubmitArgs<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub screenshot: Option<&'a Path>,
    pub repo: Option<&'a str>,
    pub repo_index: Option<usize>,
    pub no_repo: bool,
    pub preview: bool,
}

/// What `submit --preview` shows instead of sending
#[derive(Debug, Serialize)]
pub struct ReportPreview {
    pub title: String,
    pub description: String,
    pub device_info: DeviceInfo,
    pub screenshot: Option<ScreenshotPreview>,
}

#[derive(Debug, Serialize)]
pub struct ScreenshotPreview {
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
    pub data_url: String,
}

/// Longest data URL shown in text output
const PREVIEW_TEXT_LIMIT: usize = 72;

impl ReportPreview {
    pub fn from_draft(draft: &DraftReport) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            device_info: draft.device_info.clone(),
            screenshot: draft.screenshot.as_ref().map(|file| ScreenshotPreview {
                file_name: file.file_name.clone(),
                content_type: file.content_type.clone(),
                size: file.size(),
                data_url: file.preview_data_url(),
            }),
        }
    }
}

impl Displayable for ReportPreview {
    fn display(&self) -> String {
        let mut output = format!("Title: {}\nDescription: {}\n", self.title, self.description);
        output.push_str(&self.device_info.summary());
        match &self.screenshot {
            Some(shot) => {
                let mut url: String = shot.data_url.chars().take(PREVIEW_TEXT_LIMIT).collect();
                if url.len() < shot.data_url.len() {
                    url.push_str("...");
                }
                output.push_str(&format!(
                    "\nScreenshot: {} ({}, {} bytes)\nPreview: {}",
                    shot.file_name, shot.content_type, shot.size, url
                ));
            }
            None => output.push_str("\nScreenshot: none"),
        }
        output
    }
}

pub fn handle_submit(services: &Services, args: SubmitArgs<'_>, format: OutputFormat) -> Result<()> {
    let mut form = BugReportForm::new(Box::new(HostEnvironment::default()));
    form.set_title(args.title);
    form.set_description(args.description);

    if let Some(path) = args.screenshot {
        let file = Screenshot::from_path(path)
            .with_context(|| format!("Failed to read screenshot: {}", path.display()))?;
        if form.select_screenshot(Some(file)).is_err() {
            output_validation_errors(form.errors(), format);
            bail!("Bug report is invalid");
        }
    }

    // Nothing touches the network until the required fields are present
    let errors = form.validate();
    if !errors.is_empty() {
        output_validation_errors(&errors, format);
        bail!("Bug report is invalid");
    }

    if args.preview {
        output_result(&ReportPreview::from_draft(form.draft()), format);
        return Ok(());
    }

    let choice = RepositoryChoice::resolve(
        args.repo,
        args.repo_index,
        args.no_repo,
        &LocalConfig::load()?,
    );
    let selector = select_repository(services, &choice)?;

    match form.submit(&services.portal, selector.selected()) {
        Ok(ack) => {
            output_result(&ack, format);
            Ok(())
        }
        Err(SubmitError::Validation(errors)) => {
            output_validation_errors(&errors, format);
            bail!("Bug report is invalid")
        }
        Err(err) => Err(anyhow!(err)),
    }
}

fn select_repository(services: &Services, choice: &RepositoryChoice) -> Result<RepositorySelector> {
    match choice {
        RepositoryChoice::None => Ok(RepositorySelector::new()),
        // Implicit default: listing problems only cost the repository link
        RepositoryChoice::Default(id) => {
            let state = services.bootstrap();
            let authenticated = state.is_authenticated();
            if !authenticated {
                tracing::warn!(id, "Not signed in, submitting without the default repository");
            }
            let mut selector = RepositorySelector::with_repositories(state.repositories);
            selector.set_default_selection(Some(*id));
            if authenticated && selector.selected().is_none() {
                tracing::warn!(id, "Default repository is not in your repository list");
            }
            Ok(selector)
        }
        // Explicit choice: the listing must succeed
        RepositoryChoice::Label(label) => {
            let mut selector = services.load_selector()?;
            if selector.select_by_label(label).is_none() {
                bail!("Repository '{}' not found", label);
            }
            Ok(selector)
        }
        RepositoryChoice::Index(index) => {
            let mut selector = services.load_selector()?;
            if selector.select(Some(*index)).is_none() {
                bail!(
                    "Repository index {} is out of range ({} repositories)",
                    index,
                    selector.repositories().len()
                );
            }
            Ok(selector)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_repo_wins_over_default() {
        let mut local = LocalConfig::default();
        local.set_default_repository(7, "acme/widgets".to_string());

        assert_eq!(
            RepositoryChoice::resolve(None, None, true, &local),
            RepositoryChoice::None
        );
        assert_eq!(
            RepositoryChoice::resolve(None, None, false, &local),
            RepositoryChoice::Default(7)
        );
    }

    #[test]
    fn explicit_choice_beats_default() {
        let mut local = LocalConfig::default();
        local.set_default_repository(7, "acme/widgets".to_string());

        assert_eq!(
            RepositoryChoice::resolve(Some("acme/gears"), None, false, &local),
            RepositoryChoice::Label("acme/gears".to_string())
        );
        assert_eq!(
            RepositoryChoice::resolve(None, Some(2), false, &local),
            RepositoryChoice::Index(2)
        );
    }

    #[test]
    fn preview_inlines_screenshot_as_data_url() {
        let mut form = BugReportForm::new(Box::new(HostEnvironment::from_vars(|_| None)));
        form.set_title("Crash");
        form.set_description("On save");
        form.select_screenshot(Some(Screenshot::new("shot.png", "image/png", b"hello".to_vec())))
            .unwrap();

        let preview = ReportPreview::from_draft(form.draft());

        let shot = preview.screenshot.as_ref().unwrap();
        assert_eq!(shot.size, 5);
        assert_eq!(shot.data_url, "data:image/png;base64,aGVsbG8=");
        let text = preview.display();
        assert!(text.contains("Screenshot: shot.png (image/png, 5 bytes)"));
        assert!(text.contains("Preview: data:image/png;base64,aGVsbG8="));
    }

    #[test]
    fn preview_text_shortens_long_data_urls() {
        let mut form = BugReportForm::new(Box::new(HostEnvironment::from_vars(|_| None)));
        form.select_screenshot(Some(Screenshot::new("big.gif", "image/gif", vec![0u8; 4096])))
            .unwrap();

        let text = ReportPreview::from_draft(form.draft()).display();

        let line = text.lines().find(|l| l.starts_with("Preview: ")).unwrap();
        assert!(line.ends_with("..."));
        assert_eq!(line.len(), "Preview: ".len() + PREVIEW_TEXT_LIMIT + 3);
    }

    #[test]
    fn nothing_configured_means_no_repository() {
        assert_eq!(
            RepositoryChoice::resolve(None, None, false, &LocalConfig::default()),
            RepositoryChoice::None
        );
    }
}
