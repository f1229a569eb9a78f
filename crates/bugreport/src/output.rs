use crate::cli::OutputFormat;
use bugreport_core::{DeviceInfo, RepositoryRecord, SessionUser, SubmissionAck, ValidationErrors};
use colored::Colorize;
use serde::Serialize;

pub fn output_result<T: Serialize + Displayable>(result: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            println!("{}", result.display());
        }
    }
}

/// Numbered list; the numbers are the indexes `submit --repo-index` accepts
pub fn output_repositories(repos: &[RepositoryRecord], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(repos) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            if repos.is_empty() {
                println!("No repositories found.");
                return;
            }
            for (index, repo) in repos.iter().enumerate() {
                println!("{:>3}  {}", index.to_string().dimmed(), repo.display());
            }
        }
    }
}

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
}

pub fn output_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: "error".to_string(),
                message: format!("{:#}", err),
            };
            serde_json::to_string_pretty(&json_err)
                .unwrap_or_else(|_| format!(r#"{{"error": true, "message": "{}"}}"#, err))
        }
        OutputFormat::Text => format!("{}: {:#}", "Error".red().bold(), err),
    };
    eprintln!("{}", message);
}

/// Field errors from a rejected submit, one line per field
pub fn output_validation_errors(errors: &ValidationErrors, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct JsonValidation<'a> {
                error: bool,
                code: &'static str,
                fields: &'a ValidationErrors,
            }
            let body = JsonValidation {
                error: true,
                code: "validation",
                fields: errors,
            };
            if let Ok(json) = serde_json::to_string_pretty(&body) {
                eprintln!("{}", json);
            }
        }
        OutputFormat::Text => {
            for (field, message) in errors.iter() {
                eprintln!("{} {}: {}", "✗".red(), field.as_str().bold(), message);
            }
        }
    }
}

pub trait Displayable {
    fn display(&self) -> String;
}

impl Displayable for RepositoryRecord {
    fn display(&self) -> String {
        let visibility = if self.private {
            "private".yellow().to_string()
        } else {
            "public".green().to_string()
        };
        let mut output = format!("{} [{}]", self.label().cyan().bold(), visibility);
        if self.permissions.admin {
            output.push_str(&format!(" {}", "admin".magenta()));
        }
        if let Some(desc) = self.description.as_deref().filter(|d| !d.is_empty()) {
            output.push_str(&format!("\n       {}", desc.dimmed()));
        }
        output
    }
}

impl Displayable for DeviceInfo {
    fn display(&self) -> String {
        self.summary()
    }
}

impl Displayable for SessionUser {
    fn display(&self) -> String {
        format!("Welcome, {}!", self.login.bold())
    }
}

impl Displayable for SubmissionAck {
    fn display(&self) -> String {
        let mut output = format!("{}", "Bug report submitted successfully!".green().bold());
        if let Some(id) = &self.bug_report_id {
            output.push_str(&format!("\n  {}: {}", "Report ID".dimmed(), id));
        }
        if let Some(message) = &self.message {
            output.push_str(&format!("\n  {}: {}", "Server".dimmed(), message));
        }
        output
    }
}
