use anyhow::{Context, Result};

use super::Services;
use crate::cli::OutputFormat;
use crate::output::output_repositories;

pub fn handle_repos(services: &Services, format: OutputFormat) -> Result<()> {
    let selector = services
        .load_selector()
        .context("Failed to list repositories")?;

    output_repositories(selector.repositories(), format);
    Ok(())
}
