use anyhow::{anyhow, Context, Result};
use bugreport_core::SessionSource;
use portal_backend::PortalClient;

use crate::cli::OutputFormat;
use crate::output::output_result;

pub fn handle_login(portal: &PortalClient, print_only: bool, format: OutputFormat) -> Result<()> {
    let url = portal.login_url();

    if !print_only {
        open::that(&url).with_context(|| format!("Failed to open browser for {}", url))?;
    }

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "url": url,
                    "opened": !print_only
                }))?
            );
        }
        OutputFormat::Text if print_only => println!("{}", url),
        OutputFormat::Text => {
            println!("Opened {} in your browser.", url);
            println!("Finish signing in with GitHub, then run 'bugreport whoami'.");
        }
    }
    Ok(())
}

pub fn handle_whoami(portal: &PortalClient, format: OutputFormat) -> Result<()> {
    let session = portal
        .current_session()
        .map_err(|e| anyhow!("Not signed in ({}). Run 'bugreport login' first", e))?;

    output_result(&session.user, format);
    Ok(())
}
