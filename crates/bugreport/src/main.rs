mod cli;
mod color;
mod commands;
mod config;
mod environment;
mod local_config;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ConfigCommands, OutputFormat};
use commands::submit::SubmitArgs;
use commands::Services;
use config::Config;
use local_config::LocalConfig;
use output::output_error;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    color::init(cli.color);
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        output_error(&e, cli.format);
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Logs go to stderr; BUGREPORT_LOG takes an EnvFilter directive
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("BUGREPORT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    // Commands that need neither configuration nor network
    match &cli.command {
        Commands::Completions { shell } => {
            Cli::generate_completions(*shell);
            return Ok(());
        }
        Commands::DeviceInfo => return commands::device::handle_device_info(cli.format),
        Commands::Config { action } => match action {
            ConfigCommands::Path | ConfigCommands::Clear => {
                return handle_config_local(cli, action);
            }
            ConfigCommands::Show | ConfigCommands::Repo { .. } => {}
        },
        _ => {}
    }

    let mut config = Config::load(cli.config.clone())?;
    config.merge_with_cli(cli.server_url.clone(), cli.token.clone());
    config.validate()?;

    if let Commands::Config {
        action: ConfigCommands::Show,
    } = &cli.command
    {
        return handle_config_show(&config, cli.format);
    }

    let services = Services::new(config);

    match &cli.command {
        Commands::Login { print } => {
            commands::session::handle_login(&services.portal, *print, cli.format)
        }
        Commands::Whoami => commands::session::handle_whoami(&services.portal, cli.format),
        Commands::Repos => commands::repos::handle_repos(&services, cli.format),
        Commands::Submit {
            title,
            description,
            screenshot,
            repo,
            repo_index,
            no_repo,
            preview,
        } => commands::submit::handle_submit(
            &services,
            SubmitArgs {
                title,
                description,
                screenshot: screenshot.as_deref(),
                repo: repo.as_deref(),
                repo_index: *repo_index,
                no_repo: *no_repo,
                preview: *preview,
            },
            cli.format,
        ),
        Commands::Config {
            action: ConfigCommands::Repo { name },
        } => handle_config_repo(&services, name, cli.format),
        Commands::Config { .. } | Commands::Completions { .. } | Commands::DeviceInfo => {
            unreachable!("Handled before configuration is loaded")
        }
    }
}

/// Handle config commands that only touch local files
fn handle_config_local(cli: &Cli, action: &ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Path => {
            let local = LocalConfig::config_path()?;
            match cli.format {
                OutputFormat::Json => {
                    let files: Vec<String> = config::config_paths(cli.config.as_deref())
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect();
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({
                            "config_files": files,
                            "local_config": local.display().to_string(),
                        }))?
                    );
                }
                OutputFormat::Text => {
                    println!("Config files (in load order):");
                    for path in config::config_paths(cli.config.as_deref()) {
                        let marker = if path.exists() { "*" } else { " " };
                        println!("  {} {}", marker, path.display());
                    }
                    println!("Local config: {}", local.display());
                }
            }
            Ok(())
        }
        ConfigCommands::Clear => {
            LocalConfig::delete()?;
            match cli.format {
                OutputFormat::Json => {
                    println!(r#"{{"success": true, "message": "Local configuration cleared"}}"#);
                }
                OutputFormat::Text => {
                    println!("Local configuration cleared.");
                }
            }
            Ok(())
        }
        ConfigCommands::Show | ConfigCommands::Repo { .. } => {
            unreachable!("Needs the loaded configuration")
        }
    }
}

fn handle_config_show(config: &Config, format: OutputFormat) -> Result<()> {
    let local = LocalConfig::load()?;
    let shown = config.redacted();

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "config": shown,
                    "local": local,
                }))?
            );
        }
        OutputFormat::Text => {
            print!("{}", toml::to_string_pretty(&shown)?);
            if local.is_empty() {
                println!("\nNo default repository set.");
            } else {
                println!(
                    "\nDefault repository: {}",
                    local.default_repository_name.as_deref().unwrap_or("(unnamed)")
                );
            }
        }
    }
    Ok(())
}

fn handle_config_repo(services: &Services, name: &str, format: OutputFormat) -> Result<()> {
    let mut selector = services
        .load_selector()
        .context("Failed to list repositories")?;
    let repo = selector
        .select_by_label(name)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Repository '{}' not found", name))?;

    let mut local = LocalConfig::load()?;
    local.set_default_repository(repo.id, repo.label());
    local.save()?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "success": true,
                    "default_repository_id": repo.id,
                    "default_repository_name": repo.label(),
                }))?
            );
        }
        OutputFormat::Text => {
            println!("Default repository set to: {} ({})", repo.label(), repo.id);
        }
    }
    Ok(())
}
