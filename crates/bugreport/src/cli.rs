use clap::{ArgGroup, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bugreport",
    version,
    about = "File bug reports against your GitHub repositories"
)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'o', value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a TOML config file
    #[arg(long, env = "BUGREPORT_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Bug report server URL (overrides config file)
    #[arg(long, env = "BUGREPORT_SERVER_URL", global = true)]
    pub server_url: Option<String>,

    /// GitHub token (skips the server session check)
    #[arg(long, env = "BUGREPORT_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Log debug details to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the GitHub sign-in page of the bug report server
    Login {
        /// Print the login URL instead of opening a browser
        #[arg(long)]
        print: bool,
    },
    /// Show the signed-in user
    Whoami,
    /// List repositories you can file reports against
    #[command(visible_alias = "r")]
    Repos,
    /// Validate and submit a bug report
    #[command(visible_alias = "s")]
    #[command(group(ArgGroup::new("repository").args(["repo", "repo_index", "no_repo"])))]
    Submit {
        /// Short summary of the problem
        #[arg(long, short = 't')]
        title: String,
        /// What happened and how to reproduce it
        #[arg(long, short = 'd')]
        description: String,
        /// Screenshot to attach (JPEG, PNG, GIF or WebP, at most 5MB)
        #[arg(long, value_name = "PATH")]
        screenshot: Option<PathBuf>,
        /// Repository as owner/name (defaults to 'bugreport config repo')
        #[arg(long, short = 'r')]
        repo: Option<String>,
        /// Repository by its position in 'bugreport repos'
        #[arg(long)]
        repo_index: Option<usize>,
        /// Submit without a repository even if a default is configured
        #[arg(long)]
        no_repo: bool,
        /// Print the validated report, screenshot inlined as a data URL, and send nothing
        #[arg(long)]
        preview: bool,
    },
    /// Show the device diagnostics attached to reports
    DeviceInfo,
    /// Configuration
    #[command(visible_alias = "cfg")]
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Generate shell completions and write to stdout
    pub fn generate_completions(shell: Shell) {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "bugreport", &mut std::io::stdout());
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Show the config file paths that are searched
    Path,
    /// Set the default repository for 'submit'
    Repo {
        /// Repository as owner/name
        name: String,
    },
    /// Clear the local default repository
    Clear,
}
