use anyhow::{anyhow, Result};
use bugreport_core::{DEFAULT_API_URL, DEFAULT_MAX_PAGES};
use directories::{BaseDirs, ProjectDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Effective configuration: defaults, then config files, then env, then CLI flags
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Bug report server (serves /api/user, /api/bug-report, /login/github)
    pub server_url: String,
    /// GitHub REST API root
    pub github_api_url: String,
    /// GitHub token; when set the server session check is skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Cookie sent with the session check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,
    /// Maximum repository pages to follow
    pub max_pages: usize,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            github_api_url: DEFAULT_API_URL.to_string(),
            token: None,
            session_cookie: None,
            max_pages: DEFAULT_MAX_PAGES,
            timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let explicit_path = config_path.as_deref();
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        for path in config_paths(explicit_path) {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        // BUGREPORT_CONFIG names the file itself and is not a key
        figment = figment.merge(Env::prefixed("BUGREPORT_").ignore(&["config", "log"]));

        figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    pub fn merge_with_cli(&mut self, cli_server_url: Option<String>, cli_token: Option<String>) {
        if let Some(url) = cli_server_url {
            self.server_url = url;
        }
        if let Some(token) = cli_token {
            self.token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server_url.trim().is_empty() {
            return Err(anyhow!(
                "Server URL not configured. Set via --server-url, BUGREPORT_SERVER_URL env var, or config file"
            ));
        }
        if self.max_pages == 0 {
            return Err(anyhow!("max_pages must be at least 1"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Copy safe to print: secrets are masked
    pub fn redacted(&self) -> Self {
        Self {
            server_url: self.server_url.clone(),
            github_api_url: self.github_api_url.clone(),
            token: self.token.as_ref().map(|_| "********".to_string()),
            session_cookie: self.session_cookie.as_ref().map(|_| "********".to_string()),
            max_pages: self.max_pages,
            timeout_secs: self.timeout_secs,
        }
    }
}

pub fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_xdg_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_local_config_path() {
        push_unique(&mut paths, path);
    }

    paths
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bugreport").map(|d| d.config_dir().join("config.toml"))
}

fn get_xdg_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join("bugreport").join("config.toml"));
    }

    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("bugreport")
            .join("config.toml")
    })
}

fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn explicit_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                server_url = "https://bugs.example.com"
                max_pages = 5
                "#,
            )?;

            let config = Config::load(Some(PathBuf::from("custom.toml"))).unwrap();

            assert_eq!(config.server_url, "https://bugs.example.com");
            assert_eq!(config.max_pages, 5);
            assert_eq!(config.github_api_url, DEFAULT_API_URL);
            assert!(config.token.is_none());
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", r#"server_url = "https://from-file""#)?;
            jail.set_env("BUGREPORT_SERVER_URL", "https://from-env");
            jail.set_env("BUGREPORT_TIMEOUT_SECS", "5");

            let config = Config::load(Some(PathBuf::from("custom.toml"))).unwrap();

            assert_eq!(config.server_url, "https://from-env");
            assert_eq!(config.timeout(), Duration::from_secs(5));
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Config::load(Some(PathBuf::from("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn cli_values_win() {
        let mut config = Config::default();
        config.merge_with_cli(Some("http://cli".to_string()), Some("tok".to_string()));

        assert_eq!(config.server_url, "http://cli");
        assert_eq!(config.token.as_deref(), Some("tok"));
    }

    #[test]
    fn redacted_masks_secrets() {
        let mut config = Config::default();
        config.token = Some("ghp_secret".to_string());

        let shown = config.redacted();

        assert_eq!(shown.token.as_deref(), Some("********"));
        assert!(shown.session_cookie.is_none());
    }

    #[test]
    fn zero_pages_is_invalid() {
        let config = Config {
            max_pages: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
