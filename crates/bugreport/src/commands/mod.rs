pub mod device;
pub mod repos;
pub mod session;
pub mod submit;

use anyhow::{anyhow, Result};
use bugreport_core::{Credential, RepositorySelector, SessionBootstrap, SessionSource, SessionState};
use github_backend::GitHubClient;
use portal_backend::PortalClient;

use crate::config::Config;

/// Clients built from the effective configuration
pub struct Services {
    pub config: Config,
    pub portal: PortalClient,
    pub github: GitHubClient,
}

impl Services {
    pub fn new(config: Config) -> Self {
        let portal = PortalClient::with_timeout(&config.server_url, config.timeout())
            .with_session_cookie(config.session_cookie.clone());
        let github = GitHubClient::with_options(&config.github_api_url, config.timeout())
            .max_pages(config.max_pages);

        Self {
            config,
            portal,
            github,
        }
    }

    /// Credential from configuration, else from the server session
    pub fn credential(&self) -> Result<Credential> {
        if let Some(token) = &self.config.token {
            return Ok(Credential::new(token.as_str()));
        }

        self.portal
            .current_session()
            .map(|session| session.access_token)
            .map_err(|e| anyhow!("Not signed in ({}). Run 'bugreport login' first", e))
    }

    /// Repository picker with the full list loaded; fetch failures are reported
    pub fn load_selector(&self) -> Result<RepositorySelector> {
        let credential = self.credential()?;
        let mut selector = RepositorySelector::new();
        if let Err(err) = selector.load(self.github.fetcher(), &credential) {
            tracing::debug!(error = ?err, "Repository listing failed");
            return Err(anyhow!(err));
        }
        Ok(selector)
    }

    /// Start-up sequence used before submitting: failures degrade silently
    pub fn bootstrap(&self) -> SessionState {
        if let Some(token) = &self.config.token {
            let credential = Credential::new(token.as_str());
            let repositories = self.github.list_repos(&credential).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Repository fetch failed");
                Vec::new()
            });
            return SessionState {
                user: None,
                credential: Some(credential),
                repositories,
            };
        }

        SessionBootstrap::new(&self.portal, self.github.fetcher()).run()
    }
}
