use std::time::Duration;

use bugreport_core::{Credential, FetchError, RepoFetcher, RepositoryRecord};

use crate::transport::{UreqTransport, DEFAULT_TIMEOUT};

/// GitHub REST API client for the authenticated user's repositories
///
/// The credential is passed per call; it may come from configuration or from
/// the backend session, which is only known after start-up.
pub struct GitHubClient {
    fetcher: RepoFetcher<UreqTransport>,
}

impl GitHubClient {
    /// Create a new GitHub client with a custom base URL (for GitHub Enterprise or testing)
    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_options(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_options(base_url: &str, timeout: Duration) -> Self {
        Self {
            fetcher: RepoFetcher::with_api_url(UreqTransport::new(timeout), base_url),
        }
    }

    /// Limit how many pages `list_repos` will follow
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.fetcher = self.fetcher.max_pages(max_pages);
        self
    }

    /// The underlying page fetcher, for the selector and the start-up sequence
    pub fn fetcher(&self) -> &RepoFetcher<UreqTransport> {
        &self.fetcher
    }

    /// List every repository visible to `credential`, across all pages
    pub fn list_repos(&self, credential: &Credential) -> Result<Vec<RepositoryRecord>, FetchError> {
        self.fetcher.fetch_all(credential)
    }
}
