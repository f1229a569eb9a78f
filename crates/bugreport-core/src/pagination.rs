use crate::error::FetchError;
use crate::models::{Credential, RepositoryRecord};
use crate::traits::PageTransport;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_MAX_PAGES: usize = 50;

/// One entry of a `Link` header: `<url>; rel="next"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRelation {
    pub url: String,
    pub rels: Vec<String>,
}

/// Parse a `Link` header into its relations.
///
/// Parsing stops at the first malformed entry; whatever was parsed before it is kept.
pub fn parse_link_header(value: &str) -> Vec<LinkRelation> {
    let mut links = Vec::new();
    let mut rest = value;

    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        if rest.is_empty() {
            break;
        }

        let Some(after_open) = rest.strip_prefix('<') else {
            break;
        };
        let Some(close) = after_open.find('>') else {
            break;
        };
        let url = after_open[..close].trim();
        let tail = &after_open[close + 1..];

        // Parameters run until the next entry begins
        let params_end = tail.find('<').unwrap_or(tail.len());
        let params = &tail[..params_end];
        rest = &tail[params_end..];

        let mut rels = Vec::new();
        for param in params.split([';', ',']) {
            let Some((key, val)) = param.split_once('=') else {
                continue;
            };
            if key.trim().eq_ignore_ascii_case("rel") {
                rels.extend(
                    val.trim()
                        .trim_matches('"')
                        .split_whitespace()
                        .map(|r| r.to_ascii_lowercase()),
                );
            }
        }

        if !url.is_empty() {
            links.push(LinkRelation {
                url: url.to_string(),
                rels,
            });
        }
    }

    links
}

/// URL of the `next` relation, if the header carries one
pub fn next_link(value: &str) -> Option<String> {
    parse_link_header(value)
        .into_iter()
        .find(|link| link.rels.iter().any(|r| r == "next"))
        .map(|link| link.url)
}

/// Retrieves the full repository list by following `Link: rel="next"` cursors
pub struct RepoFetcher<T> {
    transport: T,
    api_url: String,
    max_pages: usize,
}

impl<T: PageTransport> RepoFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self::with_api_url(transport, DEFAULT_API_URL)
    }

    /// Target a different API root (GitHub Enterprise or a test server)
    pub fn with_api_url(transport: T, api_url: &str) -> Self {
        Self {
            transport,
            api_url: api_url.trim_end_matches('/').to_string(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Cap on the number of pages followed before giving up
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn first_page_url(&self) -> String {
        format!("{}/user/repos?per_page=100&visibility=all", self.api_url)
    }

    /// Fetch every page. Any failure discards the pages already read.
    pub fn fetch_all(&self, credential: &Credential) -> Result<Vec<RepositoryRecord>, FetchError> {
        let authorization = credential.authorization();
        let mut repos = Vec::new();
        let mut cursor = Some(self.first_page_url());
        let mut pages = 0;

        while let Some(url) = cursor.take() {
            if pages == self.max_pages {
                tracing::warn!(limit = self.max_pages, "Repository listing exceeded page limit");
                return Err(FetchError::TooManyPages {
                    limit: self.max_pages,
                });
            }
            pages += 1;

            let response = self.transport.get(&url, &authorization)?;

            if !response.is_success() {
                tracing::debug!(status = response.status, url = %url, "Repository page request failed");
                return Err(FetchError::from_status(response.status, response.body));
            }

            let page: Vec<RepositoryRecord> = serde_json::from_str(&response.body)
                .map_err(|e| FetchError::transport(format!("Invalid repository page: {}", e)))?;
            tracing::debug!(page = pages, count = page.len(), url = %url, "Fetched repository page");
            repos.extend(page);

            cursor = response.header("link").and_then(next_link);
        }

        Ok(repos)
    }
}
