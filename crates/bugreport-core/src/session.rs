use crate::models::{Credential, RepositoryRecord};
use crate::pagination::RepoFetcher;
use crate::traits::{PageTransport, SessionSource, SessionUser};

/// What the app knows after start-up
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<SessionUser>,
    pub credential: Option<Credential>,
    pub repositories: Vec<RepositoryRecord>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }
}

/// Start-up sequence: session check, then the first repository fetch.
///
/// Neither step surfaces errors; failures degrade to an anonymous session or
/// an empty repository list.
pub struct SessionBootstrap<'a, S: ?Sized, T> {
    source: &'a S,
    fetcher: &'a RepoFetcher<T>,
}

impl<'a, S: SessionSource + ?Sized, T: PageTransport> SessionBootstrap<'a, S, T> {
    pub fn new(source: &'a S, fetcher: &'a RepoFetcher<T>) -> Self {
        Self { source, fetcher }
    }

    pub fn run(&self) -> SessionState {
        let session = match self.source.current_session() {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(error = %err, "Session check failed, continuing unauthenticated");
                return SessionState::default();
            }
        };

        tracing::debug!(login = %session.user.login, "Authenticated session found");
        let repositories = match self.fetcher.fetch_all(&session.access_token) {
            Ok(repositories) => repositories,
            Err(err) => {
                tracing::warn!(error = %err, "Repository fetch failed during start-up");
                Vec::new()
            }
        };

        SessionState {
            user: Some(session.user),
            credential: Some(session.access_token),
            repositories,
        }
    }
}
