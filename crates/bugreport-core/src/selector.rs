use crate::error::{FetchError, FetchErrorKind};
use crate::models::{Credential, RepositoryRecord};
use crate::pagination::RepoFetcher;
use crate::traits::PageTransport;

pub const PLACEHOLDER_LABEL: &str = "Select a repository";

/// Lifecycle of the repository list behind the picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorState {
    Idle,
    Loading,
    Ready(Vec<RepositoryRecord>),
    Failed(FetchErrorKind),
}

type SelectListener = Box<dyn FnMut(&RepositoryRecord)>;

/// Single-choice repository picker
///
/// Either fed a pre-fetched list, or given a credential and a fetcher to load
/// one itself. The listener only hears about genuine records; picking the
/// placeholder clears the selection silently.
pub struct RepositorySelector {
    state: SelectorState,
    selected: Option<RepositoryRecord>,
    default_id: Option<u64>,
    listener: Option<SelectListener>,
    /// List was handed in by the caller rather than fetched here
    prefetched: bool,
}

impl Default for RepositorySelector {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositorySelector {
    pub fn new() -> Self {
        Self {
            state: SelectorState::Idle,
            selected: None,
            default_id: None,
            listener: None,
            prefetched: false,
        }
    }

    /// Picker over an already fetched list; never fetches
    pub fn with_repositories(repositories: Vec<RepositoryRecord>) -> Self {
        let mut selector = Self::new();
        selector.set_repositories(repositories);
        selector.prefetched = true;
        selector
    }

    pub fn on_select(&mut self, listener: impl FnMut(&RepositoryRecord) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    /// Fetch the list for `credential`, moving through Loading to Ready or Failed.
    ///
    /// Every call fetches again and replaces the list, so a new credential
    /// gets its own repositories. A pre-fetched list is left untouched.
    pub fn load<T: PageTransport>(
        &mut self,
        fetcher: &RepoFetcher<T>,
        credential: &Credential,
    ) -> Result<(), FetchError> {
        if self.prefetched {
            return Ok(());
        }

        self.state = SelectorState::Loading;
        match fetcher.fetch_all(credential) {
            Ok(repositories) => {
                self.set_repositories(repositories);
                Ok(())
            }
            Err(err) => {
                self.state = SelectorState::Failed(err.kind());
                Err(err)
            }
        }
    }

    /// Replace the list wholesale
    pub fn set_repositories(&mut self, repositories: Vec<RepositoryRecord>) {
        self.state = SelectorState::Ready(repositories);
        if self.default_id.is_some() {
            self.resolve_default();
        }
    }

    /// Externally supplied selection, tracked by id across list changes
    pub fn set_default_selection(&mut self, id: Option<u64>) {
        self.default_id = id;
        self.resolve_default();
    }

    fn resolve_default(&mut self) {
        self.selected = self
            .default_id
            .and_then(|id| self.repositories().iter().find(|r| r.id == id).cloned());
    }

    pub fn repositories(&self) -> &[RepositoryRecord] {
        match &self.state {
            SelectorState::Ready(repositories) => repositories,
            _ => &[],
        }
    }

    /// The picker accepts input only once a list is ready
    pub fn is_enabled(&self) -> bool {
        !matches!(self.state, SelectorState::Loading | SelectorState::Failed(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SelectorState::Loading)
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match &self.state {
            SelectorState::Failed(kind) => Some(kind.message()),
            _ => None,
        }
    }

    /// Placeholder followed by one `owner/name` label per repository
    pub fn options(&self) -> Vec<String> {
        std::iter::once(PLACEHOLDER_LABEL.to_string())
            .chain(self.repositories().iter().map(RepositoryRecord::label))
            .collect()
    }

    /// Choose by zero-based index; `None` or an out-of-range index clears the selection
    pub fn select(&mut self, index: Option<usize>) -> Option<&RepositoryRecord> {
        if !self.is_enabled() {
            return self.selected.as_ref();
        }

        let chosen = index.and_then(|i| self.repositories().get(i).cloned());
        match chosen {
            Some(repo) => {
                if let Some(listener) = self.listener.as_mut() {
                    listener(&repo);
                }
                self.selected = Some(repo);
            }
            None => self.selected = None,
        }
        self.selected.as_ref()
    }

    /// Choose by `owner/name` label (case-insensitive)
    pub fn select_by_label(&mut self, label: &str) -> Option<&RepositoryRecord> {
        let index = self
            .repositories()
            .iter()
            .position(|r| r.label().eq_ignore_ascii_case(label))?;
        self.select(Some(index))
    }

    pub fn selected(&self) -> Option<&RepositoryRecord> {
        self.selected.as_ref()
    }

    /// Position of the selection in the current list
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        self.repositories().iter().position(|r| r.id == selected.id)
    }
}
