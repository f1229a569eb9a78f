pub mod client;
pub mod transport;


pub use client::GitHubClient;
pub use transport::UreqTransport;

// Re-export core types for convenience
pub use bugreport_core::{Credential, FetchError, RepoFetcher, RepositoryRecord};
