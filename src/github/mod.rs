// GitHub API module.
// GraphQL client, the query service seam, and the types the LOC cache consumes.

pub mod client;
pub mod queries;
pub mod source;
pub mod types;

pub use client::GitHubClient;
pub use source::{QueryService, collect_repositories};
pub use types::*;
