// Query metrics for a single run.
// Counts GraphQL calls per operation; passed explicitly to every querying function.

use serde::{Deserialize, Serialize};

/// Kind of query issued against the GitHub API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    UserLookup,
    RepositoryPage,
    CommitPage,
}

/// Counters collected while tallying LOC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMetrics {
    /// User id lookups.
    pub user_lookups: u64,
    /// Repository listing pages fetched.
    pub repository_pages: u64,
    /// Commit history pages fetched.
    pub commit_pages: u64,
}

impl QueryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one query of the given kind.
    pub fn record(&mut self, kind: QueryKind) {
        match kind {
            QueryKind::UserLookup => self.user_lookups += 1,
            QueryKind::RepositoryPage => self.repository_pages += 1,
            QueryKind::CommitPage => self.commit_pages += 1,
        }
    }

    /// Total number of queries issued.
    pub fn total(&self) -> u64 {
        self.user_lookups + self.repository_pages + self.commit_pages
    }
}
