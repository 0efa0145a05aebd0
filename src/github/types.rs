// GitHub domain types.
// Repository references, commits, and pages as seen by the LOC cache.

use serde::{Deserialize, Serialize};

/// Relationship between a user and a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Affiliation {
    Owner,
    Collaborator,
    OrganizationMember,
}

impl Affiliation {
    /// Every affiliation, in the order GitHub documents them.
    pub const ALL: [Affiliation; 3] = [
        Affiliation::Owner,
        Affiliation::Collaborator,
        Affiliation::OrganizationMember,
    ];
}

/// A repository as reported by the current listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// `owner/name`.
    pub qualified_name: String,
    /// Commits on the default branch; zero when there is no default branch.
    pub live_commit_count: u64,
}

impl RepositoryRef {
    pub fn new(qualified_name: impl Into<String>, live_commit_count: u64) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            live_commit_count,
        }
    }

    /// Split `owner/name` into its parts.
    pub fn owner_and_name(&self) -> Option<(&str, &str)> {
        self.qualified_name
            .split_once('/')
            .filter(|(owner, name)| !owner.is_empty() && !name.is_empty())
    }
}

/// A single commit from a default-branch history page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// GraphQL node id of the linked GitHub user, if the author maps to one.
    pub author_id: Option<String>,
    pub additions: u64,
    pub deletions: u64,
}

/// One page of a cursor-paginated connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

impl<T> Page<T> {
    /// A page with no successor.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            has_next_page: false,
            end_cursor: None,
        }
    }

    /// Cursor for the next page, if there is one to fetch.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_next_page {
            self.end_cursor.as_deref()
        } else {
            None
        }
    }
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}
