// Cache record codec.
// One line per repository: `repoHash cachedCommitCount authorCommitCount additions deletions`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LocError, Result};

/// Digest identifying a repository by its `owner/name`.
pub fn repo_hash(qualified_name: &str) -> String {
    super::sha256_hex(qualified_name)
}

/// Cached LOC totals for a single repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// SHA-256 hex of the repository's `owner/name`.
    pub repo_hash: String,
    /// Default-branch commit count when the totals were computed.
    pub cached_commit_count: u64,
    /// Commits authored by the target user.
    pub author_commit_count: u64,
    pub additions: u64,
    pub deletions: u64,
}

impl CacheRecord {
    /// A record with every numeric field at zero.
    pub fn zeroed(repo_hash: impl Into<String>) -> Self {
        Self {
            repo_hash: repo_hash.into(),
            cached_commit_count: 0,
            author_commit_count: 0,
            additions: 0,
            deletions: 0,
        }
    }

    /// Parse a record line, falling back to a zeroed record.
    ///
    /// The first token is kept as the hash so a damaged line still lines up
    /// with its repository and gets recomputed.
    pub fn parse_lenient(line: &str) -> Self {
        line.parse().unwrap_or_else(|_| {
            Self::zeroed(line.split_whitespace().next().unwrap_or_default())
        })
    }

    /// Whether the cached totals still describe `live_commit_count` commits.
    pub fn is_current(&self, live_commit_count: u64) -> bool {
        self.cached_commit_count == live_commit_count
    }
}

impl FromStr for CacheRecord {
    type Err = LocError;

    fn from_str(line: &str) -> Result<Self> {
        let malformed = || LocError::MalformedRecord {
            line: line.to_string(),
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [hash, counts @ ..] = fields.as_slice() else {
            return Err(malformed());
        };
        if counts.len() != 4 {
            return Err(malformed());
        }

        let mut numbers = [0u64; 4];
        for (slot, field) in numbers.iter_mut().zip(counts) {
            *slot = field.parse().map_err(|_| malformed())?;
        }
        let [cached_commit_count, author_commit_count, additions, deletions] = numbers;

        Ok(Self {
            repo_hash: hash.to_string(),
            cached_commit_count,
            author_commit_count,
            additions,
            deletions,
        })
    }
}

impl fmt::Display for CacheRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.repo_hash,
            self.cached_commit_count,
            self.author_commit_count,
            self.additions,
            self.deletions
        )
    }
}
