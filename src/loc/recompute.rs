// Repository LOC recomputation.
// Walks a repository's default-branch history page by page and tallies one author's commits.

use std::ops::AddAssign;

use tracing::debug;

use crate::error::Result;
use crate::github::{Commit, QueryService};
use crate::metrics::{QueryKind, QueryMetrics};

/// Running totals for one author within one repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocTally {
    pub author_commits: u64,
    pub additions: u64,
    pub deletions: u64,
}

impl LocTally {
    /// Count `commit` if it belongs to `author_id`.
    fn add_if_authored(&mut self, commit: &Commit, author_id: &str) {
        if commit.author_id.as_deref() == Some(author_id) {
            *self += LocTally {
                author_commits: 1,
                additions: commit.additions,
                deletions: commit.deletions,
            };
        }
    }
}

impl AddAssign for LocTally {
    fn add_assign(&mut self, rhs: Self) {
        self.author_commits = self.author_commits.saturating_add(rhs.author_commits);
        self.additions = self.additions.saturating_add(rhs.additions);
        self.deletions = self.deletions.saturating_add(rhs.deletions);
    }
}

/// Outcome of recomputing a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recomputed {
    /// Full history walked.
    Tallied(LocTally),
    /// The repository has no default branch.
    MissingHistory,
}

impl Recomputed {
    /// Totals to store; a repository without history counts as zero.
    pub fn tally(&self) -> LocTally {
        match self {
            Recomputed::Tallied(tally) => *tally,
            Recomputed::MissingHistory => LocTally::default(),
        }
    }
}

/// Walk every history page of `owner/name` and tally commits by `author_id`.
///
/// Stops when a page reports no successor or comes back empty. A fetch error
/// aborts the walk and is returned as is; nothing is retried.
pub async fn recompute<S: QueryService + ?Sized>(
    service: &mut S,
    owner: &str,
    name: &str,
    author_id: &str,
    metrics: &mut QueryMetrics,
) -> Result<Recomputed> {
    let mut tally = LocTally::default();
    let mut cursor: Option<String> = None;
    let mut pages = 0u64;

    loop {
        let page = service.list_commits(owner, name, cursor.as_deref()).await;
        metrics.record(QueryKind::CommitPage);
        pages += 1;
        let page = page?;

        let Some(page) = page else {
            debug!(owner, name, "repository has no default branch");
            return Ok(Recomputed::MissingHistory);
        };

        for commit in &page.items {
            tally.add_if_authored(commit, author_id);
        }

        match page.next_cursor() {
            Some(next) if !page.items.is_empty() => cursor = Some(next.to_string()),
            _ => break,
        }
    }

    debug!(
        owner,
        name,
        pages,
        commits = tally.author_commits,
        additions = tally.additions,
        deletions = tally.deletions,
        "recomputed repository"
    );
    Ok(Recomputed::Tallied(tally))
}
