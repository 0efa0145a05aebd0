// Query service abstraction.
// The paginated operations the LOC cache consumes, plus repository-list pagination.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::metrics::{QueryKind, QueryMetrics};

use super::types::{Affiliation, Commit, Page, RepositoryRef};

/// Paginated source of repositories and commit history.
#[async_trait]
pub trait QueryService: Send {
    /// Resolve a login to the node id used as commit author identity.
    async fn user_id(&mut self, login: &str) -> Result<String>;

    /// Fetch one page of repositories the user is affiliated with.
    async fn list_repositories(
        &mut self,
        login: &str,
        affiliations: &[Affiliation],
        cursor: Option<&str>,
    ) -> Result<Page<RepositoryRef>>;

    /// Fetch one page of default-branch history.
    ///
    /// Returns `Ok(None)` when the repository has no default branch.
    async fn list_commits(
        &mut self,
        owner: &str,
        name: &str,
        cursor: Option<&str>,
    ) -> Result<Option<Page<Commit>>>;
}

/// Fetch every repository page in listing order.
pub async fn collect_repositories<S: QueryService + ?Sized>(
    service: &mut S,
    login: &str,
    affiliations: &[Affiliation],
    metrics: &mut QueryMetrics,
) -> Result<Vec<RepositoryRef>> {
    let mut repos = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = service
            .list_repositories(login, affiliations, cursor.as_deref())
            .await;
        metrics.record(QueryKind::RepositoryPage);
        let page = page?;

        let next = page.next_cursor().map(str::to_string);
        repos.extend(page.items);

        match next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    debug!(login, count = repos.len(), "collected repositories");
    Ok(repos)
}
