// Scripted query service for unit tests.
// Serves fixed repository pages and per-repository commit histories, recording every request.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::error::{LocError, Result};
use crate::github::{Affiliation, Commit, Page, QueryService, RepositoryRef};

pub fn commit(author: Option<&str>, additions: u64, deletions: u64) -> Commit {
    Commit {
        author_id: author.map(str::to_string),
        additions,
        deletions,
    }
}

#[derive(Debug, Default)]
pub struct FakeService {
    user_id: String,
    repo_pages: Vec<Vec<RepositoryRef>>,
    histories: HashMap<String, Vec<Vec<Commit>>>,
    open_ended: bool,
    failures: HashSet<(String, usize)>,
    repo_page_failure: Option<usize>,
    commit_calls: Vec<(String, Option<String>)>,
}

impl FakeService {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            ..Self::default()
        }
    }

    pub fn with_repo_pages(mut self, pages: Vec<Vec<RepositoryRef>>) -> Self {
        self.repo_pages = pages;
        self
    }

    pub fn with_history(mut self, repo: &str, pages: Vec<Vec<Commit>>) -> Self {
        self.histories.insert(repo.to_string(), pages);
        self
    }

    /// Every history page claims a successor.
    pub fn with_open_ended_pages(mut self) -> Self {
        self.open_ended = true;
        self
    }

    /// Fail with a rate limit when `repo`'s page `index` is requested.
    pub fn fail_commits_at(mut self, repo: &str, index: usize) -> Self {
        self.failures.insert((repo.to_string(), index));
        self
    }

    /// Fail with a rate limit when repository page `index` is requested.
    pub fn fail_repositories_at(mut self, index: usize) -> Self {
        self.repo_page_failure = Some(index);
        self
    }

    /// Cursors requested for `repo`, in order.
    pub fn commit_cursors(&self, repo: &str) -> Vec<Option<String>> {
        self.commit_calls
            .iter()
            .filter(|(name, _)| name == repo)
            .map(|(_, cursor)| cursor.clone())
            .collect()
    }

    /// Repositories whose history walk was started, in order.
    pub fn walked_repos(&self) -> Vec<String> {
        self.commit_calls
            .iter()
            .filter(|(_, cursor)| cursor.is_none())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

fn page_index(cursor: Option<&str>) -> usize {
    cursor.and_then(|c| c.parse().ok()).unwrap_or(0)
}

#[async_trait]
impl QueryService for FakeService {
    async fn user_id(&mut self, _login: &str) -> Result<String> {
        Ok(self.user_id.clone())
    }

    async fn list_repositories(
        &mut self,
        _login: &str,
        _affiliations: &[Affiliation],
        cursor: Option<&str>,
    ) -> Result<Page<RepositoryRef>> {
        let index = page_index(cursor);
        if self.repo_page_failure == Some(index) {
            return Err(LocError::RateLimited {
                reset_at: "unknown".to_string(),
            });
        }
        let items = self.repo_pages.get(index).cloned().unwrap_or_default();
        let has_next_page = index + 1 < self.repo_pages.len();
        Ok(Page {
            items,
            has_next_page,
            end_cursor: Some((index + 1).to_string()),
        })
    }

    async fn list_commits(
        &mut self,
        owner: &str,
        name: &str,
        cursor: Option<&str>,
    ) -> Result<Option<Page<Commit>>> {
        let repo = format!("{}/{}", owner, name);
        self.commit_calls
            .push((repo.clone(), cursor.map(str::to_string)));

        let index = page_index(cursor);
        if self.failures.contains(&(repo.clone(), index)) {
            return Err(LocError::RateLimited {
                reset_at: "unknown".to_string(),
            });
        }

        let Some(pages) = self.histories.get(&repo) else {
            return Ok(None);
        };
        let items = pages.get(index).cloned().unwrap_or_default();
        let has_next_page = self.open_ended || index + 1 < pages.len();
        Ok(Some(Page {
            items,
            has_next_page,
            end_cursor: Some((index + 1).to_string()),
        }))
    }
}
