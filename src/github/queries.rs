// GitHub GraphQL query operations.
// Typed wrappers around the user, repository-list, and commit-history queries.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::{LocError, Result};

use super::client::GitHubClient;
use super::source::QueryService;
use super::types::{Affiliation, Commit, Page, RepositoryRef};

/// Repositories fetched per listing page.
pub const REPOSITORY_PAGE_SIZE: u32 = 60;
/// Commits fetched per history page.
pub const COMMIT_PAGE_SIZE: u32 = 100;

const USER_ID_QUERY: &str = r#"
query ($login: String!) {
    user(login: $login) {
        id
    }
}"#;

const REPOSITORIES_QUERY: &str = r#"
query ($owner_affiliation: [RepositoryAffiliation], $login: String!, $cursor: String, $first: Int!) {
    user(login: $login) {
        repositories(first: $first, after: $cursor, ownerAffiliations: $owner_affiliation) {
            edges {
                node {
                    ... on Repository {
                        nameWithOwner
                        defaultBranchRef {
                            target {
                                ... on Commit {
                                    history {
                                        totalCount
                                    }
                                }
                            }
                        }
                    }
                }
            }
            pageInfo {
                endCursor
                hasNextPage
            }
        }
    }
}"#;

const COMMITS_QUERY: &str = r#"
query ($repo_name: String!, $owner: String!, $cursor: String, $first: Int!) {
    repository(name: $repo_name, owner: $owner) {
        defaultBranchRef {
            target {
                ... on Commit {
                    history(first: $first, after: $cursor) {
                        edges {
                            node {
                                ... on Commit {
                                    author {
                                        user {
                                            id
                                        }
                                    }
                                    additions
                                    deletions
                                }
                            }
                        }
                        pageInfo {
                            endCursor
                            hasNextPage
                        }
                    }
                }
            }
        }
    }
}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    end_cursor: Option<String>,
    #[serde(default)]
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
struct UserNode {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UserIdData {
    user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
struct RepositoriesData {
    user: Option<UserRepositories>,
}

#[derive(Debug, Deserialize)]
struct UserRepositories {
    repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryConnection {
    #[serde(default)]
    edges: Vec<Option<RepositoryEdge>>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct RepositoryEdge {
    node: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    name_with_owner: Option<String>,
    default_branch_ref: Option<BranchRef<HistoryCount>>,
}

#[derive(Debug, Deserialize)]
struct BranchRef<T> {
    target: Option<T>,
}

#[derive(Debug, Deserialize)]
struct HistoryCount {
    history: Option<TotalCount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCount {
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct CommitsData {
    repository: Option<RepositoryHistory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryHistory {
    default_branch_ref: Option<BranchRef<CommitTarget>>,
}

#[derive(Debug, Deserialize)]
struct CommitTarget {
    history: Option<CommitConnection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitConnection {
    #[serde(default)]
    edges: Vec<Option<CommitEdge>>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct CommitEdge {
    node: Option<CommitNode>,
}

#[derive(Debug, Deserialize)]
struct CommitNode {
    author: Option<GitActor>,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
}

#[derive(Debug, Deserialize)]
struct GitActor {
    user: Option<UserNode>,
}

impl RepositoryConnection {
    fn into_page(self) -> Page<RepositoryRef> {
        let items = self
            .edges
            .into_iter()
            .flatten()
            .filter_map(|edge| edge.node)
            .filter_map(|node| {
                let live_commit_count = node
                    .default_branch_ref
                    .and_then(|b| b.target)
                    .and_then(|t| t.history)
                    .map(|h| h.total_count)
                    .unwrap_or(0);
                node.name_with_owner
                    .map(|name| RepositoryRef::new(name, live_commit_count))
            })
            .collect();

        Page {
            items,
            has_next_page: self.page_info.has_next_page,
            end_cursor: self.page_info.end_cursor,
        }
    }
}

impl CommitConnection {
    fn into_page(self) -> Page<Commit> {
        let items = self
            .edges
            .into_iter()
            .flatten()
            .filter_map(|edge| edge.node)
            .map(|node| Commit {
                author_id: node.author.and_then(|a| a.user).map(|u| u.id),
                additions: node.additions,
                deletions: node.deletions,
            })
            .collect();

        Page {
            items,
            has_next_page: self.page_info.has_next_page,
            end_cursor: self.page_info.end_cursor,
        }
    }
}

impl CommitsData {
    /// History page, or `None` when the repository has no default branch.
    fn into_page(self) -> Option<Page<Commit>> {
        let history = self
            .repository?
            .default_branch_ref?
            .target
            .and_then(|t| t.history);
        // A default branch pointing at a non-commit has no walkable history.
        Some(
            history
                .map(CommitConnection::into_page)
                .unwrap_or_else(|| Page::last(Vec::new())),
        )
    }
}

#[async_trait]
impl QueryService for GitHubClient {
    async fn user_id(&mut self, login: &str) -> Result<String> {
        let data: UserIdData = self.query(USER_ID_QUERY, &json!({ "login": login })).await?;
        data.user
            .map(|u| u.id)
            .ok_or_else(|| LocError::NotFound(format!("user {}", login)))
    }

    async fn list_repositories(
        &mut self,
        login: &str,
        affiliations: &[Affiliation],
        cursor: Option<&str>,
    ) -> Result<Page<RepositoryRef>> {
        let variables = json!({
            "owner_affiliation": affiliations,
            "login": login,
            "cursor": cursor,
            "first": REPOSITORY_PAGE_SIZE,
        });
        let data: RepositoriesData = self.query(REPOSITORIES_QUERY, &variables).await?;
        let user = data
            .user
            .ok_or_else(|| LocError::NotFound(format!("user {}", login)))?;
        Ok(user.repositories.into_page())
    }

    async fn list_commits(
        &mut self,
        owner: &str,
        name: &str,
        cursor: Option<&str>,
    ) -> Result<Option<Page<Commit>>> {
        let variables = json!({
            "repo_name": name,
            "owner": owner,
            "cursor": cursor,
            "first": COMMIT_PAGE_SIZE,
        });
        let data: CommitsData = self.query(COMMITS_QUERY, &variables).await?;
        Ok(data.into_page())
    }
}
