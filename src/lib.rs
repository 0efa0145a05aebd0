// locstat: incremental lines-of-code totals for a GitHub user.
// Caches per-repository LOC so unchanged histories are never walked twice.

pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod loc;
pub mod metrics;

#[cfg(test)]
mod test_support;

pub use cache::{CacheFile, CacheRecord, CacheStore};
pub use config::Config;
pub use error::{LocError, Result};
pub use github::{Affiliation, GitHubClient, QueryService, RepositoryRef};
pub use loc::{RunReport, RunTotals, tally_user_loc};
pub use metrics::QueryMetrics;
