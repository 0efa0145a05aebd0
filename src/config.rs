// Run configuration.
// Loads credentials, target user, and cache settings from the environment.

use std::path::PathBuf;

use crate::cache::paths;
use crate::error::{LocError, Result};
use crate::github::Affiliation;

/// Number of opaque header lines kept at the top of the cache file.
pub const DEFAULT_COMMENT_SIZE: usize = 7;

/// Settings for one LOC tally run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Login of the user whose commits are counted.
    pub user_name: String,
    /// GitHub token used for GraphQL requests.
    pub token: String,
    /// Directory holding per-user cache files.
    pub cache_dir: PathBuf,
    /// Header lines preserved verbatim in the cache file.
    pub comment_size: usize,
    /// Which repository relationships are included.
    pub affiliations: Vec<Affiliation>,
    /// Discard all cached totals and recompute every repository.
    pub force_recompute: bool,
}

impl Config {
    /// Create a config with default cache settings.
    pub fn new(user_name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            token: token.into(),
            cache_dir: paths::cache_dir().unwrap_or_else(|| PathBuf::from("cache")),
            comment_size: DEFAULT_COMMENT_SIZE,
            affiliations: Affiliation::ALL.to_vec(),
            force_recompute: false,
        }
    }

    /// Build a config from environment variables.
    ///
    /// `ACCESS_TOKEN` wins over `GITHUB_TOKEN`. `LOC_CACHE_DIR`,
    /// `LOC_COMMENT_SIZE` and `LOC_FORCE_RECOMPUTE` are optional overrides.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = non_empty("ACCESS_TOKEN")
            .or_else(|| non_empty("GITHUB_TOKEN"))
            .ok_or(LocError::MissingToken)?;
        let user_name = non_empty("USER_NAME").ok_or(LocError::MissingUser)?;

        let mut config = Self::new(user_name, token);

        if let Some(dir) = non_empty("LOC_CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Some(size) = non_empty("LOC_COMMENT_SIZE") {
            config.comment_size = size.trim().parse().map_err(|_| {
                LocError::Other(format!("LOC_COMMENT_SIZE is not a number: {}", size))
            })?;
        }
        if let Some(force) = non_empty("LOC_FORCE_RECOMPUTE") {
            config.force_recompute = matches!(force.trim(), "1" | "true" | "TRUE" | "yes");
        }

        Ok(config)
    }

    /// Path of this user's cache file.
    pub fn cache_file(&self) -> PathBuf {
        paths::cache_file_path(&self.cache_dir, &self.user_name)
    }
}
