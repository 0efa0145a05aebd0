// Error types for locstat.
// Covers GraphQL transport failures, cache file problems, and configuration errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Missing ACCESS_TOKEN or GITHUB_TOKEN environment variable")]
    MissingToken,

    #[error("Missing USER_NAME environment variable")]
    MissingUser,

    #[error("Malformed cache record: {line:?}")]
    MalformedRecord { line: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl LocError {
    /// Whether this error came from talking to the query service and should
    /// abort the current run after partial results are flushed.
    pub fn is_transient_fetch(&self) -> bool {
        matches!(
            self,
            LocError::Api(_)
                | LocError::Unauthorized
                | LocError::RateLimited { .. }
                | LocError::Http { .. }
                | LocError::GraphQl(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LocError>;
