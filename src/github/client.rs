// GitHub GraphQL HTTP client.
// Handles authentication, rate limiting, and request/response processing.

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::{LocError, Result};

use super::types::RateLimit;

const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// GraphQL request body.
#[derive(Debug, Serialize)]
struct GraphQlRequest<'a, V: Serialize> {
    query: &'a str,
    variables: &'a V,
}

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// GitHub GraphQL client with authentication and rate limit tracking.
pub struct GitHubClient {
    client: Client,
    endpoint: String,
    rate_limit: RateLimit,
}

impl GitHubClient {
    /// Create a new GitHub client with the given token.
    pub fn new(token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("token {}", token))
                .map_err(|e| LocError::Other(e.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("locstat"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(LocError::Api)?;

        Ok(Self {
            client,
            endpoint: GITHUB_GRAPHQL_URL.to_string(),
            rate_limit: RateLimit::default(),
        })
    }

    /// Point the client at a different GraphQL endpoint (GitHub Enterprise).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Get the current rate limit information.
    pub fn rate_limit(&self) -> &RateLimit {
        &self.rate_limit
    }

    /// Run a GraphQL query and decode its `data` field.
    pub async fn query<V, T>(&mut self, query: &str, variables: &V) -> Result<T>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let body = GraphQlRequest { query, variables };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(LocError::Api)?;

        self.update_rate_limit(&response);
        let response = self.check_response(response).await?;
        let text = response.text().await?;
        debug!(
            bytes = text.len(),
            remaining = self.rate_limit.remaining,
            "graphql response"
        );
        decode_body(&text)
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&mut self, response: &Response) {
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };

        if let Some(limit) = header("x-ratelimit-limit") {
            self.rate_limit.limit = limit;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            self.rate_limit.remaining = remaining;
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            self.rate_limit.reset = reset;
        }
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            StatusCode::OK => Ok(response),
            StatusCode::UNAUTHORIZED => Err(LocError::Unauthorized),
            // GitHub answers secondary (anti-abuse) limits with 403 even when
            // the primary quota is not exhausted.
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                let reset_at = chrono::DateTime::from_timestamp(self.rate_limit.reset as i64, 0)
                    .filter(|_| self.rate_limit.reset > 0)
                    .map(|dt| dt.format("%H:%M:%S").to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                Err(LocError::RateLimited { reset_at })
            }
            status => Err(LocError::Http {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

/// Decode a GraphQL response body, surfacing `errors` before `data`.
fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T> {
    let envelope: GraphQlResponse<T> = serde_json::from_str(text)?;

    if !envelope.errors.is_empty() {
        let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
        return Err(LocError::GraphQl(messages.join("; ")));
    }

    envelope
        .data
        .ok_or_else(|| LocError::GraphQl("response carried no data".to_string()))
}
