//! Liubiljett REST API resource client.
//!
//! # Architecture
//!
//! - [`ResourceClient`] is the seam the session accessor depends on; it
//!   fetches one JSON resource by locator.
//! - [`HttpResourceClient`] is the `reqwest` implementation used in
//!   production. Locators are resolved against the configured base URL, so
//!   both API paths (`people/current`) and the absolute hyperlinks the API
//!   returns (`https://liubiljett.se/api/carts/3/`) are accepted.
//!
//! # Example
//!
//! ```rust,ignore
//! use liubiljett_session::api::{HttpResourceClient, ResourceClient};
//!
//! let client = HttpResourceClient::new(&config.api)?;
//! let person = client.get("people/current").await?;
//! ```

use std::future::Future;
use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::ApiConfig;

/// Errors that can occur when fetching API resources.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource locator could not be resolved to a URL.
    #[error("Invalid resource location {0}")]
    InvalidLocation(String),

    /// HTTP client could not be constructed.
    #[error("Client build error: {0}")]
    Build(String),
}

impl ApiError {
    /// HTTP status code carried by this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::RateLimited(_) => Some(StatusCode::TOO_MANY_REQUESTS.as_u16()),
            _ => None,
        }
    }

    /// Whether the API rejected the request as unauthenticated (HTTP 401).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED.as_u16())
    }
}

/// Fetches JSON resources from the Liubiljett API.
pub trait ResourceClient: Send + Sync {
    /// Fetch the resource at `location` and return its JSON body.
    ///
    /// `location` is either a path relative to the API base URL or an
    /// absolute URL.
    fn get(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<serde_json::Value, ApiError>> + Send;
}

impl<C: ResourceClient> ResourceClient for Arc<C> {
    fn get(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<serde_json::Value, ApiError>> + Send {
        (**self).get(location)
    }
}

// =============================================================================
// HttpResourceClient
// =============================================================================

/// `reqwest`-backed [`ResourceClient`].
#[derive(Clone)]
pub struct HttpResourceClient {
    inner: Arc<HttpResourceClientInner>,
}

struct HttpResourceClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpResourceClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Build` if the token is not a valid header value or
    /// the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Token {}", token.expose_secret()))
                .map_err(|e| ApiError::Build(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Build(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(HttpResourceClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Resolve a resource locator against the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidLocation` if the locator cannot be joined.
    pub fn resolve(&self, location: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(location)
            .map_err(|e| ApiError::InvalidLocation(format!("{location}: {e}")))
    }
}

impl ResourceClient for HttpResourceClient {
    #[instrument(skip(self))]
    async fn get(&self, location: &str) -> Result<serde_json::Value, ApiError> {
        let url = self.resolve(location)?;

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> HttpResourceClient {
        HttpResourceClient::new(&ApiConfig::new("https://liubiljett.se/api/").unwrap()).unwrap()
    }

    #[test]
    fn test_resolve_relative_path() {
        let url = client().resolve("people/current").unwrap();
        assert_eq!(url.as_str(), "https://liubiljett.se/api/people/current");
    }

    #[test]
    fn test_resolve_root_relative_path() {
        let url = client().resolve("/api/carts/3/").unwrap();
        assert_eq!(url.as_str(), "https://liubiljett.se/api/carts/3/");
    }

    #[test]
    fn test_resolve_absolute_url() {
        let url = client().resolve("https://other.liubiljett.se/api/carts/9/").unwrap();
        assert_eq!(url.as_str(), "https://other.liubiljett.se/api/carts/9/");
    }

    #[test]
    fn test_unauthorized_detection() {
        let err = ApiError::Status {
            status: 401,
            message: "Authentication credentials were not provided.".to_string(),
        };
        assert!(err.is_unauthorized());

        let err = ApiError::Status {
            status: 403,
            message: "Forbidden".to_string(),
        };
        assert!(!err.is_unauthorized());
        assert!(!ApiError::RateLimited(5).is_unauthorized());
        assert!(!ApiError::InvalidLocation("x".to_string()).is_unauthorized());
    }

    #[test]
    fn test_status_of_rate_limited() {
        assert_eq!(ApiError::RateLimited(60).status(), Some(429));
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Status {
            status: 500,
            message: "Server Error".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - Server Error");
        assert_eq!(
            ApiError::RateLimited(60).to_string(),
            "Rate limited, retry after 60 seconds"
        );
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let mut config = ApiConfig::new("https://liubiljett.se/api/").unwrap();
        config.token = Some(secrecy::SecretString::from("abc\ndef"));
        assert!(matches!(
            HttpResourceClient::new(&config),
            Err(ApiError::Build(_))
        ));
    }
}
