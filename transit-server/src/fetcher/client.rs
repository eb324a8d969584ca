//! HTTP client for a live routing service.
//!
//! Sends `GET {base_url}/route?origin=..&dest=..` and converts the JSON
//! answer to domain types. Every transport or protocol failure surfaces as
//! [`FetchError::Unreachable`]; only a 404 or an empty answer means
//! [`FetchError::NoRoute`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::domain::{RouteQuery, RouteResultSet};

use super::RouteFetcher;
use super::convert::convert_response;
use super::error::FetchError;
use super::types::RouteResponse;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Longest body excerpt kept in error messages.
const BODY_EXCERPT_CHARS: usize = 200;

/// Errors from building the HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid API key format")]
    InvalidApiKey,

    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Configuration for the routing service client.
#[derive(Debug, Clone)]
pub struct RouteServiceConfig {
    /// Base URL of the routing service
    pub base_url: String,
    /// Bearer token sent with every request, if any
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
}

impl RouteServiceConfig {
    /// Create a config for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Send a bearer token with every request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }
}

/// Routing service API client.
///
/// Uses a semaphore to limit concurrent requests.
#[derive(Debug, Clone)]
pub struct HttpRouteClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl HttpRouteClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RouteServiceConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|_| ClientError::InvalidApiKey)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl RouteFetcher for HttpRouteClient {
    async fn fetch(&self, query: &RouteQuery) -> Result<RouteResultSet, FetchError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| FetchError::Unreachable("client is shutting down".to_string()))?;

        let url = format!("{}/route", self.base_url);
        info!(%query, %url, "Fetching route");

        let response = self
            .http
            .get(&url)
            .query(&[("origin", query.origin()), ("dest", query.destination())])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(%query, "Routing service found no route");
            return Err(FetchError::NoRoute);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!("Routing service rejected credentials");
            return Err(FetchError::Unreachable(
                "unauthorized (invalid API key)".to_string(),
            ));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate limited by routing service");
            return Err(FetchError::Unreachable("rate limited".to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Routing service error");
            return Err(FetchError::Unreachable(format!(
                "API error {}: {}",
                status.as_u16(),
                excerpt(&body)
            )));
        }

        let body = response.text().await?;

        let parsed: RouteResponse = serde_json::from_str(&body).map_err(|e| {
            FetchError::Unreachable(format!("JSON parse error: {e} (body: {})", excerpt(&body)))
        })?;

        Ok(convert_response(&parsed, Local::now().time())?)
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
