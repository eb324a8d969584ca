//! Caller-imposed deadline for route fetches.

use std::time::Duration;

use tracing::warn;

use crate::domain::{RouteQuery, RouteResultSet};

use super::RouteFetcher;
use super::error::FetchError;

/// Wraps a fetcher and treats a slow answer as an unreachable service.
#[derive(Debug, Clone)]
pub struct TimeoutFetcher<F> {
    inner: F,
    timeout: Duration,
}

impl<F> TimeoutFetcher<F> {
    pub fn new(inner: F, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<F: RouteFetcher> RouteFetcher for TimeoutFetcher<F> {
    async fn fetch(&self, query: &RouteQuery) -> Result<RouteResultSet, FetchError> {
        match tokio::time::timeout(self.timeout, self.inner.fetch(query)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(%query, timeout = ?self.timeout, "Route fetch timed out");
                Err(FetchError::Unreachable(format!(
                    "timed out after {:?}",
                    self.timeout
                )))
            }
        }
    }
}
