//! Async driver pairing a lifecycle with a route fetcher.
//!
//! The lifecycle lock is held only for state transitions, never across
//! the fetch, so the session stays readable while a search is loading.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::RouteQuery;
use crate::fetcher::RouteFetcher;

use super::machine::{Resolution, SearchLifecycle, SubmitError, Submission};
use super::state::{RequestToken, SearchState};

/// Drives searches for one session.
///
/// Cloning is cheap and every clone drives the same session.
pub struct SearchDriver<F> {
    fetcher: Arc<F>,
    lifecycle: Arc<RwLock<SearchLifecycle>>,
}

impl<F> Clone for SearchDriver<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            lifecycle: Arc::clone(&self.lifecycle),
        }
    }
}

impl<F: RouteFetcher + 'static> SearchDriver<F> {
    /// Create a driver for a fresh idle session.
    pub fn new(fetcher: Arc<F>) -> Self {
        Self::with_lifecycle(fetcher, SearchLifecycle::new())
    }

    /// Create a driver around an existing lifecycle.
    pub fn with_lifecycle(fetcher: Arc<F>, lifecycle: SearchLifecycle) -> Self {
        Self {
            fetcher,
            lifecycle: Arc::new(RwLock::new(lifecycle)),
        }
    }

    /// Start a search. The returned [`PendingSearch`] must be run to fetch.
    pub async fn submit(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<PendingSearch<F>, SubmitError> {
        let submission = self.lifecycle.write().await.submit(origin, destination)?;
        Ok(self.pending(submission))
    }

    /// Start a search for an already validated query.
    pub async fn submit_query(&self, query: RouteQuery) -> Result<PendingSearch<F>, SubmitError> {
        let submission = self.lifecycle.write().await.submit_query(query)?;
        Ok(self.pending(submission))
    }

    /// Start a search and wait for it to resolve.
    pub async fn search(&self, origin: &str, destination: &str) -> Result<Resolution, SubmitError> {
        let pending = self.submit(origin, destination).await?;
        Ok(pending.run().await)
    }

    /// Search for an already validated query and wait for it to resolve.
    pub async fn search_query(&self, query: RouteQuery) -> Result<Resolution, SubmitError> {
        let pending = self.submit_query(query).await?;
        Ok(pending.run().await)
    }

    /// Start a search and resolve it in a background task.
    ///
    /// Returns the accepted token and normalized query.
    pub async fn spawn_search(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Submission, SubmitError> {
        let pending = self.submit(origin, destination).await?;
        let submission = Submission {
            token: pending.token,
            query: pending.query.clone(),
        };
        tokio::spawn(pending.run());
        Ok(submission)
    }

    fn pending(&self, submission: Submission) -> PendingSearch<F> {
        PendingSearch {
            token: submission.token,
            query: submission.query,
            fetcher: Arc::clone(&self.fetcher),
            lifecycle: Arc::clone(&self.lifecycle),
        }
    }

    /// Select an alternative. See [`SearchLifecycle::select`].
    pub async fn select(&self, id: &str) -> bool {
        self.lifecycle.write().await.select(id)
    }

    /// Cancel the in-flight search. See [`SearchLifecycle::cancel`].
    pub async fn cancel(&self) -> bool {
        self.lifecycle.write().await.cancel()
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> SearchState {
        self.lifecycle.read().await.state().clone()
    }
}

/// A submitted search whose fetch has not run yet.
pub struct PendingSearch<F> {
    token: RequestToken,
    query: RouteQuery,
    fetcher: Arc<F>,
    lifecycle: Arc<RwLock<SearchLifecycle>>,
}

impl<F: RouteFetcher> PendingSearch<F> {
    pub fn token(&self) -> RequestToken {
        self.token
    }

    pub fn query(&self) -> &RouteQuery {
        &self.query
    }

    /// Fetch and hand the outcome to the lifecycle.
    ///
    /// Returns [`Resolution::Stale`] if the session moved on while fetching.
    pub async fn run(self) -> Resolution {
        let outcome = self.fetcher.fetch(&self.query).await;
        self.lifecycle.write().await.resolve(self.token, outcome)
    }
}
