//! Application state for the web layer.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use uuid::Uuid;

use crate::cache::CachedRouteFetcher;
use crate::fetcher::{RouteBackend, RouteFetcher, TimeoutFetcher};
use crate::lifecycle::SearchDriver;
use crate::presentation::MapProvider;

/// The fetcher stack the server runs: backend, then timeout, then cache.
pub type AppFetcher = CachedRouteFetcher<TimeoutFetcher<RouteBackend>>;

/// Upper bound on concurrently live sessions.
const MAX_SESSIONS: u64 = 10_000;

/// Shared application state.
///
/// Generic over the fetcher so tests can drive the router with a fake.
pub struct AppState<F = AppFetcher> {
    /// Route fetcher shared by all sessions
    pub fetcher: Arc<F>,

    /// Live search sessions, evicted after sitting idle
    pub sessions: MokaCache<Uuid, SearchDriver<F>>,

    /// Which map SDK views are rendered for
    pub map_provider: MapProvider,
}

impl<F: RouteFetcher + 'static> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            sessions: self.sessions.clone(),
            map_provider: self.map_provider,
        }
    }
}

impl<F: RouteFetcher + 'static> AppState<F> {
    /// Create a new app state.
    pub fn new(fetcher: F, session_idle: Duration, map_provider: MapProvider) -> Self {
        let sessions = MokaCache::builder()
            .time_to_idle(session_idle)
            .max_capacity(MAX_SESSIONS)
            .build();

        Self {
            fetcher: Arc::new(fetcher),
            sessions,
            map_provider,
        }
    }

    /// Start a new idle session.
    pub async fn create_session(&self) -> (Uuid, SearchDriver<F>) {
        let id = Uuid::new_v4();
        let driver = SearchDriver::new(Arc::clone(&self.fetcher));
        self.sessions.insert(id, driver.clone()).await;
        (id, driver)
    }

    /// Look up a live session.
    pub async fn session(&self, id: &Uuid) -> Option<SearchDriver<F>> {
        self.sessions.get(id).await
    }
}
