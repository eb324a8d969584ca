//! Fixture route fetcher for testing without a routing service.
//!
//! Loads canned service responses from a JSON file and serves them as if
//! they were live answers.
//!
//! File format:
//!
//! ```json
//! {
//!   "routes": [
//!     {
//!       "origin": "Seoul Station",
//!       "destination": "Gangnam Station",
//!       "response": { "alternatives": [ ... ] }
//!     }
//!   ]
//! }
//! ```
//!
//! `response` uses the same shape as the HTTP service.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::{RouteQuery, RouteResultSet};

use super::RouteFetcher;
use super::convert::convert_response;
use super::error::FetchError;
use super::types::RouteResponse;

/// Errors from loading a fixture file.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to read fixture file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fixture file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("fixture file {0} contains no routes")]
    Empty(PathBuf),
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    routes: Vec<FixtureEntry>,
}

#[derive(Debug, Deserialize)]
struct FixtureEntry {
    origin: String,
    destination: String,
    response: RouteResponse,
}

/// Lookup key: trimmed, lowercased origin and destination.
type FixtureKey = (String, String);

fn key(origin: &str, destination: &str) -> FixtureKey {
    (
        origin.trim().to_lowercase(),
        destination.trim().to_lowercase(),
    )
}

/// Route fetcher that serves responses from a fixture file.
///
/// Queries with no matching entry get `NoRoute`.
#[derive(Debug, Clone)]
pub struct FixtureRouteFetcher {
    routes: Arc<RwLock<HashMap<FixtureKey, RouteResponse>>>,
}

impl FixtureRouteFetcher {
    /// Load a fixture file.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let routes = load(path.as_ref())?;
        Ok(Self {
            routes: Arc::new(RwLock::new(routes)),
        })
    }

    /// Reload fixture data from disk.
    ///
    /// On failure the current data is kept.
    pub async fn reload(&self, path: impl AsRef<Path>) -> Result<usize, FixtureError> {
        let fresh = load(path.as_ref())?;
        let count = fresh.len();
        let mut routes = self.routes.write().await;
        *routes = fresh;
        Ok(count)
    }
}

fn load(path: &Path) -> Result<HashMap<FixtureKey, RouteResponse>, FixtureError> {
    let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file: FixtureFile = serde_json::from_str(&json).map_err(|source| FixtureError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if file.routes.is_empty() {
        return Err(FixtureError::Empty(path.to_path_buf()));
    }

    let routes: HashMap<_, _> = file
        .routes
        .into_iter()
        .map(|entry| (key(&entry.origin, &entry.destination), entry.response))
        .collect();

    info!(path = %path.display(), routes = routes.len(), "Loaded route fixtures");
    Ok(routes)
}

impl RouteFetcher for FixtureRouteFetcher {
    async fn fetch(&self, query: &RouteQuery) -> Result<RouteResultSet, FetchError> {
        let routes = self.routes.read().await;

        let Some(response) = routes.get(&key(query.origin(), query.destination())) else {
            debug!(%query, "No fixture for query");
            return Err(FetchError::NoRoute);
        };

        Ok(convert_response(response, Local::now().time())?)
    }
}
