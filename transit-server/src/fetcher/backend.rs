//! Runtime choice of route fetcher.

use crate::domain::{RouteQuery, RouteResultSet};

use super::RouteFetcher;
use super::client::HttpRouteClient;
use super::error::FetchError;
use super::fixture::FixtureRouteFetcher;
use super::stub::StubRouteFetcher;

/// The backing service selected at startup.
#[derive(Debug)]
pub enum RouteBackend {
    Stub(StubRouteFetcher),
    Fixture(FixtureRouteFetcher),
    Http(HttpRouteClient),
}

impl RouteBackend {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            RouteBackend::Stub(_) => "stub",
            RouteBackend::Fixture(_) => "fixture",
            RouteBackend::Http(_) => "http",
        }
    }
}

impl RouteFetcher for RouteBackend {
    async fn fetch(&self, query: &RouteQuery) -> Result<RouteResultSet, FetchError> {
        match self {
            RouteBackend::Stub(f) => f.fetch(query).await,
            RouteBackend::Fixture(f) => f.fetch(query).await,
            RouteBackend::Http(f) => f.fetch(query).await,
        }
    }
}
