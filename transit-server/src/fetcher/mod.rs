//! Route fetching.
//!
//! [`RouteFetcher`] is the asynchronous boundary between a search and
//! whatever produces itineraries. Backends:
//!
//! - [`StubRouteFetcher`]: randomized canned itineraries after a fake delay
//! - [`FixtureRouteFetcher`]: canned responses from a JSON file
//! - [`HttpRouteClient`]: a live routing service
//!
//! [`TimeoutFetcher`] adds a caller-side deadline to any of them.

mod backend;
mod client;
mod convert;
mod error;
mod fixture;
mod stub;
mod timeout;
mod types;

use std::future::Future;

use crate::domain::{RouteQuery, RouteResultSet};

pub use backend::RouteBackend;
pub use client::{ClientError, HttpRouteClient, RouteServiceConfig};
pub use convert::{ConversionError, convert_response};
pub use error::FetchError;
pub use fixture::{FixtureError, FixtureRouteFetcher};
pub use stub::{StubConfig, StubRouteFetcher};
pub use timeout::TimeoutFetcher;
pub use types::{RouteResponse, WireCoordinate, WireRoute};

/// Trait for fetching route alternatives.
///
/// This abstraction lets searches run against deterministic fakes in tests.
/// Implementations must not block: the fetch is the only point where a
/// search suspends.
pub trait RouteFetcher: Send + Sync {
    /// Resolve a query to one or more alternatives.
    ///
    /// Fails with [`FetchError::NoRoute`] when nothing connects the two
    /// places, or [`FetchError::Unreachable`] when the source could not
    /// answer.
    fn fetch(
        &self,
        query: &RouteQuery,
    ) -> impl Future<Output = Result<RouteResultSet, FetchError>> + Send;
}
