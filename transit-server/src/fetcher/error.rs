//! Route fetch error types.

/// Errors from fetching routes for a query.
///
/// The two kinds are rendered differently: `Unreachable` invites a retry,
/// `NoRoute` tells the user to try a different trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The backing service could not be reached or returned unusable data
    #[error("route service unreachable: {0}")]
    Unreachable(String),

    /// The service answered but found no itinerary
    #[error("no route found")]
    NoRoute,
}

impl FetchError {
    /// Whether repeating the same search might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Unreachable(_))
    }

    /// Message shown to the user in place of results.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Unreachable(_) => "Failed to fetch route. Please try again.",
            FetchError::NoRoute => "No route found between these places.",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Unreachable(err.to_string())
    }
}
