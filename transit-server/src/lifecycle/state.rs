//! Search states and request tokens.

use std::fmt;

use crate::domain::{RouteAlternative, RouteQuery, RouteResultSet};
use crate::fetcher::FetchError;

/// Identifies one submitted search.
///
/// Tokens increase monotonically within a lifecycle. Only the token of the
/// current in-flight search may resolve it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub(crate) fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// The sequence number of this request.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestToken({})", self.0)
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The state of one search interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    /// Nothing searched yet, or the last search was cancelled
    Idle,

    /// A fetch is in flight for `query`
    Loading {
        token: RequestToken,
        query: RouteQuery,
    },

    /// The last fetch failed
    Failed(FetchError),

    /// The last fetch succeeded
    Ready(RouteResultSet),
}

impl SearchState {
    /// Lowercase state name, for logs and view models.
    pub fn name(&self) -> &'static str {
        match self {
            SearchState::Idle => "idle",
            SearchState::Loading { .. } => "loading",
            SearchState::Failed(_) => "failed",
            SearchState::Ready(_) => "ready",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading { .. })
    }

    /// The in-flight request, if loading.
    pub fn in_flight(&self) -> Option<RequestToken> {
        match self {
            SearchState::Loading { token, .. } => Some(*token),
            _ => None,
        }
    }

    pub fn result_set(&self) -> Option<&RouteResultSet> {
        match self {
            SearchState::Ready(set) => Some(set),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            SearchState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// The selected alternative, if ready.
    pub fn selected(&self) -> Option<&RouteAlternative> {
        self.result_set().map(RouteResultSet::selected)
    }
}
