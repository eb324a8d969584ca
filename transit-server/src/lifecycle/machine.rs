//! The search state machine.
//!
//! ```text
//!            submit                 resolve(ok)
//!   Idle ───────────▶ Loading ─────────────────▶ Ready ◀─┐ select
//!    ▲                 │  │                        │ └───┘
//!    └──── cancel ─────┘  │ resolve(err)           │ submit
//!                         ▼                        ▼
//!                       Failed ───── submit ───▶ Loading
//! ```
//!
//! The machine is synchronous: it hands out a [`Submission`] for each
//! accepted search and expects the caller to fetch and then call
//! [`SearchLifecycle::resolve`] with the submission's token. Resolutions
//! carrying any other token are stale and discarded.

use tracing::{debug, info};

use crate::domain::{RouteAlternative, RouteQuery, RouteResultSet, ValidationError};
use crate::fetcher::FetchError;

use super::state::{RequestToken, SearchState};

/// What `submit` does while a search is already in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InFlightPolicy {
    /// Refuse the new search until the current one resolves
    #[default]
    Reject,

    /// Start the new search and discard the current one's eventual result
    Supersede,
}

/// Why a search was not started.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The input failed validation; the state is unchanged
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Another search is still loading
    #[error("a search is already in progress")]
    InFlight,
}

/// An accepted search, to be fetched by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub token: RequestToken,
    pub query: RouteQuery,
}

/// Outcome of handing a fetch result back to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The result became the current state
    Applied,

    /// The result belonged to a superseded or cancelled search and was dropped
    Stale,
}

/// State machine for one search session.
///
/// Owns the current result set exclusively. A new search replaces it
/// wholesale; only [`select`](Self::select) changes it in place.
#[derive(Debug)]
pub struct SearchLifecycle {
    state: SearchState,
    last_seq: u64,
    policy: InFlightPolicy,
}

impl SearchLifecycle {
    /// Create an idle lifecycle that rejects overlapping searches.
    pub fn new() -> Self {
        Self::with_policy(InFlightPolicy::default())
    }

    /// Create an idle lifecycle with the given in-flight policy.
    pub fn with_policy(policy: InFlightPolicy) -> Self {
        Self {
            state: SearchState::Idle,
            last_seq: 0,
            policy,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn policy(&self) -> InFlightPolicy {
        self.policy
    }

    /// The selected alternative, if results are showing.
    pub fn selected(&self) -> Option<&RouteAlternative> {
        self.state.selected()
    }

    /// Validate raw input and start a search.
    ///
    /// On a validation error the state does not change. The error names the
    /// offending field so it can be shown to the user.
    pub fn submit(&mut self, origin: &str, destination: &str) -> Result<Submission, SubmitError> {
        self.check_in_flight()?;
        let query = RouteQuery::validate(origin, destination)?;
        Ok(self.begin(query))
    }

    /// Start a search for an already validated query.
    pub fn submit_query(&mut self, query: RouteQuery) -> Result<Submission, SubmitError> {
        self.check_in_flight()?;
        Ok(self.begin(query))
    }

    fn check_in_flight(&self) -> Result<(), SubmitError> {
        match (&self.state, self.policy) {
            (SearchState::Loading { token, .. }, InFlightPolicy::Reject) => {
                debug!(%token, "Rejecting submit while search in flight");
                Err(SubmitError::InFlight)
            }
            _ => Ok(()),
        }
    }

    fn begin(&mut self, query: RouteQuery) -> Submission {
        self.last_seq += 1;
        let token = RequestToken::new(self.last_seq);

        if let Some(previous) = self.state.in_flight() {
            debug!(%previous, %token, "Superseding in-flight search");
        }

        info!(%token, %query, "Search started");
        self.state = SearchState::Loading {
            token,
            query: query.clone(),
        };

        Submission { token, query }
    }

    /// Apply a fetch outcome.
    ///
    /// Only the current in-flight token moves the machine out of `Loading`.
    /// Anything else is stale and leaves the state untouched.
    pub fn resolve(
        &mut self,
        token: RequestToken,
        outcome: Result<RouteResultSet, FetchError>,
    ) -> Resolution {
        if self.state.in_flight() != Some(token) {
            debug!(%token, state = self.state.name(), "Discarding stale search result");
            return Resolution::Stale;
        }

        self.state = match outcome {
            Ok(mut set) => {
                set.reset_selection();
                info!(%token, alternatives = set.len(), "Search ready");
                SearchState::Ready(set)
            }
            Err(err) => {
                info!(%token, error = %err, "Search failed");
                SearchState::Failed(err)
            }
        };

        Resolution::Applied
    }

    /// Select an alternative by id.
    ///
    /// Returns false, leaving everything unchanged, when no results are
    /// showing or `id` is not among them.
    pub fn select(&mut self, id: &str) -> bool {
        match &mut self.state {
            SearchState::Ready(set) => {
                let found = set.select(id);
                if !found {
                    debug!(id, "Ignoring selection of unknown alternative");
                }
                found
            }
            _ => false,
        }
    }

    /// Abandon the in-flight search and return to `Idle`.
    ///
    /// Returns false when nothing was loading.
    pub fn cancel(&mut self) -> bool {
        match self.state.in_flight() {
            Some(token) => {
                info!(%token, "Search cancelled");
                self.state = SearchState::Idle;
                true
            }
            None => false,
        }
    }
}

impl Default for SearchLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
