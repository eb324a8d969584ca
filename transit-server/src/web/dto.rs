//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lifecycle::RequestToken;
use crate::presentation::SearchView;

/// Request to start a search, as a form post or JSON body.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Where the trip starts
    #[serde(default)]
    pub origin: String,

    /// Where the trip ends
    #[serde(default)]
    pub destination: String,
}

/// Request to select an alternative.
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    /// Alternative id
    pub id: String,
}

/// A newly created session.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

/// The current view of a session.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,

    #[serde(flatten)]
    pub view: SearchView,
}

/// A search accepted for background fetching.
#[derive(Debug, Serialize)]
pub struct SearchAccepted {
    pub session_id: Uuid,

    /// Sequence number of the request within the session
    pub request: u64,

    /// Normalized "origin → destination"
    pub query: String,
}

impl SearchAccepted {
    pub fn new(session_id: Uuid, token: RequestToken, query: String) -> Self {
        Self {
            session_id,
            request: token.get(),
            query,
        }
    }
}

/// Result of a selection.
#[derive(Debug, Serialize)]
pub struct SelectResponse {
    /// Whether the id named a current alternative
    pub selected: bool,

    /// Selected alternative after the call
    pub selected_id: Option<String>,
}

/// Result of cancelling a search.
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    /// Whether a search was in flight
    pub cancelled: bool,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
