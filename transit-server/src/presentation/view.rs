//! View model for one search session.

use serde::Serialize;

use crate::domain::{RouteAlternative, ValidationError};
use crate::lifecycle::SearchState;

use super::map::{MapOverlay, MapProvider};

pub const LOADING_MESSAGE: &str = "Finding routes...";

/// One alternative as shown in the result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteCard {
    pub id: String,
    pub duration: String,
    pub transfers: u32,
    pub transfers_label: String,
    pub walk_distance: String,
    pub fare: String,
    pub arrival_time: String,
    pub steps: Vec<String>,
    pub selected: bool,
}

impl RouteCard {
    fn new(alternative: &RouteAlternative, selected: bool) -> Self {
        Self {
            id: alternative.id().to_string(),
            duration: alternative.duration_label().to_string(),
            transfers: alternative.transfer_count(),
            transfers_label: transfers_label(alternative.transfer_count()),
            walk_distance: alternative.walk_distance_label().to_string(),
            fare: alternative.fare_label().to_string(),
            arrival_time: alternative.arrival_time_label().to_string(),
            steps: alternative.steps().to_vec(),
            selected,
        }
    }
}

fn transfers_label(count: u32) -> String {
    match count {
        0 => "Direct".to_string(),
        1 => "1 transfer".to_string(),
        n => format!("{n} transfers"),
    }
}

/// Kind of message shown above the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Info,
    Validation,
    Retryable,
    NoRoute,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl StatusMessage {
    pub fn validation(err: &ValidationError) -> Self {
        Self {
            kind: MessageKind::Validation,
            text: capitalize(&err.to_string()),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Everything the results screen needs, derived from a [`SearchState`].
///
/// ```
/// use transit_server::lifecycle::SearchState;
/// use transit_server::presentation::{MapProvider, SearchView};
///
/// let view = SearchView::from_state(&SearchState::Idle, MapProvider::Google);
/// assert_eq!(view.status, "idle");
/// assert!(view.cards.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchView {
    pub status: &'static str,
    pub loading: bool,
    pub query: Option<String>,
    pub message: Option<StatusMessage>,
    pub map: MapOverlay,
    pub selected_id: Option<String>,
    pub cards: Vec<RouteCard>,
}

impl SearchView {
    pub fn from_state(state: &SearchState, provider: MapProvider) -> Self {
        let mut view = Self {
            status: state.name(),
            loading: state.is_loading(),
            query: None,
            message: None,
            map: MapOverlay::empty(provider),
            selected_id: None,
            cards: Vec::new(),
        };

        match state {
            SearchState::Idle => {}
            SearchState::Loading { query, .. } => {
                view.query = Some(query.to_string());
                view.message = Some(StatusMessage {
                    kind: MessageKind::Info,
                    text: LOADING_MESSAGE.to_string(),
                });
            }
            SearchState::Failed(err) => {
                let kind = if err.is_retryable() {
                    MessageKind::Retryable
                } else {
                    MessageKind::NoRoute
                };
                view.message = Some(StatusMessage {
                    kind,
                    text: err.user_message().to_string(),
                });
            }
            SearchState::Ready(results) => {
                let selected = results.selected();
                view.map = MapOverlay::for_alternative(provider, selected);
                view.selected_id = Some(selected.id().to_string());
                view.cards = results
                    .alternatives()
                    .iter()
                    .map(|alt| RouteCard::new(alt, alt.id() == selected.id()))
                    .collect();
            }
        }

        view
    }

    /// Whether the retry button should be offered.
    pub fn retryable(&self) -> bool {
        matches!(
            self.message,
            Some(StatusMessage {
                kind: MessageKind::Retryable,
                ..
            })
        )
    }
}
