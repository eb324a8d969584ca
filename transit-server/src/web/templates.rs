//! Askama templates for the web frontend.

use askama::Template;

use crate::presentation::{MapOverlay, MessageKind, RouteCard, SearchView};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page with search form.
#[derive(Template, Default)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub origin: String,
    pub destination: String,
    pub error: Option<String>,
}

/// Results page for one session.
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate {
    pub session_id: String,
    pub view: SearchView,
    pub map_json: String,
}

impl ResultsTemplate {
    pub fn new(session_id: String, view: SearchView) -> Result<Self, serde_json::Error> {
        let map_json = map_json(&view.map)?;
        Ok(Self {
            session_id,
            view,
            map_json,
        })
    }

    /// CSS class for the status banner.
    pub fn message_class(&self) -> &'static str {
        match self.view.message.as_ref().map(|m| m.kind) {
            Some(MessageKind::Info) => "notice info",
            Some(MessageKind::Validation) => "notice warning",
            Some(MessageKind::Retryable) => "notice error",
            Some(MessageKind::NoRoute) => "notice muted",
            None => "notice",
        }
    }

    /// The selected card, whose steps are listed in full.
    pub fn selected_card(&self) -> Option<&RouteCard> {
        self.view.cards.iter().find(|c| c.selected)
    }
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

/// Serialize the overlay for embedding in a `<script type="application/json">`.
///
/// `<` is escaped so no string inside can close the script element.
fn map_json(map: &MapOverlay) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(map)?.replace('<', "\\u003c"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;
    use crate::lifecycle::{SearchLifecycle, SearchState};
    use crate::presentation::MapProvider;
    use crate::testing::result_set;

    fn ready_view() -> SearchView {
        let mut lifecycle = SearchLifecycle::new();
        let submission = lifecycle.submit("Seoul Station", "Gangnam").unwrap();
        lifecycle.resolve(submission.token, Ok(result_set(&["fast", "cheap"])));
        lifecycle.select("cheap");
        SearchView::from_state(lifecycle.state(), MapProvider::Google)
    }

    #[test]
    fn index_shows_error() {
        let html = IndexTemplate {
            origin: "Seoul".to_string(),
            destination: String::new(),
            error: Some("Please enter the destination".to_string()),
        }
        .render()
        .unwrap();
        assert!(html.contains("Please enter the destination"));
        assert!(html.contains("value=\"Seoul\""));
    }

    #[test]
    fn results_render_cards_and_selection() {
        let template = ResultsTemplate::new("abc".to_string(), ready_view()).unwrap();
        assert_eq!(template.selected_card().unwrap().id, "cheap");

        let html = template.render().unwrap();
        assert!(html.contains("25 min"));
        assert!(html.contains("Transfer to Line 2 at City Hall Station"));
        assert!(html.contains("card selected"));
        assert!(html.contains("/sessions/abc/select"));
    }

    #[test]
    fn results_render_failure() {
        let view = SearchView::from_state(
            &SearchState::Failed(FetchError::Unreachable("down".to_string())),
            MapProvider::Google,
        );
        let html = ResultsTemplate::new("abc".to_string(), view)
            .unwrap()
            .render()
            .unwrap();
        assert!(html.contains("Failed to fetch route. Please try again."));
        assert!(html.contains("notice error"));
    }

    #[test]
    fn map_json_escapes_angle_brackets() {
        let json = map_json(&MapOverlay::empty(MapProvider::Naver)).unwrap();
        assert!(!json.contains('<'));
        assert!(json.contains("\"zoom\":14"));
    }
}
