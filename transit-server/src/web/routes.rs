//! HTTP route handlers.

use std::path::Path as FsPath;

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::RouteQuery;
use crate::fetcher::RouteFetcher;
use crate::lifecycle::{SearchDriver, SubmitError};
use crate::presentation::{SearchView, StatusMessage};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router<F: RouteFetcher + 'static>(
    state: AppState<F>,
    static_dir: impl AsRef<FsPath>,
) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/search", post(search_form::<F>))
        .route("/sessions/:id", get(session_page::<F>))
        .route("/sessions/:id/select", post(select_form::<F>))
        .route("/api/sessions", post(create_session::<F>))
        .route("/api/sessions/:id", get(get_session::<F>))
        .route(
            "/api/sessions/:id/search",
            post(start_search::<F>).delete(cancel_search::<F>),
        )
        .route("/api/sessions/:id/select", post(select_alternative::<F>))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with search form.
async fn index_page() -> Result<Html<String>, AppError> {
    render(&IndexTemplate::default()).map(Html)
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn render(template: &impl Template) -> Result<String, AppError> {
    template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

async fn find_session<F: RouteFetcher + 'static>(
    state: &AppState<F>,
    id: Uuid,
) -> Result<SearchDriver<F>, AppError> {
    state.session(&id).await.ok_or_else(|| AppError::NotFound {
        message: format!("Session {} not found or expired", id),
    })
}

async fn session_view<F: RouteFetcher + 'static>(
    state: &AppState<F>,
    driver: &SearchDriver<F>,
) -> SearchView {
    SearchView::from_state(&driver.snapshot().await, state.map_provider)
}

/// Search from the home page form.
///
/// Runs the search to completion, then redirects to the session's results.
async fn search_form<F: RouteFetcher + 'static>(
    State(state): State<AppState<F>>,
    Form(req): Form<SearchRequest>,
) -> Result<Response, AppError> {
    let query = match RouteQuery::validate(&req.origin, &req.destination) {
        Ok(query) => query,
        Err(e) => {
            debug!(error = %e, "Rejected search form");
            let page = IndexTemplate {
                origin: req.origin,
                destination: req.destination,
                error: Some(StatusMessage::validation(&e).text),
            };
            return Ok((StatusCode::BAD_REQUEST, Html(render(&page)?)).into_response());
        }
    };

    let (id, driver) = state.create_session().await;
    info!(session = %id, query = %query, "Searching");
    driver.search_query(query).await?;

    Ok(Redirect::to(&format!("/sessions/{}", id)).into_response())
}

/// Results page for a session. HTML or JSON based on the Accept header.
async fn session_page<F: RouteFetcher + 'static>(
    State(state): State<AppState<F>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let html = accepts_html(&headers);
    let driver = match find_session(&state, id).await {
        Ok(driver) => driver,
        Err(AppError::NotFound { message }) if html => {
            let page = ErrorTemplate {
                title: "Session not found".to_string(),
                message,
            };
            return Ok((StatusCode::NOT_FOUND, Html(render(&page)?)).into_response());
        }
        Err(e) => return Err(e),
    };
    let view = session_view(&state, &driver).await;

    if html {
        let template =
            ResultsTemplate::new(id.to_string(), view).map_err(|e| AppError::Internal {
                message: format!("Map serialization error: {}", e),
            })?;
        Ok(Html(render(&template)?).into_response())
    } else {
        Ok(Json(SessionResponse {
            session_id: id,
            view,
        })
        .into_response())
    }
}

/// Select an alternative from a results page card.
async fn select_form<F: RouteFetcher + 'static>(
    State(state): State<AppState<F>>,
    Path(id): Path<Uuid>,
    Form(req): Form<SelectRequest>,
) -> Result<Redirect, AppError> {
    let driver = find_session(&state, id).await?;
    if !driver.select(&req.id).await {
        debug!(session = %id, alternative = %req.id, "Ignored selection");
    }
    Ok(Redirect::to(&format!("/sessions/{}", id)))
}

/// Create an idle session.
async fn create_session<F: RouteFetcher + 'static>(
    State(state): State<AppState<F>>,
) -> (StatusCode, Json<SessionCreated>) {
    let (id, _) = state.create_session().await;
    debug!(session = %id, "Created session");
    (StatusCode::CREATED, Json(SessionCreated { session_id: id }))
}

/// Current view of a session.
async fn get_session<F: RouteFetcher + 'static>(
    State(state): State<AppState<F>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let driver = find_session(&state, id).await?;
    let view = session_view(&state, &driver).await;
    Ok(Json(SessionResponse {
        session_id: id,
        view,
    }))
}

/// Start a search that resolves in the background.
async fn start_search<F: RouteFetcher + 'static>(
    State(state): State<AppState<F>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SearchRequest>,
) -> Result<(StatusCode, Json<SearchAccepted>), AppError> {
    let driver = find_session(&state, id).await?;
    let submission = driver.spawn_search(&req.origin, &req.destination).await?;
    info!(session = %id, request = %submission.token, query = %submission.query, "Searching");

    Ok((
        StatusCode::ACCEPTED,
        Json(SearchAccepted::new(
            id,
            submission.token,
            submission.query.to_string(),
        )),
    ))
}

/// Select an alternative. Unknown ids leave the selection unchanged.
async fn select_alternative<F: RouteFetcher + 'static>(
    State(state): State<AppState<F>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SelectResponse>, AppError> {
    let driver = find_session(&state, id).await?;
    let selected = driver.select(&req.id).await;
    let selected_id = driver
        .snapshot()
        .await
        .result_set()
        .map(|set| set.selected_id().to_string());

    Ok(Json(SelectResponse {
        selected,
        selected_id,
    }))
}

/// Cancel the in-flight search, returning the session to idle.
async fn cancel_search<F: RouteFetcher + 'static>(
    State(state): State<AppState<F>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelResponse>, AppError> {
    let driver = find_session(&state, id).await?;
    let cancelled = driver.cancel().await;
    Ok(Json(CancelResponse { cancelled }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<SubmitError> for AppError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::Invalid(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            SubmitError::InFlight => AppError::Conflict {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::domain::RouteResultSet;
    use crate::fetcher::{FetchError, StubConfig, StubRouteFetcher};
    use crate::presentation::MapProvider;

    /// Fetcher whose searches never finish.
    struct NeverFetcher;

    impl RouteFetcher for NeverFetcher {
        async fn fetch(&self, _query: &RouteQuery) -> Result<RouteResultSet, FetchError> {
            std::future::pending().await
        }
    }

    fn stub_state() -> AppState<StubRouteFetcher> {
        let stub = StubRouteFetcher::new(
            StubConfig::default()
                .with_latency(Duration::ZERO)
                .with_seed(7),
        );
        AppState::new(stub, Duration::from_secs(60), MapProvider::Google)
    }

    fn app<F: RouteFetcher + 'static>(state: AppState<F>) -> Router {
        create_router(state, concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn new_session<F: RouteFetcher + 'static>(state: &AppState<F>) -> String {
        let response = app(state.clone())
            .oneshot(json_request("POST", "/api/sessions", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["session_id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn health_ok() {
        let response = app(stub_state()).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn serves_static_assets() {
        let response = app(stub_state())
            .oneshot(get("/static/style.css"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("--primary: #0A7EA4"));
    }

    #[tokio::test]
    async fn index_renders_form() {
        let response = app(stub_state()).oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("action=\"/search\""));
    }

    #[tokio::test]
    async fn form_search_redirects_to_results() {
        let state = stub_state();
        let request = Request::builder()
            .method("POST")
            .uri("/search")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("origin=Seoul+Station&destination=Gangnam"))
            .unwrap();

        let response = app(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("/sessions/"));

        let page = Request::builder()
            .uri(location)
            .header(header::ACCEPT, "text/html")
            .body(Body::empty())
            .unwrap();
        let response = app(state).oneshot(page).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("card selected"));
        assert!(html.contains("Depart from Seoul Station"));
    }

    #[tokio::test]
    async fn blank_form_rerenders_with_field_message() {
        let state = stub_state();
        let request = Request::builder()
            .method("POST")
            .uri("/search")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("origin=Seoul&destination=+"))
            .unwrap();

        let response = app(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_text(response).await;
        assert!(html.contains("Please enter the destination"));
        assert!(html.contains("value=\"Seoul\""));
        state.sessions.run_pending_tasks().await;
        assert_eq!(state.sessions.entry_count(), 0);
    }

    #[tokio::test]
    async fn api_search_then_select() {
        let state = stub_state();
        let id = new_session(&state).await;

        let response = app(state.clone())
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{id}/search"),
                r#"{"origin":" Seoul Station ","destination":"Gangnam"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let accepted = body_json(response).await;
        assert_eq!(accepted["request"], 1);
        assert_eq!(accepted["query"], "Seoul Station → Gangnam");

        let mut view = Value::Null;
        for _ in 0..100 {
            let response = app(state.clone())
                .oneshot(get(&format!("/api/sessions/{id}")))
                .await
                .unwrap();
            view = body_json(response).await;
            if view["status"] == "ready" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(view["status"], "ready");
        assert_eq!(view["selected_id"], "route-1");
        assert_eq!(view["map"]["markers"].as_array().unwrap().len(), 2);

        let response = app(state.clone())
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{id}/select"),
                r#"{"id":"route-2"}"#,
            ))
            .await
            .unwrap();
        let selection = body_json(response).await;
        assert_eq!(selection["selected"], true);
        assert_eq!(selection["selected_id"], "route-2");

        let response = app(state)
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{id}/select"),
                r#"{"id":"route-99"}"#,
            ))
            .await
            .unwrap();
        let selection = body_json(response).await;
        assert_eq!(selection["selected"], false);
        assert_eq!(selection["selected_id"], "route-2");
    }

    #[tokio::test]
    async fn api_rejects_blank_origin() {
        let state = stub_state();
        let id = new_session(&state).await;

        let response = app(state)
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{id}/search"),
                r#"{"origin":"","destination":"Gangnam"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "please enter the origin");
    }

    #[tokio::test]
    async fn api_conflict_while_loading_then_cancel() {
        let state = AppState::new(NeverFetcher, Duration::from_secs(60), MapProvider::Naver);
        let id = new_session(&state).await;
        let search = || {
            json_request(
                "POST",
                &format!("/api/sessions/{id}/search"),
                r#"{"origin":"A","destination":"B"}"#,
            )
        };

        let response = app(state.clone()).oneshot(search()).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let response = app(state.clone()).oneshot(search()).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app(state.clone())
            .oneshot(get(&format!("/api/sessions/{id}")))
            .await
            .unwrap();
        let view = body_json(response).await;
        assert_eq!(view["status"], "loading");
        assert_eq!(view["loading"], true);

        let response = app(state.clone())
            .oneshot(json_request(
                "DELETE",
                &format!("/api/sessions/{id}/search"),
                "",
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["cancelled"], true);

        let response = app(state.clone()).oneshot(search()).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(body_json(response).await["request"], 2);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let uri = format!("/api/sessions/{}", Uuid::new_v4());
        let response = app(stub_state()).oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(
            body_json(response).await["error"]
                .as_str()
                .unwrap()
                .contains("not found")
        );

        let page = Request::builder()
            .uri(format!("/sessions/{}", Uuid::new_v4()))
            .header(header::ACCEPT, "text/html")
            .body(Body::empty())
            .unwrap();
        let response = app(stub_state()).oneshot(page).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Session not found"));
    }

    #[tokio::test]
    async fn no_route_renders_message() {
        let state = stub_state();
        let request = Request::builder()
            .method("POST")
            .uri("/search")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("origin=Gangnam&destination=gangnam"))
            .unwrap();
        let response = app(state.clone()).oneshot(request).await.unwrap();
        let location = response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_string();

        let response = app(state).oneshot(get(&location)).await.unwrap();
        let view = body_json(response).await;
        assert_eq!(view["status"], "failed");
        assert_eq!(view["message"]["kind"], "no_route");
    }
}
