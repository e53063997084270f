//! HTTP front of the answer pipeline.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/search` | `{"query"}` → `{"answer", "sources"}` |
//! | `GET`  | `/health` | Liveness check (returns version) |
//!
//! Failures are `{"detail": "..."}` with a 4xx/5xx status.

mod errors;
pub mod params;

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::answer::{self, SourcedAnswer};
use crate::linkup::SearchClient;
use crate::openai::AnswerClient;
use errors::{ApiError, panic_to_response};
use params::QueryRequest;

/// Provider clients shared by every request. Nothing here is mutated after startup.
pub struct AppState<S, A> {
    search: S,
    llm: A,
}

impl<S, A> AppState<S, A> {
    pub fn new(search: S, llm: A) -> Self {
        Self { search, llm }
    }
}

pub fn router<S, A>(state: Arc<AppState<S, A>>) -> Router
where
    S: SearchClient + 'static,
    A: AnswerClient + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/search", post(search_handler::<S, A>))
        .route("/health", get(health_handler))
        .layer(CatchPanicLayer::custom(panic_to_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn serve<S, A>(bind: &str, state: AppState<S, A>) -> std::io::Result<()>
where
    S: SearchClient + 'static,
    A: AnswerClient + 'static,
{
    let app = router(Arc::new(state));
    let listener = TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "askline listening");
    axum::serve(listener, app).await
}

async fn search_handler<S, A>(
    State(state): State<Arc<AppState<S, A>>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<SourcedAnswer>, ApiError>
where
    S: SearchClient + 'static,
    A: AnswerClient + 'static,
{
    let Json(request) = payload?;
    let result = answer::answer(&state.search, &state.llm, &request.query).await?;
    Ok(Json(result))
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::testing::{MockAnswer, MockSearch, result, two_results};
    use crate::linkup::{LinkupError, SearchResult};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    struct PanickingSearch;

    impl SearchClient for PanickingSearch {
        async fn search(&self, _query: &str) -> Result<Vec<SearchResult>, LinkupError> {
            panic!("index out of range in result parser");
        }
    }

    fn app<S, A>(search: S, llm: A) -> (Router, Arc<AppState<S, A>>)
    where
        S: SearchClient + 'static,
        A: AnswerClient + 'static,
    {
        let state = Arc::new(AppState::new(search, llm));
        (router(state.clone()), state)
    }

    fn post_search(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/search")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn search_round_trip() {
        let (router, _) = app(MockSearch::always(two_results()), MockAnswer::replying("ANSWER"));

        let (status, body) = send(router, post_search(r#"{"query":"q"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"answer": "ANSWER", "sources": ["http://x", "http://y"]})
        );
    }

    #[tokio::test]
    async fn no_results_is_404_without_answer_call() {
        let (router, state) = app(MockSearch::always(Vec::new()), MockAnswer::replying("unused"));

        let (status, body) = send(router, post_search(r#"{"query":"q"}"#)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "No search results found"}));
        assert_eq!(state.search.calls(), 1);
        assert_eq!(state.llm.calls(), 0);
    }

    #[tokio::test]
    async fn search_provider_failure_is_500_with_detail() {
        let (router, state) = app(
            MockSearch::failing(LinkupError::Api {
                code: 503,
                message: "HTTP 503 Service Unavailable: linkup maintenance".into(),
            }),
            MockAnswer::replying("unused"),
        );

        let (status, body) = send(router, post_search(r#"{"query":"q"}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("linkup maintenance"), "got: {detail}");
        assert_eq!(state.llm.calls(), 0);
    }

    #[tokio::test]
    async fn answer_provider_failure_is_500_with_detail() {
        let (router, _) = app(
            MockSearch::always(two_results()),
            MockAnswer::failing(500, "context length exceeded"),
        );

        let (status, body) = send(router, post_search(r#"{"query":"q"}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("context length exceeded"), "got: {detail}");
    }

    #[tokio::test]
    async fn blank_query_is_400_without_provider_calls() {
        let (router, state) = app(MockSearch::always(two_results()), MockAnswer::replying("x"));

        let (status, body) = send(router, post_search(r#"{"query":"   "}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "query must not be empty");
        assert_eq!(state.search.calls(), 0);
        assert_eq!(state.llm.calls(), 0);
    }

    #[tokio::test]
    async fn missing_query_field_is_422() {
        let (router, state) = app(MockSearch::always(two_results()), MockAnswer::replying("x"));

        let (status, body) = send(router, post_search(r#"{"question":"q"}"#)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains("query"));
        assert_eq!(state.search.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_json_is_400() {
        let (router, _) = app(MockSearch::always(two_results()), MockAnswer::replying("x"));

        let (status, body) = send(router, post_search("{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn panic_in_pipeline_is_500_with_message() {
        let (router, _) = app(PanickingSearch, MockAnswer::replying("x"));

        let (status, body) = send(router, post_search(r#"{"query":"q"}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "index out of range in result parser");
    }

    #[tokio::test]
    async fn same_query_twice_gives_same_response() {
        let results = vec![
            result("A", "c1", "http://x"),
            result("A", "c1", "http://x"),
        ];
        let (router, _) = app(MockSearch::always(results), MockAnswer::replying("same"));

        let first = send(router.clone(), post_search(r#"{"query":"q"}"#)).await;
        let second = send(router, post_search(r#"{"query":"q"}"#)).await;

        assert_eq!(first, second);
        assert_eq!(first.1["sources"], json!(["http://x", "http://x"]));
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (router, _) = app(MockSearch::always(Vec::new()), MockAnswer::replying("x"));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, body) = send(router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
