use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use socialgrid_sources::Aggregator;

#[derive(Clone)]
pub struct AppState {
    aggregator: Arc<Aggregator>,
}

pub fn build_router(aggregator: Arc<Aggregator>) -> Router {
    // Permissive policy: the grid is served from arbitrary origins. The
    // layer also answers OPTIONS pre-flights.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ]);

    Router::new()
        .route("/search", get(search))
        .route("/save-search", post(save_search))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { aggregator })
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let query = match params.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Query parameter 'q' is required"})),
            )
                .into_response();
        }
    };

    // Aggregation itself is infallible; run it on its own task so a panic
    // in a source mapping degrades to the stable 500 shape instead of
    // dropping the connection.
    let aggregator = Arc::clone(&state.aggregator);
    let task_query = query.clone();
    let outcome = tokio::spawn(async move { aggregator.aggregate(&task_query).await }).await;

    match outcome {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(e) => {
            error!(query, error = %e, "Aggregation task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Internal server error",
                    "twitter": [],
                    "reddit": [],
                    "youtube": [],
                    "linkedin": [],
                })),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
struct SaveSearchRequest {
    query: String,
    timestamp: DateTime<Utc>,
}

/// Persistence collaborator boundary: the client fires this after every
/// successful search and ignores the outcome. The record is logged; no
/// durable store sits behind it.
async fn save_search(Json(body): Json<SaveSearchRequest>) -> impl IntoResponse {
    info!(query = %body.query, timestamp = %body.timestamp, "Search recorded");
    Json(serde_json::json!({"ok": true}))
}

async fn health() -> &'static str {
    "ok"
}
