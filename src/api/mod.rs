//! HTTP surface — axum routes for the authors/quotes API.

pub mod authors;
pub mod quotes;

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::error::DatabaseError;
use crate::store::Database;

/// Application state shared across handlers.
///
/// The store handle is injected explicitly — there is no global database.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Database>,
}

/// Build the axum router with all API routes.
pub fn routes(store: Arc<dyn Database>) -> Router {
    let state = AppState { store };

    Router::new()
        .route("/health", get(health))
        .route("/authors", post(authors::create_author))
        .route("/author/", get(authors::list_authors))
        .route("/author/{id}", get(authors::get_author_by_id))
        .route("/quotes", get(quotes::list_quotes))
        .route("/quotes/filter", get(quotes::filter_quotes))
        .route(
            "/quotes/{id}",
            get(quotes::get_quote_by_id)
                .put(quotes::update_quote)
                .delete(quotes::delete_quote),
        )
        .route("/authors/{author_id}/quotes", post(quotes::create_quote))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "quotes-api"
    }))
}

/// Map an unexpected store failure to an opaque 500.
pub(crate) fn internal_error(op: &str, e: DatabaseError) -> Response {
    tracing::error!(error = %e, op, "Store operation failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "internal server error"})),
    )
        .into_response()
}
