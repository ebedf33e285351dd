//! Author endpoints — create, get by id, list.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{info, warn};

use super::{AppState, internal_error};
use crate::error::DatabaseError;
use crate::model::MAX_NAME_LEN;

#[derive(Debug, Deserialize)]
pub struct CreateAuthorRequest {
    name: String,
}

/// POST /authors — create an author.
///
/// A duplicate name is a 409, not an uncaught constraint fault.
pub async fn create_author(
    State(state): State<AppState>,
    Json(body): Json<CreateAuthorRequest>,
) -> Response {
    if body.name.is_empty() || body.name.len() > MAX_NAME_LEN {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": format!("name must be 1..={MAX_NAME_LEN} characters")
            })),
        )
            .into_response();
    }

    match state.store.insert_author(&body.name).await {
        Ok(author) => {
            info!(author_id = author.id, name = %author.name, "Author created");
            (StatusCode::CREATED, Json(author.to_json())).into_response()
        }
        Err(DatabaseError::Constraint(_)) => {
            warn!(name = %body.name, "Duplicate author name rejected");
            (
                StatusCode::CONFLICT,
                Json(serde_json::json!({
                    "error": format!("author with name '{}' already exists", body.name)
                })),
            )
                .into_response()
        }
        Err(e) => internal_error("insert_author", e),
    }
}

/// GET /author/{id} — fetch one author.
pub async fn get_author_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.store.get_author(id).await {
        Ok(Some(author)) => Json(author.to_json()).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            format!("author with id={id} not found"),
        )
            .into_response(),
        Err(e) => internal_error("get_author", e),
    }
}

/// GET /author/ — list all authors. An empty store is a 200 with `[]`.
pub async fn list_authors(State(state): State<AppState>) -> Response {
    match state.store.list_authors().await {
        Ok(authors) => {
            let body: Vec<_> = authors.iter().map(|a| a.to_json()).collect();
            Json(body).into_response()
        }
        Err(e) => internal_error("list_authors", e),
    }
}
