//! Quote endpoints — CRUD plus filtering.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{info, warn};

use super::{AppState, internal_error};
use crate::model::MAX_TEXT_LEN;
use crate::store::QuoteFilter;

fn quote_not_found(id: i64) -> Response {
    (
        StatusCode::NOT_FOUND,
        format!("quote with id={id} not found"),
    )
        .into_response()
}

fn author_not_found(id: i64) -> Response {
    (
        StatusCode::NOT_FOUND,
        format!("author with id={id} not found"),
    )
        .into_response()
}

fn text_too_long() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "error": format!("text must be at most {MAX_TEXT_LEN} characters")
        })),
    )
        .into_response()
}

/// GET /quotes/{id} — fetch one quote with its author embedded.
pub async fn get_quote_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.store.get_quote(id).await {
        Ok(Some(record)) => Json(record.to_json()).into_response(),
        Ok(None) => quote_not_found(id),
        Err(e) => internal_error("get_quote", e),
    }
}

/// GET /quotes — list all quotes.
pub async fn list_quotes(State(state): State<AppState>) -> Response {
    match state.store.list_quotes().await {
        Ok(records) => {
            let body: Vec<_> = records.iter().map(|r| r.to_json()).collect();
            Json(body).into_response()
        }
        Err(e) => internal_error("list_quotes", e),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateQuoteRequest {
    text: String,
}

/// POST /authors/{author_id}/quotes — create a quote for an author.
///
/// The author must exist; a missing author is a 404, not a fault.
pub async fn create_quote(
    State(state): State<AppState>,
    Path(author_id): Path<i64>,
    Json(body): Json<CreateQuoteRequest>,
) -> Response {
    if body.text.len() > MAX_TEXT_LEN {
        return text_too_long();
    }

    let author = match state.store.get_author(author_id).await {
        Ok(Some(author)) => author,
        Ok(None) => {
            warn!(author_id, "Quote creation for unknown author rejected");
            return author_not_found(author_id);
        }
        Err(e) => return internal_error("get_author", e),
    };

    match state.store.insert_quote(author.id, &body.text).await {
        Ok(quote) => {
            info!(quote_id = quote.id, author_id, "Quote created");
            match state.store.get_quote(quote.id).await {
                Ok(Some(record)) => {
                    (StatusCode::CREATED, Json(record.to_json())).into_response()
                }
                Ok(None) => quote_not_found(quote.id),
                Err(e) => internal_error("get_quote", e),
            }
        }
        Err(e) => internal_error("insert_quote", e),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuoteRequest {
    /// Id of the author to reattach the quote to.
    author: Option<i64>,
    text: Option<String>,
    rating: Option<i64>,
}

/// PUT /quotes/{id} — partial update.
///
/// Absent key = no-op; present key = overwrite, including falsy values
/// such as `""` and `0`. An `author` key must name an existing author.
pub async fn update_quote(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateQuoteRequest>,
) -> Response {
    let record = match state.store.get_quote(id).await {
        Ok(Some(record)) => record,
        Ok(None) => return quote_not_found(id),
        Err(e) => return internal_error("get_quote", e),
    };

    let mut quote = record.quote;

    if let Some(author_id) = body.author {
        match state.store.get_author(author_id).await {
            Ok(Some(author)) => quote.author_id = author.id,
            Ok(None) => {
                warn!(quote_id = id, author_id, "Quote reattach to unknown author rejected");
                return author_not_found(author_id);
            }
            Err(e) => return internal_error("get_author", e),
        }
    }
    if let Some(text) = body.text {
        if text.len() > MAX_TEXT_LEN {
            return text_too_long();
        }
        quote.text = text;
    }
    if let Some(rating) = body.rating {
        quote.rating = rating;
    }

    if let Err(e) = state.store.update_quote(&quote).await {
        return internal_error("update_quote", e);
    }
    info!(quote_id = id, "Quote updated");

    match state.store.get_quote(id).await {
        Ok(Some(record)) => Json(record.to_json()).into_response(),
        Ok(None) => quote_not_found(id),
        Err(e) => internal_error("get_quote", e),
    }
}

/// DELETE /quotes/{id} — delete a quote, confirming in plaintext.
pub async fn delete_quote(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.store.delete_quote(id).await {
        Ok(true) => {
            info!(quote_id = id, "Quote deleted");
            format!("Quote with id {id} is deleted.").into_response()
        }
        Ok(false) => (
            StatusCode::NOT_FOUND,
            format!("Quote with id={id} not found!"),
        )
            .into_response(),
        Err(e) => internal_error("delete_quote", e),
    }
}

#[derive(Debug, Deserialize)]
pub struct FilterParams {
    /// Exact author name.
    author: Option<String>,
    /// Minimum rating (inclusive).
    rate: Option<i64>,
}

/// GET /quotes/filter?author=&rate= — filter quotes.
pub async fn filter_quotes(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Response {
    let filter = QuoteFilter {
        author_name: params.author,
        min_rating: params.rate,
    };

    match state.store.filter_quotes(&filter).await {
        Ok(records) => {
            let body: Vec<_> = records.iter().map(|r| r.to_json()).collect();
            Json(body).into_response()
        }
        Err(e) => internal_error("filter_quotes", e),
    }
}
