//! Book search and detail handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use booksearch_core::{BookDetails, CatalogSource};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{error_response, ErrorResponse};
use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub keyword: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailParams {
    #[serde(default)]
    pub source: Option<CatalogSource>,
}

/// One search hit, as offered to a client for selection.
#[derive(Debug, Serialize)]
pub struct BookChoice {
    pub display: String,
    pub identifier: String,
    pub source: CatalogSource,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /books?keyword=<text>
///
/// Search the configured catalogs. Any successful search records the keyword.
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<BookChoice>>, ApiError> {
    let keyword = match params.keyword.as_deref() {
        Some(k) if !k.is_empty() => k,
        _ => return Err(error_response(StatusCode::BAD_REQUEST, "Keyword is required")),
    };

    let limit = state.config().catalog.default_limit;
    let results = state.catalog().search(keyword, limit, 0).await.map_err(|e| {
        warn!("Search for {:?} failed: {}", keyword, e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    state.history().record_keyword(Some(keyword));

    Ok(Json(
        results
            .into_iter()
            .map(|r| BookChoice {
                display: r.display_label(),
                identifier: r.id,
                source: r.source,
            })
            .collect(),
    ))
}

/// GET /books/{id}[?source=google|openlibrary]
///
/// Fetch full details. A successful fetch records the selection.
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    params: Result<Query<DetailParams>, QueryRejection>,
) -> Result<Json<BookDetails>, ApiError> {
    let Query(params) =
        params.map_err(|e| error_response(StatusCode::BAD_REQUEST, e.body_text()))?;

    let details = state
        .catalog()
        .get_details(&id, params.source)
        .await
        .map_err(|e| {
            warn!("Details for {} failed: {}", id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    state
        .history()
        .record_selection(Some(id.as_str()), Some(details.source));

    Ok(Json(details))
}
