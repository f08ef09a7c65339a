use std::sync::Arc;

use axum::{extract::State, Json};
use booksearch_core::History;

use crate::state::AppState;

/// GET /history
///
/// Both collections in insertion order. Unreadable storage yields empty
/// collections rather than an error.
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<History> {
    Json(state.history().load_all().history)
}
