use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{books, handlers, history};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Catalog search and details
        .route("/books", get(books::search_books))
        .route("/books/{id}", get(books::get_book))
        // Recorded history
        .route("/history", get(history::get_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
