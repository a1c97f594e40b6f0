use axum::{Router, routing::get};

use crate::AppState;
use crate::handlers;

/// Create file server routes
pub fn file_routes() -> Router<AppState> {
    Router::new()
        // Root selector
        .route("/", get(handlers::root_listing))
        // Everything below a root: files and directory listings
        .route("/{*path}", get(handlers::serve_path))
}
