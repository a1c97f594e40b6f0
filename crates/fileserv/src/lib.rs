//! Multi-root static file server.
//!
//! Serves several directories side by side, each under `/{name}` where `name`
//! is the directory's base name, with HTML listings for directories and a root
//! selector at `/`. The binary wires configuration and logging around the
//! router built here.

pub mod config;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod registry;
pub mod render;
pub mod resolver;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::FileServerError;
pub use listing::{ListEntry, ListingBuilder};
pub use registry::{ConfigError, Root};
pub use resolver::{PathResolver, Resolution};

/// Application state shared across handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Validated roots and the resolver over them
    pub resolver: Arc<PathResolver>,
    /// Directory reader
    pub listing: ListingBuilder,
}

impl AppState {
    /// Create a new AppState over already validated roots.
    pub fn new(roots: Vec<Root>) -> Self {
        Self {
            resolver: Arc::new(PathResolver::new(roots)),
            listing: ListingBuilder::default(),
        }
    }

    /// Create a new AppState with the listing options from `config`.
    pub fn with_config(roots: Vec<Root>, config: &Config) -> Self {
        Self {
            resolver: Arc::new(PathResolver::new(roots)),
            listing: ListingBuilder::new(config.show_hidden),
        }
    }
}

/// Build the complete application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::file_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
