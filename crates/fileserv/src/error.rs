use std::path::PathBuf;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Per-request failures. Each one maps to a status code with a fixed body;
/// the detail is logged, never sent to the client.
#[derive(Error, Debug)]
pub enum FileServerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Path is outside root directory")]
    PathTraversal,

    #[error("Cannot open directory {}: {source}", path.display())]
    Forbidden {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render listing: {0}")]
    Render(String),
}

impl FileServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            FileServerError::NotFound(_) | FileServerError::PathTraversal => StatusCode::NOT_FOUND,
            FileServerError::Forbidden { .. } => StatusCode::FORBIDDEN,
            FileServerError::Io(_) | FileServerError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for FileServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            FileServerError::NotFound(_) => debug!("{}", self),
            FileServerError::PathTraversal | FileServerError::Forbidden { .. } => warn!("{}", self),
            FileServerError::Io(_) | FileServerError::Render(_) => error!("{}", self),
        }

        let body = match status {
            StatusCode::NOT_FOUND => "404 page not found\n",
            StatusCode::FORBIDDEN => "403 Forbidden\n",
            _ => "500 Internal Server Error\n",
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}
