use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio::fs;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::debug;

use crate::AppState;
use crate::error::FileServerError;
use crate::render::{ListingView, render};
use crate::resolver::Resolution;

/// GET / - Root selector
pub async fn root_listing(State(state): State<AppState>) -> Response {
    root_selector_page(&state)
}

/// GET /{root}/{path} - File content or directory listing
pub async fn serve_path(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, FileServerError> {
    // Decoded to raw bytes: file names are not required to be UTF-8
    let decoded = urlencoding::decode_binary(request.uri().path().as_bytes()).into_owned();

    let target = match state.resolver.resolve(&decoded) {
        Resolution::RootListing => return Ok(root_selector_page(&state)),
        Resolution::Target(target) => target,
        Resolution::Rejected => return Err(FileServerError::PathTraversal),
        Resolution::NotFound => {
            return Err(FileServerError::NotFound(
                String::from_utf8_lossy(&decoded).into_owned(),
            ));
        }
    };

    debug!(
        "Resolved {} to {} in root {}",
        target.display_path(),
        target.fs_path.display(),
        target.root.name
    );

    if !state.listing.show_hidden() && target.is_hidden() {
        debug!("Hidden path requested: {}", target.display_path());
        return Err(FileServerError::NotFound(target.display_path()));
    }

    // Symlinks must not lead out of the root
    let path = target.confine().await?;
    let metadata = fs::metadata(&path).await.map_err(FileServerError::Io)?;

    if metadata.is_dir() {
        let resolver = state.resolver.clone();
        let listing = state.listing;
        let root = target.root.clone();
        let relative_url = target.relative_url.clone();
        let current_path = target.display_path();

        // Read and render off the async workers; the response is only built
        // once the whole page exists.
        let html = tokio::task::spawn_blocking(move || -> Result<String, FileServerError> {
            let entries = listing.build(&root, &path, &relative_url)?;
            let view = ListingView::directory(&root, current_path, entries, resolver.roots());
            Ok(render(&view).into_string())
        })
        .await
        .map_err(|err| FileServerError::Render(err.to_string()))??;

        return Ok(html_response(html));
    }

    debug!("Serving file: {}", path.display());

    // Range, conditional requests and MIME type are handled by ServeFile
    match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => Ok(response.into_response()),
        Err(never) => match never {},
    }
}

fn root_selector_page(state: &AppState) -> Response {
    let view = ListingView::root_selector(state.resolver.roots());
    html_response(render(&view).into_string())
}

fn html_response(html: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
        .into_response()
}
