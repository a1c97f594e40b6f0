//! Test utilities and common setup.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use fileserv::{AppState, Config, registry};
use tempfile::TempDir;
use tower::ServiceExt;

/// Two roots, `docs` and `pics`, below one temporary directory.
pub struct Fixture {
    /// Keeps the directories alive for the duration of the test
    pub temp: TempDir,
    pub docs: PathBuf,
    pub pics: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let base = temp.path().canonicalize().unwrap();
        let docs = base.join("docs");
        let pics = base.join("pics");

        std::fs::create_dir_all(docs.join("Guides")).unwrap();
        std::fs::create_dir_all(docs.join("archive")).unwrap();
        std::fs::create_dir_all(docs.join("empty")).unwrap();
        std::fs::write(docs.join("readme.md"), "# Docs\n").unwrap();
        std::fs::write(docs.join("Notes.txt"), "hello world").unwrap();
        std::fs::write(docs.join("Guides/intro.txt"), "intro").unwrap();
        std::fs::write(docs.join("a b.txt"), "spaced").unwrap();
        std::fs::write(docs.join(".secret"), "dotfile").unwrap();
        std::fs::create_dir_all(&pics).unwrap();
        std::fs::write(pics.join("cat.png"), [0x89, b'P', b'N', b'G']).unwrap();

        Self { temp, docs, pics }
    }

    pub fn base(&self) -> &Path {
        self.docs.parent().unwrap()
    }

    /// Router over `docs` and `pics` with default configuration.
    pub fn app(&self) -> Router {
        self.app_with_config(&Config::default())
    }

    pub fn app_with_config(&self, config: &Config) -> Router {
        let roots = registry::validate([&self.docs, &self.pics]).unwrap();
        fileserv::app(AppState::with_config(roots, config))
    }
}

pub async fn send(app: Router, method: Method, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .method(method)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri).await
}

pub async fn body_string(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
