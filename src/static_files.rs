//! Static file serving for every non-API path.
//!
//! Thin wrapper around [`ServeDir`]: `GET` and `HEAD` are served from
//! the configured root (directories resolve to `index.html`), anything
//! else is a 404. The active config file is never served, even when it
//! sits inside the root, since it may hold API keys.

use std::convert::Infallible;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// Serve `request` from `root`. `hidden` is the canonical path of a
/// file that must answer 404 regardless of where it lives.
pub async fn serve(root: &Path, hidden: Option<&Path>, request: Request) -> Response {
    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        tracing::debug!(
            method = %request.method(),
            path = %request.uri().path(),
            "non-GET request for static path"
        );
        return (StatusCode::NOT_FOUND, "Endpoint not found").into_response();
    }

    if let Some(hidden) = hidden {
        if resolves_to(root, request.uri().path(), hidden).await {
            tracing::warn!(path = %request.uri().path(), "refused to serve the config file");
            return StatusCode::NOT_FOUND.into_response();
        }
    }

    let result: Result<_, Infallible> = ServeDir::new(root).oneshot(request).await;
    match result {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

/// Whether `uri_path` under `root` names the same file as `target`
/// once percent-escapes, `.` segments and symlinks are resolved.
async fn resolves_to(root: &Path, uri_path: &str, target: &Path) -> bool {
    let Ok(decoded) = urlencoding::decode(uri_path) else {
        return false;
    };
    let relative: PathBuf = decoded
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    match tokio::fs::canonicalize(root.join(relative)).await {
        Ok(resolved) => resolved == target,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn serves_index_for_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>transit</h1>").unwrap();

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = serve(dir.path(), None, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<h1>transit</h1>");
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .uri("/nope.js")
            .body(Body::empty())
            .unwrap();
        let response = serve(dir.path(), None, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn hidden_file_is_404_under_any_spelling() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("transit-relay.yaml");
        std::fs::write(&config, "upstreams:\n  tomtom:\n    api_key: tt-secret\n").unwrap();
        std::fs::create_dir(dir.path().join("js")).unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
        let hidden = std::fs::canonicalize(&config).unwrap();

        for uri in [
            "/transit-relay.yaml",
            "/transit%2Drelay.yaml",
            "/./transit-relay.yaml",
            "/js/../transit-relay.yaml",
        ] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = serve(dir.path(), Some(&hidden), request).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
            assert!(!body_text(response).await.contains("tt-secret"), "{uri}");
        }

        let request = Request::builder().uri("/app.js").body(Body::empty()).unwrap();
        let response = serve(dir.path(), Some(&hidden), request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_to_hidden_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("relay.toml");
        std::fs::write(&config, "[upstreams.weather]\napi_key = \"owm\"\n").unwrap();
        std::os::unix::fs::symlink(&config, dir.path().join("notes.txt")).unwrap();
        let hidden = std::fs::canonicalize(&config).unwrap();

        let request = Request::builder().uri("/notes.txt").body(Body::empty()).unwrap();
        let response = serve(dir.path(), Some(&hidden), request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn post_to_static_path_is_404() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/app.js")
            .body(Body::empty())
            .unwrap();
        let response = serve(dir.path(), None, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
