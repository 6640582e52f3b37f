//! Static report server
//!
//! Serves the reports directory over HTTP. Directory requests render an HTML
//! listing; everything else is handed to `tower_http`'s [`ServeDir`].

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

use crate::listing::{render_listing, ListingOptions};
use crate::types::{RunnerError, RunnerResult};

#[derive(Clone)]
struct ServerState {
    root: Arc<PathBuf>,
    options: Arc<ListingOptions>,
}

/// HTTP server for a directory of generated reports
pub struct ReportServer {
    root: PathBuf,
    options: ListingOptions,
}

impl ReportServer {
    pub fn new(root: impl Into<PathBuf>, options: ListingOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn router(&self) -> Router {
        let state = ServerState {
            root: Arc::new(self.root.clone()),
            options: Arc::new(self.options.clone()),
        };

        Router::new()
            .fallback(serve_report)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Bind `addr` and serve until the process is terminated
    pub async fn serve(self, addr: SocketAddr) -> RunnerResult<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| RunnerError::Server(format!("Failed to bind {}: {}", addr, e)))?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve_on(self, listener: TcpListener) -> RunnerResult<()> {
        let local_addr = listener
            .local_addr()
            .map_err(|e| RunnerError::Server(e.to_string()))?;
        info!(
            "Serving reports from {} on http://{}",
            self.root.display(),
            local_addr
        );

        axum::serve(listener, self.router())
            .await
            .map_err(|e| RunnerError::Server(e.to_string()))
    }
}

async fn serve_report(State(state): State<ServerState>, request: Request) -> Response {
    let raw_path = request.uri().path().to_string();
    let (decoded_path, resolved) = match resolve_request_path(&state.root, &raw_path) {
        Ok(resolved) => resolved,
        Err(status) => return status.into_response(),
    };

    if !resolved.is_dir() {
        return match ServeDir::new(state.root.as_ref()).oneshot(request).await {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        };
    }

    if !raw_path.ends_with('/') {
        let location = match request.uri().query() {
            Some(query) => format!("{}/?{}", raw_path, query),
            None => format!("{}/", raw_path),
        };
        return Redirect::permanent(&location).into_response();
    }

    let options = state.options.clone();
    let listing = tokio::task::spawn_blocking(move || {
        render_listing(&resolved, &decoded_path, &options)
    })
    .await;

    match listing {
        Ok(Ok(html)) => Html(html).into_response(),
        Ok(Err(e)) => {
            warn!("Failed to render directory listing for {}: {}", raw_path, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            warn!("Directory listing task failed for {}: {}", raw_path, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Map a request path onto the reports directory.
///
/// Returns the percent-decoded path alongside the filesystem path. Any `..`
/// segment is rejected so requests cannot escape the root.
pub fn resolve_request_path(root: &Path, uri_path: &str) -> Result<(String, PathBuf), StatusCode> {
    let decoded = urlencoding::decode(uri_path)
        .map_err(|_| StatusCode::BAD_REQUEST)?
        .into_owned();

    let mut resolved = root.to_path_buf();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(StatusCode::BAD_REQUEST),
            s if s.contains('\\') || s.contains('\0') => return Err(StatusCode::BAD_REQUEST),
            s => resolved.push(s),
        }
    }

    Ok((decoded, resolved))
}
