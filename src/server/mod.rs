//! Development server
//!
//! Serves the current bundle over HTTP and pushes live rebuild
//! notifications to connected clients over WebSocket.

mod live;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::compiler::{BuildEvent, BundleHandle, Compiler};
use crate::config::ResolvedConfig;

pub use live::LiveMessage;

/// Shared server state
struct ServerState {
    /// Resolved project configuration
    config: Arc<ResolvedConfig>,

    /// The most recent bundle produced by the compiler
    output: BundleHandle,

    /// Build event channel, subscribed per WebSocket client
    events_tx: broadcast::Sender<BuildEvent>,
}

/// Development server
pub struct DevServer {
    state: Arc<ServerState>,
}

impl DevServer {
    /// Create a server over a compiler's output and event stream
    pub fn new(config: Arc<ResolvedConfig>, compiler: &Compiler) -> Self {
        Self {
            state: Arc::new(ServerState {
                config,
                output: compiler.output(),
                events_tx: compiler.events(),
            }),
        }
    }

    /// Build the request router.
    ///
    /// The bundle is served from the fallback: its name embeds the
    /// unvalidated platform string, which must not reach `Router::route`
    /// (route syntax like `*` would panic there).
    fn router(&self) -> Router {
        Router::new()
            .route("/", get(serve_status))
            .route("/haul/live", get(live::live_websocket))
            .fallback(serve_bundle)
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Serve requests on an already-bound listener until the process exits
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let app = self.router();

        debug!("Server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Report what the server is building
async fn serve_status(State(state): State<Arc<ServerState>>) -> Response {
    Json(json!({
        "name": state.config.name,
        "platform": state.config.platform,
        "dev": state.config.dev,
        "bundle": state.config.bundle_name,
    }))
    .into_response()
}

/// Serve the current bundle; anything but its exact path is a 404
async fn serve_bundle(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    if uri.path().strip_prefix('/') != Some(state.config.bundle_name.as_str()) {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    let output = state.output.read().clone();

    match output {
        Some(bundle) => (
            [
                (
                    header::CONTENT_TYPE,
                    "application/javascript; charset=utf-8".to_string(),
                ),
                (header::ETAG, format!("\"{}\"", bundle.hash)),
            ],
            bundle.code,
        )
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "Bundle is still compiling").into_response(),
    }
}
