//! HTTP surface
//!
//! Every engine call runs inside the request that triggered it. There is no
//! queue and no concurrency limit: each in-flight download holds its request
//! open until the engine exits.

pub mod dto;
pub mod error;
mod handlers;

pub use error::ApiError;

use crate::config::ServerConfig;
use crate::core::Downloader;
use crate::engine::{Extractor, YtDlp};
use crate::storage::FileStore;
use anyhow::Context;
use axum::{
    http::Request,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Shared, immutable handler state
pub struct AppState {
    pub downloader: Downloader,
    pub store: FileStore,
    /// Delay before a single video download is removed
    pub cleanup_delay: Duration,
}

impl AppState {
    /// Wire a downloader and a store sharing the same root
    pub fn new(engine: Arc<dyn Extractor>, store: FileStore, cleanup_delay: Duration) -> Self {
        let downloader = Downloader::new(engine).with_output_path(store.root());
        Self {
            downloader,
            store,
            cleanup_delay,
        }
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        tracing::info_span!(
            "http.request",
            method = %request.method(),
            route = %request.uri().path(),
        )
    });

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/video/info", post(handlers::video_info))
        .route("/video/download", post(handlers::download_video))
        .route("/playlist/download", post(handlers::download_playlist))
        .route("/download/{filename}", get(handlers::download_file))
        .route("/files", get(handlers::list_files))
        .route("/files/{filename}", delete(handlers::delete_file))
        .layer(cors_layer)
        .layer(trace_layer)
        .with_state(state)
}

/// Run the HTTP server until ctrl-c
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let store = FileStore::open(&config.downloads_dir).with_context(|| {
        format!(
            "failed to create downloads directory {}",
            config.downloads_dir.display()
        )
    })?;
    let engine = YtDlp::new()
        .with_program(config.ytdlp_path.clone())
        .with_timeout(config.engine_timeout);
    let state = Arc::new(AppState::new(
        Arc::new(engine),
        store,
        config.cleanup_delay,
    ));

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!(
        "Listening on http://{} (downloads in {}, cleanup after {})",
        listener.local_addr()?,
        config.downloads_dir.display(),
        humantime::format_duration(config.cleanup_delay)
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("server error")?;
    Ok(())
}
