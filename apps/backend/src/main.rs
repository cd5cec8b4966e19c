use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use cosmic_config::{AppConfig, StorageKind};
use cosmic_gallery::{render_index, PageParams};
use cosmic_storage::{Capture, CaptureSource};
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let app_config = AppConfig::from_env()?;
    info!(?app_config, "loaded configuration");

    if app_config.storage_type == StorageKind::Local {
        cosmic_storage::check_date_layout(&app_config.image_dir).await;
    }

    let state = AppState {
        storage: cosmic_storage::from_app_config(&app_config),
        search_debounce_ms: app_config.search_debounce_ms,
    };
    let app = build_router(state, &app_config.image_dir, &app_config.public_dir);

    let addr: SocketAddr = app_config
        .api_addr
        .parse()
        .with_context(|| format!("invalid api address {}", app_config.api_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("astrophotography gallery listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("api server error")?;

    info!("server shut down");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cosmic_storage=debug"));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_max_level(Level::TRACE)
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {err}");
    }
}

#[derive(Clone)]
struct AppState {
    storage: Arc<dyn CaptureSource>,
    search_debounce_ms: u64,
}

fn build_router(state: AppState, image_dir: &Path, public_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(|| async { StatusCode::OK }))
        .route("/", get(index))
        .route("/api/captures", get(list_captures))
        .nest_service("/images", ServeDir::new(image_dir))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Full listing, recomputed from storage on every request.
async fn list_captures(State(state): State<AppState>) -> Json<Vec<Capture>> {
    Json(state.storage.list_captures().await)
}

/// Page shell; query parameters only seed the initial control state.
async fn index(State(state): State<AppState>, Query(params): Query<PageParams>) -> Html<String> {
    Html(render_index(&params.resolve(), state.search_debounce_ms))
}
