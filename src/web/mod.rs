//! HTTP surface: generation page, image retrieval and the gallery.

use std::num::NonZeroU16;
use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::get;
use tracing::{error, info};

use crate::config::RelayConfig;
use crate::storage::ImageStore;

mod images;
mod prelude;
mod views;

use images::image_handler;
use views::{gallery_handler, generate_handler};

#[derive(Clone, Debug)]
pub(crate) struct AppState {
    config: Arc<RelayConfig>,
    store: ImageStore,
    client: reqwest::Client,
}

impl AppState {
    fn new(config: RelayConfig, store: ImageStore, client: reqwest::Client) -> Self {
        Self {
            config: Arc::new(config),
            store,
            client,
        }
    }
}

fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(generate_handler))
        .route("/image/{*image_id}", get(image_handler))
        .route("/gallery", get(gallery_handler))
        .route("/static/styles.css", get(styles_handler))
}

async fn styles_handler() -> impl IntoResponse {
    const STYLES: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/styles.css"));
    ([(CONTENT_TYPE, "text/css")], STYLES)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

/// Opens the image store and serves the relay until interrupted.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    config: RelayConfig,
) -> Result<(), anyhow::Error> {
    let store = ImageStore::open(&config.image_dir).await?;
    let client = reqwest::Client::builder().build()?;
    let app = create_router().with_state(AppState::new(config, store, client));

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", err);
    }
    Ok(())
}
