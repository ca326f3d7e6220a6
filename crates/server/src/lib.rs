#![deny(unsafe_code)]
//! HTTP side of folio: serves the resume PDF for the portfolio page.
//!
//! # Endpoint
//! - `GET /api/pdf` reads `<public_dir>/<resume_file>` on every request
//!   - `200` with the bytes, `application/pdf`, shown inline, cached for an hour
//!   - `404` with `PDF file not found` when the file is absent
//!   - `500` with `Error serving PDF` on any other read failure
//! - Other methods get `405` from the router.
//!
//! # Configuration
//! | Variable            | Default      |
//! |---------------------|--------------|
//! | `FOLIO_PORT`        | `3000`       |
//! | `FOLIO_PUBLIC_DIR`  | `public`     |
//! | `FOLIO_RESUME_FILE` | `resume.pdf` |
//!
//! Logging is controlled by `RUST_LOG`.

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use config::Config;
use routes::resume_handler;
use state::State;

pub fn build_router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/pdf", get(resume_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server(config: Config) -> std::io::Result<()> {
    info!(pdf = %config.resume_path().display(), "Starting server...");

    let address = format!("0.0.0.0:{}", config.port);
    let app = build_router(State::new(config));

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install terminate handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
