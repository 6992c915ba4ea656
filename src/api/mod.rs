//! HTTP boundary.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | POST | /api/authenticate | `authenticate` |
//! | POST | /api/bank-transfer | `bank_transfer` |
//! | GET | /api/users | `list_users` |

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::Engine;

pub mod dto;
pub mod error;
pub mod handlers;

/// Shared state of every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub expose_pins: bool,
}

impl AppState {
    pub fn new(engine: Arc<Engine>, expose_pins: bool) -> Self {
        Self {
            engine,
            expose_pins,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/authenticate", post(handlers::authenticate))
        .route("/api/bank-transfer", post(handlers::bank_transfer))
        .route("/api/users", get(handlers::list_users))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    if state.expose_pins {
        warn!("GET /api/users exposes account PINs");
    }

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
