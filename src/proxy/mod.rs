//! Local proxy route for schedule generation
//!
//! Serves `POST /api/generate` on the application's own origin and forwards
//! it to the backend. Other methods get 405; a backend that cannot be
//! reached becomes `500 {"error": "Backend server not available"}`.

pub mod forward;

use std::net::SocketAddr;
use std::time::Duration;

use axum::{Router, routing::post};
use reqwest::Client;
use tokio::net::TcpListener;

use crate::error::{Result, RotaError};

pub use forward::{forward_generate, method_not_allowed};

/// Route path served by the proxy
pub const GENERATE_ROUTE: &str = "/api/generate";

/// Shared handler state
#[derive(Clone)]
pub struct ProxyState {
    pub client: Client,
    /// Backend generate endpoint, e.g. `http://localhost:8000/api/generate`
    pub target: String,
}

impl ProxyState {
    pub fn new(target: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RotaError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            target: target.into(),
        })
    }
}

/// Build the proxy router
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route(GENERATE_ROUTE, post(forward_generate).fallback(method_not_allowed))
        .with_state(state)
}

/// Serve the proxy until the task is dropped
pub async fn serve(bind: SocketAddr, state: ProxyState) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    let local = listener.local_addr()?;
    tracing::info!(addr = %local, target_url = %state.target, "Proxy listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
