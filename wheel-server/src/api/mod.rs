//! HTTP/JSON API layer.
//!
//! REST-like endpoints following gRPC path conventions; the site frontend
//! calls them via JSON-over-HTTP.
//!
//! ## Endpoint Convention
//! All endpoints follow the path pattern `POST /wheel.<Service>/<Method>`.
//! Example: `POST /wheel.SpinService/Spin`

pub mod collection;
pub mod events;
pub mod spin;
pub mod stats;

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::catalogue::CatalogueCache;
use crate::storage::repository::{AchievementRepo, EventRepo, LedgerRepo};

/// Shared state available to all API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub ledger: Arc<dyn LedgerRepo>,
    pub achievements: Arc<dyn AchievementRepo>,
    pub events: Arc<dyn EventRepo>,
    pub catalogue: Arc<CatalogueCache>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the full API router with all service endpoints.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(spin::routes())
        .merge(collection::routes())
        .merge(stats::routes())
        .merge(events::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP API server on the given port.
pub async fn start_api_server(state: ApiState, port: u16) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for shutdown signal");
            }
            info!("shutting down");
        })
        .await?;
    Ok(())
}
