//! CollectionService — per-player collection reads.
//!
//! Endpoints:
//! - POST /wheel.CollectionService/GetCollection
//! - POST /wheel.CollectionService/GetCompletion

use std::collections::HashMap;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use wheel_core::rarity::Tier;

use super::ApiState;
use crate::error::ApiResult;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/wheel.CollectionService/GetCollection",
            post(get_collection),
        )
        .route(
            "/wheel.CollectionService/GetCompletion",
            post(get_completion),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct CollectionRequest {
    pub player: String,
}

#[derive(Serialize)]
pub struct CollectionResponse {
    pub player: String,
    /// entity id -> times drawn.
    pub counts: HashMap<String, u64>,
}

#[derive(Deserialize)]
pub struct CompletionRequest {
    pub player: String,
    pub tier: Tier,
}

#[derive(Serialize)]
pub struct CompletionResponse {
    pub collected: usize,
    pub total: usize,
    /// Rounded to one decimal for display; `collected`/`total` stay exact.
    pub percent: f64,
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_collection(
    State(state): State<ApiState>,
    Json(req): Json<CollectionRequest>,
) -> ApiResult<Json<CollectionResponse>> {
    let counts = state.ledger.collection(&req.player).await?;
    Ok(Json(CollectionResponse {
        player: req.player,
        counts,
    }))
}

async fn get_completion(
    State(state): State<ApiState>,
    Json(req): Json<CompletionRequest>,
) -> ApiResult<Json<CompletionResponse>> {
    let table = state.catalogue.get().await?;
    let completion = state.ledger.completion(&table, &req.player, req.tier).await?;
    Ok(Json(CompletionResponse {
        collected: completion.collected,
        total: completion.total,
        percent: completion.percent_display(),
    }))
}
