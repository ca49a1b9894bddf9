//! SpinService — the wheel itself.
//!
//! Endpoints:
//! - POST /wheel.SpinService/Spin
//! - POST /wheel.SpinService/SimulateContainer

use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;
use wheel_core::achievements;
use wheel_core::constants::BONUS_EVENT_TRIGGER_CHANCE;
use wheel_core::events::BonusEvent;
use wheel_core::rarity::Tier;
use wheel_core::sampler::{self, LootEntry, LootPool};

use super::ApiState;
use crate::error::ApiResult;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/wheel.SpinService/Spin", post(spin))
        .route(
            "/wheel.SpinService/SimulateContainer",
            post(simulate_container),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct SpinRequest {
    pub player: String,
}

#[derive(Serialize)]
pub struct BonusEventInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub granted_spins: u64,
}

#[derive(Serialize)]
pub struct SpinResponse {
    pub entity_id: String,
    pub entity_name: String,
    pub tier: Tier,
    pub was_new: bool,
    pub new_count: u64,
    /// Present when this spin triggered a bonus event.
    pub bonus_event: Option<BonusEventInfo>,
    /// Points awarded by the active competitive event, when one is running.
    pub event_points: Option<u64>,
    /// Achievement ids newly unlocked by this spin.
    pub unlocked: Vec<String>,
}

#[derive(Deserialize)]
pub struct SimulateContainerRequest {
    pub entries: Vec<LootEntry>,
    pub rolls_min: u32,
    pub rolls_max: u32,
}

#[derive(Serialize)]
pub struct SimulateContainerResponse {
    pub results: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// One spin: draw, commit to the ledger, score the active event, evaluate
/// achievements. The RNG work is scoped before the first await so the
/// handler future stays `Send`.
async fn spin(
    State(state): State<ApiState>,
    Json(req): Json<SpinRequest>,
) -> ApiResult<Json<SpinResponse>> {
    let table = state.catalogue.get().await?;

    let (entity_id, entity_name, tier, bonus) = {
        let mut rng = rand::thread_rng();
        let bonus = if rng.gen::<f64>() < BONUS_EVENT_TRIGGER_CHANCE {
            Some(BonusEvent::pick(&mut rng))
        } else {
            None
        };
        let entity = match bonus {
            Some(BonusEvent::LuckySpin) => sampler::draw_uniform(&table, &mut rng),
            _ => sampler::draw(&table, &mut rng),
        };
        (entity.id.clone(), entity.name.clone(), entity.tier, bonus)
    };

    let now = Utc::now();
    let outcome = state
        .ledger
        .record_draw(&table, &req.player, &entity_id, now)
        .await?;

    if bonus.is_some() {
        state.ledger.record_event_trigger(&req.player).await?;
    }

    let event_points = state.events.record_event_draw(&req.player, tier, now).await?;

    let stats = state.ledger.stats(&req.player).await?;
    let already = state.achievements.unlocked(&req.player).await?;
    let facts = achievements::new_unlocks(&stats, &already, now);
    state.achievements.persist_unlocks(&req.player, &facts).await?;

    info!(
        player = %req.player,
        entity = %entity_id,
        tier = tier.as_str(),
        was_new = outcome.was_new,
        "spin"
    );

    Ok(Json(SpinResponse {
        entity_id,
        entity_name,
        tier,
        was_new: outcome.was_new,
        new_count: outcome.new_count,
        bonus_event: bonus.map(|b| BonusEventInfo {
            id: b.id(),
            name: b.name(),
            description: b.description(),
            granted_spins: b.granted_spins(),
        }),
        event_points,
        unlocked: facts.into_iter().map(|f| f.id).collect(),
    }))
}

/// Ephemeral container simulation. Never touches the ledger.
async fn simulate_container(
    Json(req): Json<SimulateContainerRequest>,
) -> ApiResult<Json<SimulateContainerResponse>> {
    let pool = LootPool::new(req.entries, req.rolls_min, req.rolls_max)?;
    let results = {
        let mut rng = rand::thread_rng();
        pool.simulate(&mut rng)
    };
    Ok(Json(SimulateContainerResponse { results }))
}
