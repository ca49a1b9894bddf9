//! EventService — competitive event window, standings, point conversion.
//!
//! Endpoints:
//! - POST /wheel.EventService/GetStatus
//! - POST /wheel.EventService/GetLeaderboard
//! - POST /wheel.EventService/ConvertPoints
//! - POST /wheel.EventService/ScheduleEvent

use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use wheel_core::events::{
    convert_points_to_bonus_spins, EventKind, EventPhase, EventStanding, EventWindow,
};
use wheel_core::WheelError;

use super::ApiState;
use crate::error::ApiResult;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/wheel.EventService/GetStatus", post(get_status))
        .route(
            "/wheel.EventService/GetLeaderboard",
            post(get_leaderboard),
        )
        .route(
            "/wheel.EventService/ConvertPoints",
            post(convert_points),
        )
        .route(
            "/wheel.EventService/ScheduleEvent",
            post(schedule_event),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct EventStatusResponse {
    pub phase: EventPhase,
    pub kind: Option<EventKind>,
    pub activates_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct EventLeaderboardResponse {
    pub standings: Vec<EventStanding>,
}

#[derive(Deserialize)]
pub struct ConvertPointsRequest {
    pub points: u64,
}

#[derive(Serialize)]
pub struct ConvertPointsResponse {
    pub points: u64,
    pub bonus_spins: u64,
}

#[derive(Deserialize)]
pub struct ScheduleEventRequest {
    pub kind: EventKind,
    pub activates_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ScheduleEventResponse {
    pub phase: EventPhase,
}

// ============================================================================
// Handlers
// ============================================================================

/// The phase is derived from the broadcast timestamps at request time, so
/// every caller computes the same answer without coordination.
async fn get_status(State(state): State<ApiState>) -> ApiResult<Json<EventStatusResponse>> {
    let now = Utc::now();
    let response = match state.events.window().await? {
        Some(window) => EventStatusResponse {
            phase: window.phase(now),
            kind: Some(window.kind),
            activates_at: window.activates_at,
            expires_at: Some(window.expires_at),
        },
        None => EventStatusResponse {
            phase: EventPhase::Inactive,
            kind: None,
            activates_at: None,
            expires_at: None,
        },
    };
    Ok(Json(response))
}

async fn get_leaderboard(
    State(state): State<ApiState>,
) -> ApiResult<Json<EventLeaderboardResponse>> {
    let standings = state.events.standings().await?;
    Ok(Json(EventLeaderboardResponse { standings }))
}

async fn convert_points(
    Json(req): Json<ConvertPointsRequest>,
) -> ApiResult<Json<ConvertPointsResponse>> {
    Ok(Json(ConvertPointsResponse {
        points: req.points,
        bonus_spins: convert_points_to_bonus_spins(req.points),
    }))
}

/// Admin endpoint: broadcast a new window. Replacing the window resets the
/// event-scoped scoreboard.
async fn schedule_event(
    State(state): State<ApiState>,
    Json(req): Json<ScheduleEventRequest>,
) -> ApiResult<Json<ScheduleEventResponse>> {
    if let Some(at) = req.activates_at {
        if at >= req.expires_at {
            return Err(WheelError::Configuration(format!(
                "event window activates at {} but expires at {}",
                at, req.expires_at
            ))
            .into());
        }
    }

    let window = EventWindow {
        kind: req.kind,
        activates_at: req.activates_at,
        expires_at: req.expires_at,
    };
    state.events.set_window(Some(window)).await?;

    let phase = window.phase(Utc::now());
    info!(?phase, expires_at = %req.expires_at, "event window scheduled");
    Ok(Json(ScheduleEventResponse { phase }))
}
