//! StatsService — luck ratings, achievements, leaderboards.
//!
//! Endpoints:
//! - POST /wheel.StatsService/GetLuckRating
//! - POST /wheel.StatsService/GetAchievements
//! - POST /wheel.StatsService/GetLeaderboard

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use wheel_core::achievements::{self, AchievementView};
use wheel_core::leaderboard::{self, LeaderboardEntry, SortKey};
use wheel_core::luck;

use super::ApiState;
use crate::error::ApiResult;

const DEFAULT_LEADERBOARD_LIMIT: usize = 100;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/wheel.StatsService/GetLuckRating", post(get_luck_rating))
        .route(
            "/wheel.StatsService/GetAchievements",
            post(get_achievements),
        )
        .route(
            "/wheel.StatsService/GetLeaderboard",
            post(get_leaderboard),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LuckRatingRequest {
    pub player: String,
}

#[derive(Serialize)]
pub struct LuckRatingResponse {
    pub rating: Option<f64>,
    pub band: Option<&'static str>,
    pub percentile: Option<f64>,
    /// What the profile shows; "Calculating..." until a rating exists.
    pub display: String,
}

#[derive(Deserialize)]
pub struct AchievementsRequest {
    pub player: String,
    /// Who is looking. Defaults to the profile owner (own-profile view).
    pub viewer: Option<String>,
}

#[derive(Serialize)]
pub struct AchievementsResponse {
    pub player: String,
    pub achievements: Vec<AchievementView>,
}

#[derive(Deserialize)]
pub struct LeaderboardRequest {
    pub sort: SortKey,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub sort: SortKey,
    pub entries: Vec<LeaderboardEntry>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_luck_rating(
    State(state): State<ApiState>,
    Json(req): Json<LuckRatingRequest>,
) -> ApiResult<Json<LuckRatingResponse>> {
    let stats = state.ledger.stats(&req.player).await?;
    let population: Vec<_> = state
        .ledger
        .all_stats()
        .await?
        .into_iter()
        .map(|(_, s)| s)
        .collect();

    let response = match luck::luck_report(&stats, &population) {
        Some(report) => LuckRatingResponse {
            rating: Some(report.rating),
            band: Some(report.band.label()),
            percentile: report.percentile,
            display: report.band.label().to_string(),
        },
        None => LuckRatingResponse {
            rating: None,
            band: None,
            percentile: None,
            display: "Calculating...".to_string(),
        },
    };
    Ok(Json(response))
}

/// Achievements as the viewer is allowed to see them. Hidden achievements
/// the owner has not unlocked are absent; hidden ones the owner has
/// unlocked render as a generic placeholder unless the viewer earned them.
async fn get_achievements(
    State(state): State<ApiState>,
    Json(req): Json<AchievementsRequest>,
) -> ApiResult<Json<AchievementsResponse>> {
    let stats = state.ledger.stats(&req.player).await?;
    let owner_unlocked = state.achievements.unlocked(&req.player).await?;
    let viewer_unlocked = match &req.viewer {
        Some(viewer) if viewer != &req.player => state.achievements.unlocked(viewer).await?,
        _ => owner_unlocked.clone(),
    };

    let views = achievements::standard_achievements()
        .iter()
        .filter_map(|def| {
            achievements::view_for(
                def,
                &stats,
                owner_unlocked.contains(def.id),
                viewer_unlocked.contains(def.id),
            )
        })
        .collect();

    Ok(Json(AchievementsResponse {
        player: req.player,
        achievements: views,
    }))
}

async fn get_leaderboard(
    State(state): State<ApiState>,
    Json(req): Json<LeaderboardRequest>,
) -> ApiResult<Json<LeaderboardResponse>> {
    let entries: Vec<LeaderboardEntry> = state
        .ledger
        .all_stats()
        .await?
        .iter()
        .map(|(player, stats)| LeaderboardEntry::from_stats(player, stats))
        .collect();

    let mut ranked = leaderboard::rank(entries, req.sort);
    ranked.truncate(req.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT));

    Ok(Json(LeaderboardResponse {
        sort: req.sort,
        entries: ranked,
    }))
}
