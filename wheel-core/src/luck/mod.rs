//! Luck rating: population-normalized rare-pull frequency.
//!
//! `rating = 100 * player_rare_rate / population_average_rare_rate`, so 100
//! is exactly average. Zero-spin players have no rating at all (never NaN,
//! never infinity); presentation shows "Calculating...". Percentile ranking
//! excludes players below a minimum spin count so small-sample noise does
//! not dominate.

use serde::{Deserialize, Serialize};

use crate::collection::PlayerStats;
use crate::constants::{
    LUCK_AVERAGE, LUCK_BELOW_AVERAGE, LUCK_EXCEPTIONAL, LUCK_LUCKY, MIN_SPINS_FOR_PERCENTILE,
};

/// Display band for a rating. Presentation sugar, not part of the numeric
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LuckBand {
    Exceptional,
    Lucky,
    Average,
    BelowAverage,
    Unlucky,
}

impl LuckBand {
    pub fn from_rating(rating: f64) -> Self {
        if rating >= LUCK_EXCEPTIONAL {
            LuckBand::Exceptional
        } else if rating >= LUCK_LUCKY {
            LuckBand::Lucky
        } else if rating >= LUCK_AVERAGE {
            LuckBand::Average
        } else if rating >= LUCK_BELOW_AVERAGE {
            LuckBand::BelowAverage
        } else {
            LuckBand::Unlucky
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LuckBand::Exceptional => "Exceptional",
            LuckBand::Lucky => "Lucky",
            LuckBand::Average => "Average",
            LuckBand::BelowAverage => "Below Average",
            LuckBand::Unlucky => "Unlucky",
        }
    }
}

/// Computed luck report for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LuckReport {
    pub rating: f64,
    pub band: LuckBand,
    /// Present only when the player meets [`MIN_SPINS_FOR_PERCENTILE`].
    pub percentile: Option<f64>,
}

/// Rare pulls per spin. `None` when the player has no spins.
pub fn rare_rate(stats: &PlayerStats) -> Option<f64> {
    if stats.total_spins == 0 {
        return None;
    }
    Some(stats.rare_pulls() as f64 / stats.total_spins as f64)
}

/// Mean rare rate over all players with at least one spin.
pub fn population_average_rate(population: &[PlayerStats]) -> Option<f64> {
    let rates: Vec<f64> = population.iter().filter_map(rare_rate).collect();
    if rates.is_empty() {
        return None;
    }
    Some(rates.iter().sum::<f64>() / rates.len() as f64)
}

/// Normalized rating. `None` when the player has no spins or the population
/// average is zero/undefined (no division by zero, ever).
pub fn luck_rating(player: &PlayerStats, population: &[PlayerStats]) -> Option<f64> {
    let player_rate = rare_rate(player)?;
    let avg = population_average_rate(population)?;
    if avg <= 0.0 {
        return None;
    }
    Some(100.0 * player_rate / avg)
}

/// Full report: rating, band, and percentile among qualified players.
pub fn luck_report(player: &PlayerStats, population: &[PlayerStats]) -> Option<LuckReport> {
    let rating = luck_rating(player, population)?;
    let percentile = if player.total_spins >= MIN_SPINS_FOR_PERCENTILE {
        percentile_among_qualified(rating, population)
    } else {
        None
    };
    Some(LuckReport {
        rating,
        band: LuckBand::from_rating(rating),
        percentile,
    })
}

fn percentile_among_qualified(rating: f64, population: &[PlayerStats]) -> Option<f64> {
    let qualified: Vec<f64> = population
        .iter()
        .filter(|s| s.total_spins >= MIN_SPINS_FOR_PERCENTILE)
        .filter_map(|s| luck_rating(s, population))
        .collect();
    if qualified.is_empty() {
        return None;
    }
    let at_or_below = qualified.iter().filter(|r| **r <= rating).count();
    Some(100.0 * at_or_below as f64 / qualified.len() as f64)
}
