//! Centralized constants for the wheel reward engine.
//!
//! Eliminates magic numbers duplicated across sampler, luck and event
//! scoring. Per-module data (achievement definitions, the reference
//! catalogue) stays in its module as the single source of truth.

// =====================================================
// Sampling
// =====================================================

/// Allowed deviation of total probability mass from 1.0.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

// =====================================================
// Luck Rating
// =====================================================

/// Minimum lifetime spins before a player participates in percentile
/// ranking. Below this, small-sample noise dominates the rating.
pub const MIN_SPINS_FOR_PERCENTILE: u64 = 10;

/// Display band thresholds (rating >= threshold).
pub const LUCK_EXCEPTIONAL: f64 = 150.0;
pub const LUCK_LUCKY: f64 = 120.0;
pub const LUCK_AVERAGE: f64 = 100.0;
pub const LUCK_BELOW_AVERAGE: f64 = 80.0;

// =====================================================
// Event Scoring
// =====================================================

/// Rarity -> event points. Monotonically increasing with rarity.
pub const EVENT_POINTS_COMMON: u64 = 1;
pub const EVENT_POINTS_RARE: u64 = 25;
pub const EVENT_POINTS_LEGENDARY: u64 = 100;
pub const EVENT_POINTS_SPECIAL: u64 = 250;
pub const EVENT_POINTS_MYTHIC: u64 = 1000;

/// Divisor in the bonus-spin conversion curve.
pub const BONUS_SPIN_POINT_DIVISOR: f64 = 50.0;

/// Multiplier in the bonus-spin conversion curve.
pub const BONUS_SPIN_CURVE_MULT: f64 = 4.0;

/// Chance that a spin triggers a bonus event instead of a plain draw.
pub const BONUS_EVENT_TRIGGER_CHANCE: f64 = 0.01;

// =====================================================
// Catalogue Cache
// =====================================================

/// Default time-to-live for the cached rarity table, in seconds.
pub const CATALOGUE_TTL_SECS: u64 = 300;

/// Staleness bound: cached data older than this is no longer an acceptable
/// fallback when a refresh fails.
pub const CATALOGUE_STALENESS_BOUND_SECS: u64 = 3600;
