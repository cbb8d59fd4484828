//! Feasibility scoring.
//!
//! Market potential raises feasibility; technical complexity and resource
//! requirements lower it, so the latter two are inverted before averaging.

use crate::constants::{NEUTRAL_SCORE, SCORE_MAX, SCORE_MIN};

/// Turns three sub-scores into one normalized feasibility score.
pub struct FeasibilityScorer;

impl FeasibilityScorer {
    /// `(market + (10 - technical) + (10 - resource)) / 3`, every input and the
    /// result clamped to `[0, 10]`.
    pub fn score(market: f64, technical: f64, resource: f64) -> f64 {
        let market = clamp_score(market);
        let technical = clamp_score(technical);
        let resource = clamp_score(resource);
        let raw = (market + (SCORE_MAX - technical) + (SCORE_MAX - resource)) / 3.0;
        clamp_score(raw)
    }
}

/// Clamp a sub-score into `[0, 10]`. Non-finite values become neutral.
pub fn clamp_score(value: f64) -> f64 {
    if !value.is_finite() {
        return NEUTRAL_SCORE;
    }
    value.clamp(SCORE_MIN, SCORE_MAX)
}
