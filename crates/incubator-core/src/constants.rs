/// Incubator system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lower bound of every feasibility sub-score and of the derived score.
pub const SCORE_MIN: f64 = 0.0;

/// Upper bound of every feasibility sub-score and of the derived score.
pub const SCORE_MAX: f64 = 10.0;

/// Sub-score assigned to a concept before it is enhanced.
pub const NEUTRAL_SCORE: f64 = 5.0;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Minimum description length in characters.
pub const DESCRIPTION_MIN_CHARS: usize = 10;

/// Maximum description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

/// First generation version assigned to a concept's insights.
pub const FIRST_GENERATION_VERSION: u32 = 1;
