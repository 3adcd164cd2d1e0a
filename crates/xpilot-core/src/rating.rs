//! Two-player rating (ELO) engine.
//!
//! Realized outcomes come from the two focus scores only. Each side's delta
//! is rounded on its own, so the two deltas are not guaranteed to cancel.

use serde::{Deserialize, Serialize};

/// Default K-factor (rating volatility).
pub const DEFAULT_K_FACTOR: i64 = 24;

/// Rating assigned to new users.
pub const INITIAL_RATING: i64 = 1200;

/// Ratings never drop below this value.
pub const RATING_FLOOR: i64 = 100;

/// Match outcome from the perspective of one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Outcome for the side that scored `own` against `other`.
    pub fn from_scores(own: f64, other: f64) -> Self {
        if own > other {
            Self::Win
        } else if other > own {
            Self::Loss
        } else {
            Self::Draw
        }
    }

    /// Realized score used by the rating update: 1, 0.5 or 0.
    pub const fn value(self) -> f64 {
        match self {
            Self::Win => 1.0,
            Self::Draw => 0.5,
            Self::Loss => 0.0,
        }
    }

    /// Experience points awarded for this outcome.
    pub const fn xp_award(self) -> i64 {
        match self {
            Self::Win => 30,
            Self::Draw => 20,
            Self::Loss => 10,
        }
    }
}

/// Result of one rating update for sides A and B.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingUpdate {
    pub new_rating_a: i64,
    pub new_rating_b: i64,
    pub delta_a: i64,
    pub delta_b: i64,
    pub outcome_a: Outcome,
    pub outcome_b: Outcome,
}

/// Expected score of A against B.
#[allow(clippy::cast_precision_loss)]
pub fn expected_score(rating_a: i64, rating_b: i64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_b - rating_a) as f64 / 400.0))
}

/// Apply one rating update from two prior ratings and two focus scores.
pub fn update(rating_a: i64, rating_b: i64, score_a: f64, score_b: f64, k: i64) -> RatingUpdate {
    let expected_a = expected_score(rating_a, rating_b);
    let expected_b = 1.0 - expected_a;

    let outcome_a = Outcome::from_scores(score_a, score_b);
    let outcome_b = Outcome::from_scores(score_b, score_a);

    let delta_a = delta(k, outcome_a, expected_a);
    let delta_b = delta(k, outcome_b, expected_b);

    RatingUpdate {
        new_rating_a: (rating_a + delta_a).max(RATING_FLOOR),
        new_rating_b: (rating_b + delta_b).max(RATING_FLOOR),
        delta_a,
        delta_b,
        outcome_a,
        outcome_b,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn delta(k: i64, outcome: Outcome, expected: f64) -> i64 {
    (k as f64 * (outcome.value() - expected)).round_ties_even() as i64
}
