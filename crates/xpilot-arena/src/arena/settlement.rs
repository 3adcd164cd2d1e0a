//! Settlement math for a finished challenge.
//!
//! Side A is always the challenger, side B the opponent.

use serde::Serialize;
use xpilot_core::rating::{self, Outcome, RatingUpdate};
use xpilot_core::scoring::{focus_score, synchronized_elapsed_minutes};

use super::status::Side;
use crate::storage::Challenge;

/// Everything a settlement writes, computed before any write happens.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementPlan {
    /// Shared elapsed time, capped at the declared duration.
    pub elapsed_minutes: f64,
    pub focus_score_a: f64,
    pub focus_score_b: f64,
    pub rating: RatingUpdate,
    pub xp_a: i64,
    pub xp_b: i64,
    /// Strictly higher focus score wins; `None` is a draw.
    pub winner: Option<Side>,
}

impl SettlementPlan {
    pub fn compute(
        challenge: &Challenge,
        start_time: i64,
        end_time: i64,
        rating_a: i64,
        rating_b: i64,
        k_factor: i64,
    ) -> Self {
        let elapsed_minutes =
            synchronized_elapsed_minutes(start_time, end_time, challenge.duration_minutes);

        let focus_score_a = focus_score(elapsed_minutes, true, pauses(challenge.challenger_pauses));
        let focus_score_b = focus_score(elapsed_minutes, true, pauses(challenge.opponent_pauses));

        let rating = rating::update(rating_a, rating_b, focus_score_a, focus_score_b, k_factor);

        let winner = if focus_score_a > focus_score_b {
            Some(Side::Challenger)
        } else if focus_score_b > focus_score_a {
            Some(Side::Opponent)
        } else {
            None
        };

        Self {
            elapsed_minutes,
            focus_score_a,
            focus_score_b,
            xp_a: rating.outcome_a.xp_award(),
            xp_b: rating.outcome_b.xp_award(),
            rating,
            winner,
        }
    }

    pub fn winner_id<'a>(&self, challenge: &'a Challenge) -> Option<&'a str> {
        self.winner.map(|side| match side {
            Side::Challenger => challenge.challenger_id.as_str(),
            Side::Opponent => challenge.opponent_id.as_str(),
        })
    }

    /// Combined XP handed out to both sides.
    pub const fn xp_total(&self) -> i64 {
        self.xp_a + self.xp_b
    }

    /// The settlement as seen by one participant.
    pub fn verdict_for(&self, side: Side, winner_id: Option<String>) -> SettlementVerdict {
        let (verdict, new_elo, xp_awarded) = match side {
            Side::Challenger => (
                self.rating.outcome_a,
                self.rating.new_rating_a,
                self.xp_a,
            ),
            Side::Opponent => (
                self.rating.outcome_b,
                self.rating.new_rating_b,
                self.xp_b,
            ),
        };

        SettlementVerdict {
            verdict,
            winner_id,
            focus_score_a: self.focus_score_a,
            focus_score_b: self.focus_score_b,
            elo_change_a: self.rating.delta_a,
            elo_change_b: self.rating.delta_b,
            new_elo,
            xp_awarded,
        }
    }
}

/// Settlement response for the participant who triggered it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementVerdict {
    pub verdict: Outcome,
    pub winner_id: Option<String>,
    pub focus_score_a: f64,
    pub focus_score_b: f64,
    pub elo_change_a: i64,
    pub elo_change_b: i64,
    pub new_elo: i64,
    pub xp_awarded: i64,
}

fn pauses(count: i64) -> u32 {
    u32::try_from(count.max(0)).unwrap_or(u32::MAX)
}
