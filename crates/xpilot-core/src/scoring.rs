//! Focus score computation.
//!
//! A focus score rewards engaged time and task completion and charges a
//! fixed cost for every pause/blur event reported during a match. Scores are
//! clamped at zero and rounded to two decimal places.

/// Points per engaged minute.
pub const POINTS_PER_MINUTE: f64 = 0.5;

/// Flat bonus for a completed task.
pub const COMPLETION_BONUS: f64 = 30.0;

/// Penalty per recorded pause/blur event.
pub const PAUSE_PENALTY: f64 = 5.0;

/// Compute the focus score for one participant.
///
/// `elapsed_minutes` must already be capped at the match's declared
/// duration; see [`synchronized_elapsed_minutes`].
pub fn focus_score(elapsed_minutes: f64, completed: bool, pause_count: u32) -> f64 {
    let bonus = if completed { COMPLETION_BONUS } else { 0.0 };
    let raw = elapsed_minutes.mul_add(POINTS_PER_MINUTE, bonus)
        - f64::from(pause_count) * PAUSE_PENALTY;
    round_2dp(raw).max(0.0)
}

/// Elapsed match time in minutes shared by both participants.
///
/// Measured from the server-recorded start to the settlement instant and
/// capped at `duration_minutes`. A clock that moved backwards yields zero.
#[allow(clippy::cast_precision_loss)]
pub fn synchronized_elapsed_minutes(start_time: i64, end_time: i64, duration_minutes: i64) -> f64 {
    let elapsed = (end_time - start_time).max(0) as f64 / 60.0;
    elapsed.min(duration_minutes as f64)
}

/// Round to two decimals from the exact binary value, so `30.075` (stored
/// just below the tie) becomes `30.07`.
fn round_2dp(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_hour_without_pauses() {
        assert!((focus_score(60.0, true, 0) - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pauses_cost_five_points_each() {
        assert!((focus_score(60.0, true, 4) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn heavy_distraction_clamps_to_zero() {
        // 10 * 0.5 + 30 - 50 = -15
        assert!(focus_score(10.0, true, 10).abs() < f64::EPSILON);
        assert!(focus_score(0.0, false, 100).abs() < f64::EPSILON);
    }

    #[test]
    fn never_negative() {
        for elapsed in [0.0, 0.5, 7.25, 45.0, 120.0] {
            for pauses in [0, 1, 5, 20, 1000] {
                for completed in [true, false] {
                    assert!(focus_score(elapsed, completed, pauses) >= 0.0);
                }
            }
        }
    }

    #[test]
    fn incomplete_task_gets_no_bonus() {
        assert!((focus_score(20.0, false, 0) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rounds_to_two_decimals() {
        // 1/3 minute * 0.5 = 0.1666..
        let score = focus_score(1.0 / 3.0, false, 0);
        assert!((score - 0.17).abs() < 1e-9);
    }

    #[test]
    fn decimal_ties_follow_the_stored_value() {
        // 9 s: 30 + 0.075, stored as 30.07499..
        let nine = focus_score(synchronized_elapsed_minutes(0, 9, 45), true, 0);
        assert!((nine - 30.07).abs() < 1e-9);

        // 27 s: 30 + 0.225, stored as 30.22500..01
        let twenty_seven = focus_score(synchronized_elapsed_minutes(0, 27, 45), true, 0);
        assert!((twenty_seven - 30.23).abs() < 1e-9);
    }

    #[test]
    fn elapsed_is_capped_at_declared_duration() {
        let start = 1_000;
        let end = start + 50 * 60;
        assert!((synchronized_elapsed_minutes(start, end, 45) - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn elapsed_under_duration_is_fractional() {
        let start = 1_000;
        let end = start + 90;
        assert!((synchronized_elapsed_minutes(start, end, 45) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn elapsed_never_negative() {
        assert!(synchronized_elapsed_minutes(2_000, 1_000, 45).abs() < f64::EPSILON);
    }
}
