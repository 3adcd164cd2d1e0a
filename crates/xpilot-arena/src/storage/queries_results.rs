//! Match ledger queries.

use std::collections::HashMap;

use sqlx::{Executor, Sqlite};

use super::db::{ArenaDatabase, DatabaseError};
use super::models::MatchResult;
use crate::arena::ChallengeStatus;

/// Append the result of a settled challenge.
///
/// `challenge_id` is UNIQUE, so a second insert for the same challenge fails.
pub(crate) async fn insert_match_result<'e, E>(
    executor: E,
    result: &MatchResult,
) -> Result<(), DatabaseError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO match_results (id, challenge_id, winner_id, focus_score_a, focus_score_b, \
         xp_awarded, elo_change_a, elo_change_b, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&result.id)
    .bind(&result.challenge_id)
    .bind(&result.winner_id)
    .bind(result.focus_score_a)
    .bind(result.focus_score_b)
    .bind(result.xp_awarded)
    .bind(result.elo_change_a)
    .bind(result.elo_change_b)
    .bind(result.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Number of match results won, keyed by winner.
pub(crate) async fn win_counts<'e, E>(executor: E) -> Result<HashMap<String, i64>, DatabaseError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT winner_id, COUNT(*) FROM match_results \
         WHERE winner_id IS NOT NULL GROUP BY winner_id",
    )
    .fetch_all(executor)
    .await?;
    Ok(rows.into_iter().collect())
}

/// Number of finished challenges per participant, either side.
pub(crate) async fn finished_counts<'e, E>(
    executor: E,
) -> Result<HashMap<String, i64>, DatabaseError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT user_id, COUNT(*) FROM ( \
             SELECT challenger_id AS user_id FROM challenges WHERE status = ?1 \
             UNION ALL \
             SELECT opponent_id AS user_id FROM challenges WHERE status = ?1 \
         ) GROUP BY user_id",
    )
    .bind(ChallengeStatus::Finished)
    .fetch_all(executor)
    .await?;
    Ok(rows.into_iter().collect())
}

impl ArenaDatabase {
    /// Get the result recorded for a challenge.
    pub async fn get_match_result(&self, challenge_id: &str) -> Result<MatchResult, DatabaseError> {
        sqlx::query_as::<_, MatchResult>("SELECT * FROM match_results WHERE challenge_id = ?")
            .bind(challenge_id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Match result for {challenge_id}")))
    }
}
