//! Challenge queries.
//!
//! Every state change is a single conditional UPDATE guarded by the
//! expected current status, so concurrent callers cannot both apply it.

use sqlx::{Executor, Sqlite};

use super::db::{ArenaDatabase, DatabaseError};
use super::models::{Challenge, ChallengeWithNames};
use crate::arena::{ChallengeStatus, Side, Transition};

const SELECT_WITH_NAMES: &str = "SELECT c.*, uc.name AS challenger_name, uo.name AS opponent_name \
     FROM challenges c \
     JOIN users uc ON uc.id = c.challenger_id \
     JOIN users uo ON uo.id = c.opponent_id";

/// Parameters for inserting a new pending challenge.
#[derive(Debug, Clone, Copy)]
pub struct NewChallenge<'a> {
    pub id: &'a str,
    pub challenger_id: &'a str,
    pub opponent_id: &'a str,
    pub task_description: &'a str,
    pub duration_minutes: i64,
    pub created_at: i64,
}

pub(crate) async fn fetch_challenge<'e, E>(
    executor: E,
    id: &str,
) -> Result<Option<Challenge>, DatabaseError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let challenge = sqlx::query_as::<_, Challenge>("SELECT * FROM challenges WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(challenge)
}

pub(crate) async fn fetch_challenge_with_names<'e, E>(
    executor: E,
    id: &str,
) -> Result<Option<ChallengeWithNames>, DatabaseError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, ChallengeWithNames>(&format!("{SELECT_WITH_NAMES} WHERE c.id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

/// Find an open (pending or active) challenge between two users, in either
/// direction.
pub(crate) async fn find_open_between<'e, E>(
    executor: E,
    user_a: &str,
    user_b: &str,
) -> Result<Option<Challenge>, DatabaseError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let challenge = sqlx::query_as::<_, Challenge>(
        "SELECT * FROM challenges WHERE status IN (?, ?) AND \
         ((challenger_id = ? AND opponent_id = ?) OR (challenger_id = ? AND opponent_id = ?)) \
         LIMIT 1",
    )
    .bind(ChallengeStatus::Pending)
    .bind(ChallengeStatus::Active)
    .bind(user_a)
    .bind(user_b)
    .bind(user_b)
    .bind(user_a)
    .fetch_optional(executor)
    .await?;
    Ok(challenge)
}

/// Insert a pending challenge with zeroed pause counters.
pub(crate) async fn insert_challenge<'e, E>(
    executor: E,
    new: NewChallenge<'_>,
) -> Result<(), DatabaseError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO challenges (id, challenger_id, opponent_id, task_description, \
         duration_minutes, status, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(new.id)
    .bind(new.challenger_id)
    .bind(new.opponent_id)
    .bind(new.task_description)
    .bind(new.duration_minutes)
    .bind(ChallengeStatus::Pending)
    .bind(new.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Apply `transition` if and only if the challenge is still in the
/// transition's source state. Returns `false` when the guard did not match.
pub(crate) async fn apply_transition<'e, E>(
    executor: E,
    id: &str,
    transition: Transition,
    at: i64,
) -> Result<bool, DatabaseError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = match transition {
        Transition::Accept => {
            "UPDATE challenges SET status = ?, start_time = ? WHERE id = ? AND status = ?"
        }
        Transition::Settle => {
            "UPDATE challenges SET status = ?, end_time = ? WHERE id = ? AND status = ?"
        }
    };

    let result = sqlx::query(sql)
        .bind(transition.to())
        .bind(at)
        .bind(id)
        .bind(transition.from())
        .execute(executor)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Atomically bump one side's pause counter on an active challenge.
///
/// Returns the updated `(challenger_pauses, opponent_pauses)`, or `None` if
/// the challenge is no longer active.
pub(crate) async fn increment_pause<'e, E>(
    executor: E,
    id: &str,
    side: Side,
) -> Result<Option<(i64, i64)>, DatabaseError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let column = side.pause_column();
    let counters: Option<(i64, i64)> = sqlx::query_as(&format!(
        "UPDATE challenges SET {column} = {column} + 1 WHERE id = ? AND status = ? \
         RETURNING challenger_pauses, opponent_pauses"
    ))
    .bind(id)
    .bind(ChallengeStatus::Active)
    .fetch_optional(executor)
    .await?;
    Ok(counters)
}

impl ArenaDatabase {
    /// Get a challenge by ID.
    pub async fn get_challenge(&self, id: &str) -> Result<Challenge, DatabaseError> {
        fetch_challenge(self.pool(), id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Challenge {id}")))
    }

    /// Get a challenge with participant names by ID.
    pub async fn get_challenge_with_names(
        &self,
        id: &str,
    ) -> Result<ChallengeWithNames, DatabaseError> {
        fetch_challenge_with_names(self.pool(), id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Challenge {id}")))
    }

    /// Open challenges a user takes part in on either side, newest first.
    pub async fn list_open_challenges(
        &self,
        user_id: &str,
    ) -> Result<Vec<ChallengeWithNames>, DatabaseError> {
        let rows = sqlx::query_as::<_, ChallengeWithNames>(&format!(
            "{SELECT_WITH_NAMES} WHERE c.status IN (?, ?) \
             AND (c.challenger_id = ? OR c.opponent_id = ?) \
             ORDER BY c.created_at DESC, c.rowid DESC"
        ))
        .bind(ChallengeStatus::Pending)
        .bind(ChallengeStatus::Active)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }
}
