//! User and XP ledger queries.

use sqlx::{Executor, Sqlite, SqliteConnection};
use xpilot_core::db::unix_timestamp;
use xpilot_core::rating::INITIAL_RATING;

use super::db::{ArenaDatabase, DatabaseError};
use super::models::{User, UserRole, XpLogEntry};

/// Fetch a user by ID.
pub(crate) async fn fetch_user<'e, E>(executor: E, id: &str) -> Result<Option<User>, DatabaseError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(user)
}

/// Fetch a user only if they opted into arena matches.
pub(crate) async fn fetch_eligible_user<'e, E>(
    executor: E,
    id: &str,
) -> Result<Option<User>, DatabaseError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ? AND role = ?")
        .bind(id)
        .bind(UserRole::Worker)
        .fetch_optional(executor)
        .await?;
    Ok(user)
}

/// All match-eligible users in insertion order.
pub(crate) async fn fetch_eligible_users<'e, E>(executor: E) -> Result<Vec<User>, DatabaseError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE role = ? ORDER BY created_at ASC, rowid ASC",
    )
    .bind(UserRole::Worker)
    .fetch_all(executor)
    .await?;
    Ok(users)
}

/// Write a settled rating. Only positive deltas accumulate into `rank_points`.
pub(crate) async fn apply_rating<'e, E>(
    executor: E,
    user_id: &str,
    new_rating: i64,
    delta: i64,
) -> Result<(), DatabaseError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result =
        sqlx::query("UPDATE users SET rating = ?, rank_points = rank_points + ? WHERE id = ?")
            .bind(new_rating)
            .bind(delta.max(0))
            .bind(user_id)
            .execute(executor)
            .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound(format!("User {user_id}")));
    }
    Ok(())
}

/// Award `amount` XP to a user and record it in the ledger.
pub(crate) async fn award_xp(
    conn: &mut SqliteConnection,
    user_id: &str,
    amount: i64,
    reason: &str,
    now: i64,
) -> Result<(), DatabaseError> {
    let result = sqlx::query("UPDATE users SET xp = xp + ? WHERE id = ?")
        .bind(amount)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound(format!("User {user_id}")));
    }

    sqlx::query("INSERT INTO xp_logs (user_id, xp_awarded, reason, created_at) VALUES (?, ?, ?, ?)")
        .bind(user_id)
        .bind(amount)
        .bind(reason)
        .bind(now)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

impl ArenaDatabase {
    // =========================================================================
    // User queries
    // =========================================================================

    /// Create a new user with the initial rating.
    pub async fn create_user(
        &self,
        id: &str,
        name: &str,
        role: UserRole,
    ) -> Result<User, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO users (id, name, role, rating, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(name)
        .bind(role)
        .bind(INITIAL_RATING)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_user(id).await
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        fetch_user(self.pool(), id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {id}")))
    }

    /// List match-eligible users in insertion order.
    pub async fn list_eligible_users(&self) -> Result<Vec<User>, DatabaseError> {
        fetch_eligible_users(self.pool()).await
    }

    // =========================================================================
    // XP ledger queries
    // =========================================================================

    /// Most recent XP ledger entries for a user, newest first.
    pub async fn list_xp_log(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<XpLogEntry>, DatabaseError> {
        let entries = sqlx::query_as::<_, XpLogEntry>(
            "SELECT * FROM xp_logs WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(entries)
    }
}
