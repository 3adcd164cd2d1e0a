//! Data models for Focus Arena storage.

use serde::{Deserialize, Serialize};

use crate::arena::{ChallengeStatus, Side};

/// Account role. Only workers opt into arena matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Worker,
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "worker" => Ok(Self::Worker),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// User record, limited to the fields the arena reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    pub xp: i64,
    pub rating: i64,
    pub rank_points: i64,
    pub created_at: i64,
}

/// Challenge record from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Challenge {
    pub id: String,
    pub challenger_id: String,
    pub opponent_id: String,
    pub task_description: String,
    pub duration_minutes: i64,
    pub status: ChallengeStatus,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub challenger_pauses: i64,
    pub opponent_pauses: i64,
    pub created_at: i64,
}

impl Challenge {
    /// Which side `user_id` plays, if they participate at all.
    pub fn side_of(&self, user_id: &str) -> Option<Side> {
        if self.challenger_id == user_id {
            Some(Side::Challenger)
        } else if self.opponent_id == user_id {
            Some(Side::Opponent)
        } else {
            None
        }
    }
}

/// Challenge joined with both participants' display names.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChallengeWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub challenge: Challenge,
    pub challenger_name: String,
    pub opponent_name: String,
}

/// Settled outcome of one challenge. Side A is the challenger.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MatchResult {
    pub id: String,
    pub challenge_id: String,
    pub winner_id: Option<String>,
    pub focus_score_a: f64,
    pub focus_score_b: f64,
    pub xp_awarded: i64,
    pub elo_change_a: i64,
    pub elo_change_b: i64,
    pub created_at: i64,
}

/// XP ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct XpLogEntry {
    pub id: i64,
    pub user_id: String,
    pub xp_awarded: i64,
    pub reason: String,
    pub created_at: i64,
}
