//! Response and request bodies.

use serde::{Deserialize, Serialize};

use crate::arena::{ChallengeStatus, PauseCounters, Side};
use crate::storage::{ChallengeWithNames, MatchResult, XpLogEntry};

#[derive(Debug, Deserialize)]
pub struct CreateChallengeRequest {
    pub opponent_id: String,
    pub task_description: String,
    pub duration_minutes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

/// A challenge as seen by one of its participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChallengeView {
    pub id: String,
    pub challenger: Participant,
    pub opponent: Participant,
    pub task_description: String,
    pub duration_minutes: i64,
    pub status: ChallengeStatus,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub my_role: Option<Side>,
    pub challenger_pauses: i64,
    pub opponent_pauses: i64,
}

impl ChallengeView {
    pub fn for_viewer(row: ChallengeWithNames, viewer_id: &str) -> Self {
        let my_role = row.challenge.side_of(viewer_id);
        let c = row.challenge;
        Self {
            challenger: Participant {
                id: c.challenger_id,
                name: row.challenger_name,
            },
            opponent: Participant {
                id: c.opponent_id,
                name: row.opponent_name,
            },
            id: c.id,
            task_description: c.task_description,
            duration_minutes: c.duration_minutes,
            status: c.status,
            start_time: c.start_time,
            end_time: c.end_time,
            my_role,
            challenger_pauses: c.challenger_pauses,
            opponent_pauses: c.opponent_pauses,
        }
    }
}

/// Single-challenge read; `result` is present once the match is settled.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeDetail {
    #[serde(flatten)]
    pub challenge: ChallengeView,
    pub result: Option<MatchResult>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PauseResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub counters: PauseCounters,
}

#[derive(Debug, Clone, Serialize)]
pub struct XpLogResponse {
    /// Caller's running XP total.
    pub xp: i64,
    pub entries: Vec<XpLogEntry>,
}
