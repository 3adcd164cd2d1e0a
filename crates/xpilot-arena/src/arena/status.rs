//! Challenge lifecycle states and the transitions between them.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a challenge. `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Pending,
    Active,
    Finished,
}

impl ChallengeStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Finished => "finished",
        }
    }
}

impl std::fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only two forward moves a challenge can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Opponent accepts: `pending -> active`, stamps `start_time`.
    Accept,
    /// Either participant settles: `active -> finished`, stamps `end_time`.
    Settle,
}

impl Transition {
    pub const fn from(self) -> ChallengeStatus {
        match self {
            Self::Accept => ChallengeStatus::Pending,
            Self::Settle => ChallengeStatus::Active,
        }
    }

    pub const fn to(self) -> ChallengeStatus {
        match self {
            Self::Accept => ChallengeStatus::Active,
            Self::Settle => ChallengeStatus::Finished,
        }
    }

    /// Whether this transition may be applied to a challenge in `current`.
    pub fn permits(self, current: ChallengeStatus) -> bool {
        current == self.from()
    }
}

/// Which participant of a challenge an identity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Challenger,
    Opponent,
}

impl Side {
    /// Column holding this side's pause counter.
    pub(crate) const fn pause_column(self) -> &'static str {
        match self {
            Self::Challenger => "challenger_pauses",
            Self::Opponent => "opponent_pauses",
        }
    }
}
