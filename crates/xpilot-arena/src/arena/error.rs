//! Error taxonomy for arena operations.

use thiserror::Error;

use super::status::ChallengeStatus;
use crate::storage::DatabaseError;

/// Broad class of an [`ArenaError`], used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request would break a lifecycle or pairing invariant.
    Invariant,
    /// An open challenge already exists between the two users.
    Conflict,
    /// The caller is not allowed to act on this challenge.
    Authorization,
    /// The referenced challenge or user does not exist.
    NotFound,
    /// Storage failure.
    Internal,
}

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("Cannot challenge yourself.")]
    SelfChallenge,

    #[error("Duration must be a positive number of minutes.")]
    InvalidDuration,

    #[error("Opponent worker not found.")]
    OpponentNotEligible,

    #[error("An open challenge already exists between you two.")]
    OpenChallengeExists,

    #[error("Challenge not found.")]
    ChallengeNotFound,

    #[error("User not found.")]
    UserNotFound,

    #[error("You are not the opponent.")]
    NotOpponent,

    #[error("Not a participant.")]
    NotParticipant,

    /// Wrong-state operation. The losing side of a settlement race lands
    /// here too, with `actual = Finished`.
    #[error("Challenge is not {expected}.")]
    InvalidState {
        expected: ChallengeStatus,
        actual: ChallengeStatus,
    },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ArenaError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SelfChallenge | Self::InvalidDuration | Self::InvalidState { .. } => {
                ErrorKind::Invariant
            }
            Self::OpenChallengeExists => ErrorKind::Conflict,
            Self::NotOpponent | Self::NotParticipant => ErrorKind::Authorization,
            Self::OpponentNotEligible | Self::ChallengeNotFound | Self::UserNotFound => {
                ErrorKind::NotFound
            }
            Self::Database(_) => ErrorKind::Internal,
        }
    }
}

impl From<sqlx::Error> for ArenaError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_settlement_race_is_a_state_error() {
        let err = ArenaError::InvalidState {
            expected: ChallengeStatus::Active,
            actual: ChallengeStatus::Finished,
        };
        assert_eq!(err.kind(), ErrorKind::Invariant);
        assert_eq!(err.to_string(), "Challenge is not active.");
    }

    #[test]
    fn kinds() {
        assert_eq!(ArenaError::SelfChallenge.kind(), ErrorKind::Invariant);
        assert_eq!(ArenaError::OpenChallengeExists.kind(), ErrorKind::Conflict);
        assert_eq!(ArenaError::NotOpponent.kind(), ErrorKind::Authorization);
        assert_eq!(ArenaError::ChallengeNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            ArenaError::Database(DatabaseError::Query("boom".into())).kind(),
            ErrorKind::Internal
        );
    }
}
