//! Challenge state machine over the arena store.
//!
//! Accept and pause are single guarded statements. Create and settle run
//! in `BEGIN IMMEDIATE` transactions: the write lock is held from the first
//! read, so the status check and every write that depends on it commit or
//! roll back together.

use serde::Serialize;
use tracing::{debug, info};
use xpilot_core::config::ArenaConfig;
use xpilot_core::db::{begin_immediate, unix_timestamp};

use super::error::ArenaError;
use super::leaderboard::{LeaderboardEntry, project_leaderboard};
use super::settlement::{SettlementPlan, SettlementVerdict};
use super::status::{ChallengeStatus, Transition};
use crate::storage::queries::{
    apply_rating, award_xp, fetch_eligible_user, fetch_eligible_users, fetch_user,
};
use crate::storage::queries_challenges::{
    NewChallenge, apply_transition, fetch_challenge, find_open_between, increment_pause,
    insert_challenge,
};
use crate::storage::queries_results::{finished_counts, insert_match_result, win_counts};
use crate::storage::{ArenaDatabase, Challenge, ChallengeWithNames, DatabaseError, MatchResult};

/// Pause counters after a recorded pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PauseCounters {
    pub challenger_pauses: i64,
    pub opponent_pauses: i64,
}

#[derive(Clone)]
pub struct ArenaService {
    db: ArenaDatabase,
    rules: ArenaConfig,
}

impl ArenaService {
    pub const fn new(db: ArenaDatabase, rules: ArenaConfig) -> Self {
        Self { db, rules }
    }

    pub const fn db(&self) -> &ArenaDatabase {
        &self.db
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Propose a match to `opponent_id`. The new challenge is `pending`.
    pub async fn create(
        &self,
        challenger_id: &str,
        opponent_id: &str,
        task_description: &str,
        duration_minutes: Option<i64>,
    ) -> Result<ChallengeWithNames, ArenaError> {
        if challenger_id == opponent_id {
            return Err(ArenaError::SelfChallenge);
        }
        let duration_minutes = duration_minutes.unwrap_or(self.rules.default_duration_minutes);
        if duration_minutes <= 0 {
            return Err(ArenaError::InvalidDuration);
        }

        let mut tx = begin_immediate(self.db.pool()).await?;

        fetch_eligible_user(&mut *tx, opponent_id)
            .await?
            .ok_or(ArenaError::OpponentNotEligible)?;

        if find_open_between(&mut *tx, challenger_id, opponent_id)
            .await?
            .is_some()
        {
            return Err(ArenaError::OpenChallengeExists);
        }

        let id = uuid::Uuid::new_v4().to_string();
        insert_challenge(
            &mut *tx,
            NewChallenge {
                id: &id,
                challenger_id,
                opponent_id,
                task_description,
                duration_minutes,
                created_at: unix_timestamp(),
            },
        )
        .await?;
        tx.commit().await?;

        info!(
            challenge_id = %id,
            challenger_id,
            opponent_id,
            duration_minutes,
            "Challenge created"
        );
        self.view(&id).await
    }

    /// Opponent accepts; the server clock starts both timers.
    pub async fn accept(
        &self,
        challenge_id: &str,
        acting_user: &str,
    ) -> Result<ChallengeWithNames, ArenaError> {
        self.accept_at(challenge_id, acting_user, unix_timestamp())
            .await
    }

    pub async fn accept_at(
        &self,
        challenge_id: &str,
        acting_user: &str,
        now: i64,
    ) -> Result<ChallengeWithNames, ArenaError> {
        let challenge = self.find(challenge_id).await?;
        if challenge.opponent_id != acting_user {
            return Err(ArenaError::NotOpponent);
        }
        ensure_permits(Transition::Accept, challenge.status)?;

        if !apply_transition(self.db.pool(), challenge_id, Transition::Accept, now).await? {
            let current = self.find(challenge_id).await?;
            return Err(ArenaError::InvalidState {
                expected: Transition::Accept.from(),
                actual: current.status,
            });
        }

        info!(challenge_id, start_time = now, "Challenge accepted");
        self.view(challenge_id).await
    }

    /// Count a pause/blur event against the caller's own side.
    pub async fn record_pause(
        &self,
        challenge_id: &str,
        acting_user: &str,
    ) -> Result<PauseCounters, ArenaError> {
        let challenge = self.find(challenge_id).await?;
        ensure_status(ChallengeStatus::Active, challenge.status)?;
        let side = challenge
            .side_of(acting_user)
            .ok_or(ArenaError::NotParticipant)?;

        let (challenger_pauses, opponent_pauses) =
            increment_pause(self.db.pool(), challenge_id, side)
                .await?
                .ok_or(ArenaError::InvalidState {
                    expected: ChallengeStatus::Active,
                    actual: ChallengeStatus::Finished,
                })?;

        debug!(challenge_id, ?side, challenger_pauses, opponent_pauses, "Pause recorded");
        Ok(PauseCounters {
            challenger_pauses,
            opponent_pauses,
        })
    }

    /// Close an active challenge and apply scores, ratings and XP exactly once.
    pub async fn settle(
        &self,
        challenge_id: &str,
        acting_user: &str,
    ) -> Result<SettlementVerdict, ArenaError> {
        self.settle_at(challenge_id, acting_user, unix_timestamp())
            .await
    }

    pub async fn settle_at(
        &self,
        challenge_id: &str,
        acting_user: &str,
        now: i64,
    ) -> Result<SettlementVerdict, ArenaError> {
        let mut tx = begin_immediate(self.db.pool()).await?;

        let challenge = fetch_challenge(&mut *tx, challenge_id)
            .await?
            .ok_or(ArenaError::ChallengeNotFound)?;
        ensure_permits(Transition::Settle, challenge.status)?;
        let side = challenge
            .side_of(acting_user)
            .ok_or(ArenaError::NotParticipant)?;

        // Only a settlement moves a challenge out of `active`.
        if !apply_transition(&mut *tx, challenge_id, Transition::Settle, now).await? {
            return Err(ArenaError::InvalidState {
                expected: Transition::Settle.from(),
                actual: Transition::Settle.to(),
            });
        }

        let start_time = challenge.start_time.ok_or_else(|| {
            DatabaseError::Query(format!("Active challenge {challenge_id} has no start_time"))
        })?;
        let challenger = fetch_user(&mut *tx, &challenge.challenger_id)
            .await?
            .ok_or(ArenaError::UserNotFound)?;
        let opponent = fetch_user(&mut *tx, &challenge.opponent_id)
            .await?
            .ok_or(ArenaError::UserNotFound)?;

        let plan = SettlementPlan::compute(
            &challenge,
            start_time,
            now,
            challenger.rating,
            opponent.rating,
            self.rules.k_factor,
        );

        apply_rating(
            &mut *tx,
            &challenger.id,
            plan.rating.new_rating_a,
            plan.rating.delta_a,
        )
        .await?;
        apply_rating(
            &mut *tx,
            &opponent.id,
            plan.rating.new_rating_b,
            plan.rating.delta_b,
        )
        .await?;

        award_xp(&mut *tx, &challenger.id, plan.xp_a, &self.rules.xp_reason, now).await?;
        award_xp(&mut *tx, &opponent.id, plan.xp_b, &self.rules.xp_reason, now).await?;

        let winner_id = plan.winner_id(&challenge).map(str::to_string);
        let result = MatchResult {
            id: uuid::Uuid::new_v4().to_string(),
            challenge_id: challenge_id.to_string(),
            winner_id: winner_id.clone(),
            focus_score_a: plan.focus_score_a,
            focus_score_b: plan.focus_score_b,
            xp_awarded: plan.xp_total(),
            elo_change_a: plan.rating.delta_a,
            elo_change_b: plan.rating.delta_b,
            created_at: now,
        };
        insert_match_result(&mut *tx, &result).await?;

        tx.commit().await?;

        info!(
            challenge_id,
            settled_by = acting_user,
            winner_id = winner_id.as_deref().unwrap_or("draw"),
            elapsed_minutes = plan.elapsed_minutes,
            focus_score_a = plan.focus_score_a,
            focus_score_b = plan.focus_score_b,
            elo_change_a = plan.rating.delta_a,
            elo_change_b = plan.rating.delta_b,
            "Challenge settled"
        );

        Ok(plan.verdict_for(side, winner_id))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Open challenges for a user, newest first.
    pub async fn list_open(&self, user_id: &str) -> Result<Vec<ChallengeWithNames>, ArenaError> {
        Ok(self.db.list_open_challenges(user_id).await?)
    }

    /// A challenge the caller takes part in, plus its result once finished.
    pub async fn get_for_participant(
        &self,
        challenge_id: &str,
        user_id: &str,
    ) -> Result<(ChallengeWithNames, Option<MatchResult>), ArenaError> {
        let row = self.view(challenge_id).await?;
        if row.challenge.side_of(user_id).is_none() {
            return Err(ArenaError::NotParticipant);
        }

        let result = if row.challenge.status == ChallengeStatus::Finished {
            Some(self.db.get_match_result(challenge_id).await?)
        } else {
            None
        };
        Ok((row, result))
    }

    /// Standings for all match-eligible users, read from one snapshot.
    pub async fn leaderboard(&self, viewer_id: &str) -> Result<Vec<LeaderboardEntry>, ArenaError> {
        let mut tx = self.db.pool().begin().await?;
        let users = fetch_eligible_users(&mut *tx).await?;
        let wins = win_counts(&mut *tx).await?;
        let finished = finished_counts(&mut *tx).await?;
        tx.commit().await?;

        Ok(project_leaderboard(users, &wins, &finished, viewer_id))
    }

    async fn find(&self, challenge_id: &str) -> Result<Challenge, ArenaError> {
        fetch_challenge(self.db.pool(), challenge_id)
            .await?
            .ok_or(ArenaError::ChallengeNotFound)
    }

    async fn view(&self, challenge_id: &str) -> Result<ChallengeWithNames, ArenaError> {
        match self.db.get_challenge_with_names(challenge_id).await {
            Ok(row) => Ok(row),
            Err(DatabaseError::NotFound(_)) => Err(ArenaError::ChallengeNotFound),
            Err(e) => Err(e.into()),
        }
    }
}

fn ensure_permits(transition: Transition, current: ChallengeStatus) -> Result<(), ArenaError> {
    if transition.permits(current) {
        Ok(())
    } else {
        Err(ArenaError::InvalidState {
            expected: transition.from(),
            actual: current,
        })
    }
}

fn ensure_status(expected: ChallengeStatus, actual: ChallengeStatus) -> Result<(), ArenaError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ArenaError::InvalidState { expected, actual })
    }
}
