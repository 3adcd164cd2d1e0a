//! Focus Arena: 1-vs-1 deep-work challenges.
//!
//! - `status` -- the closed lifecycle `pending -> active -> finished`
//! - `service` -- create / accept / pause / settle against storage
//! - `settlement` -- scores, rating deltas and XP for a finished match
//! - `leaderboard` -- read-only standings projection

mod error;
mod leaderboard;
mod service;
mod settlement;
mod status;


pub use error::{ArenaError, ErrorKind};
pub use leaderboard::{LeaderboardEntry, project_leaderboard};
pub use service::{ArenaService, PauseCounters};
pub use settlement::{SettlementPlan, SettlementVerdict};
pub use status::{ChallengeStatus, Side, Transition};
