//! Leaderboard projection over ratings and the match ledger.

use std::cmp::Reverse;
use std::collections::HashMap;

use serde::Serialize;
use xpilot_core::RankTier;

use crate::storage::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub elo_rating: i64,
    pub rank_points: i64,
    pub rank_tier: RankTier,
    pub wins: i64,
    /// Finished matches minus wins; draws are folded in here.
    pub losses: i64,
    pub total: i64,
    pub is_me: bool,
}

/// Rank `users` by rating, highest first.
///
/// Equal ratings keep the order `users` arrived in.
pub fn project_leaderboard(
    mut users: Vec<User>,
    wins: &HashMap<String, i64>,
    finished: &HashMap<String, i64>,
    viewer_id: &str,
) -> Vec<LeaderboardEntry> {
    users.sort_by_key(|u| Reverse(u.rating));

    users
        .into_iter()
        .enumerate()
        .map(|(i, user)| {
            let wins = wins.get(&user.id).copied().unwrap_or(0);
            let total = finished.get(&user.id).copied().unwrap_or(0);
            LeaderboardEntry {
                rank: i + 1,
                is_me: user.id == viewer_id,
                rank_tier: RankTier::from_rating(user.rating),
                elo_rating: user.rating,
                rank_points: user.rank_points,
                wins,
                losses: total - wins,
                total,
                id: user.id,
                name: user.name,
            }
        })
        .collect()
}
