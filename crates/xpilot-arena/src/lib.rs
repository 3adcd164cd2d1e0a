//! `XPilot` Focus Arena Server Library
//!
//! Core functionality for the Focus Arena:
//! - `SQLite` storage for users, challenges, match results and the XP ledger
//! - Challenge state machine with exactly-once settlement
//! - Leaderboard projection
//! - JWT caller identity
//! - HTTP API (axum)

pub mod api;
pub mod arena;
pub mod auth;
pub mod storage;
