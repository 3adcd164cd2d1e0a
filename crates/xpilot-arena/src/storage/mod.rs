//! `SQLite` storage for the Focus Arena.
//!
//! Provides persistence for users, challenges, match results and the XP
//! ledger. Free functions that take an executor are used inside the
//! arena's transactions; `ArenaDatabase` methods wrap them for one-shot
//! reads and writes.

mod db;
mod models;
pub(crate) mod queries;
pub(crate) mod queries_challenges;
pub(crate) mod queries_results;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;

pub use db::{ArenaDatabase, DatabaseError};
pub use models::*;
