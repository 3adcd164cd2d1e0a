//! `XPilot` Core Library
//!
//! Shared functionality for the Focus Arena:
//! - Focus score and rating (ELO) computation
//! - XP awards and rank tiers
//! - Configuration resolution and hierarchy
//! - `SQLite` pool helpers and common error types

pub mod config;
pub mod db;
pub mod error;
pub mod rating;
pub mod scoring;
pub mod tier;
pub mod tracing_init;

pub use config::Config;
pub use error::{Error, Result};
pub use rating::{Outcome, RatingUpdate};
pub use tier::RankTier;
