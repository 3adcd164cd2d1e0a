//! Database connection and initialization.

pub use xpilot_core::db::DatabaseError;

xpilot_core::define_database!(ArenaDatabase, "Arena database migrations complete");
