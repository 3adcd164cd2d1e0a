//! Rank tiers derived from rating.

use serde::{Deserialize, Serialize};

/// Display tier for a rating. Thresholds are inclusive lower bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RankTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Grandmaster,
}

impl RankTier {
    pub const fn from_rating(rating: i64) -> Self {
        match rating {
            1800.. => Self::Grandmaster,
            1600..=1799 => Self::Platinum,
            1400..=1599 => Self::Gold,
            1200..=1399 => Self::Silver,
            _ => Self::Bronze,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
            Self::Grandmaster => "Grandmaster",
        }
    }
}

impl std::fmt::Display for RankTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
