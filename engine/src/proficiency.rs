use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Proficiency rank, stored as the export's integer encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ProficiencyRank {
    Untrained,
    Trained,
    Expert,
    Master,
    Legendary,
}

impl ProficiencyRank {
    pub fn value(self) -> i32 {
        match self {
            ProficiencyRank::Untrained => 0,
            ProficiencyRank::Trained => 2,
            ProficiencyRank::Expert => 4,
            ProficiencyRank::Master => 6,
            ProficiencyRank::Legendary => 8,
        }
    }

    pub fn is_trained(self) -> bool {
        self != ProficiencyRank::Untrained
    }

    /// Bonus this rank grants at `level`. Untrained never adds level.
    pub fn bonus(self, level: u32) -> i32 {
        if self.is_trained() {
            self.value()
                .saturating_add(i32::try_from(level).unwrap_or(i32::MAX))
        } else {
            0
        }
    }
}

impl TryFrom<i32> for ProficiencyRank {
    type Error = EngineError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(ProficiencyRank::Untrained),
            2 => Ok(ProficiencyRank::Trained),
            4 => Ok(ProficiencyRank::Expert),
            6 => Ok(ProficiencyRank::Master),
            8 => Ok(ProficiencyRank::Legendary),
            other => Err(EngineError::InvalidProficiencyRank(other)),
        }
    }
}

impl From<ProficiencyRank> for i32 {
    fn from(rank: ProficiencyRank) -> i32 {
        rank.value()
    }
}

impl fmt::Display for ProficiencyRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProficiencyRank::Untrained => "Untrained",
            ProficiencyRank::Trained => "Trained",
            ProficiencyRank::Expert => "Expert",
            ProficiencyRank::Master => "Master",
            ProficiencyRank::Legendary => "Legendary",
        };
        f.write_str(name)
    }
}

/// Proficiency bonus for a raw rank integer. Ranks outside {0,2,4,6,8}
/// are rejected rather than folded into a wrong number.
pub fn proficiency_bonus(rank: i32, level: u32) -> EngineResult<i32> {
    Ok(ProficiencyRank::try_from(rank)?.bonus(level))
}
