//! Table lookup errors.

use crate::error::{ErrorSeverity, GameError};

use super::tables::{BossId, CharacterId, StageId};

/// Errors raised when a roster or encounter references rows the tables do not
/// contain.
///
/// Crafting has its own error type; option rolls that point at missing skill
/// rows are skipped rather than reported.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// Character row was not found by ID.
    #[error("character row {0} not found")]
    UnknownCharacter(CharacterId),

    /// Stage row was not found by ID.
    #[error("stage {0} not found")]
    UnknownStage(StageId),

    /// World boss row was not found by ID.
    #[error("world boss {0} not found")]
    UnknownWorldBoss(BossId),

    /// Encounter resolved to zero waves.
    #[error("encounter has no waves")]
    EmptyEncounter,

    /// A wave spawns no enemies.
    #[error("wave {0} spawns no enemies")]
    EmptyWave(u32),

    /// A wave holds more enemies than a combatant can target.
    #[error("wave {wave} spawns {count} enemies, at most {max} can be targeted")]
    TooManyCombatants { wave: u32, count: usize, max: usize },
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            UnknownCharacter(_) => "ORACLE_UNKNOWN_CHARACTER",
            UnknownStage(_) => "ORACLE_UNKNOWN_STAGE",
            UnknownWorldBoss(_) => "ORACLE_UNKNOWN_WORLD_BOSS",
            EmptyEncounter => "ORACLE_EMPTY_ENCOUNTER",
            EmptyWave(_) => "ORACLE_EMPTY_WAVE",
            TooManyCombatants { .. } => "ORACLE_TOO_MANY_COMBATANTS",
        }
    }
}
