//! Errors raised while loading catalog data.
//!
//! Nothing in the tick path returns an error; these only surface when a
//! catalog override is parsed and validated.

use thiserror::Error;

use crate::enums::{BossArchetypeId, EnemyKind};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog defines no arenas")]
    NoArenas,
    #[error("arena ids must be contiguous from 1: expected {expected}, found {found}")]
    NonContiguousArena { expected: u32, found: u32 },
    #[error("arena {arena} references unknown boss archetype {boss:?}")]
    UnknownBoss { arena: u32, boss: BossArchetypeId },
    #[error("arena {arena} has no waves")]
    NoWaves { arena: u32 },
    #[error("chase arena {arena} needs one to three non-empty segments")]
    InvalidChase { arena: u32 },
    #[error("enemy kind {0:?} appears more than once")]
    DuplicateEnemy(EnemyKind),
    #[error("enemy kind {0:?} needs a non-zero cost and a positive finite weight")]
    InvalidEnemy(EnemyKind),
    #[error("chase arena {arena} thresholds must be fractions within 0..=1")]
    InvalidChaseThresholds { arena: u32 },
    #[error("boss {boss:?} has {field} outside 0..=1")]
    InvalidBossFraction {
        boss: BossArchetypeId,
        field: &'static str,
    },
    #[error("modifier {id} has a non-positive multiplier")]
    InvalidModifier { id: String },
    #[error("modifier {id} forces unknown enemy kind {kind:?}")]
    UnknownForcedType { id: String, kind: EnemyKind },
}
