//! Boss AI for the arena pacing engine.
//!
//! Implements the per-boss ability state machine (phase-weighted selection,
//! cooldowns, tells, combos, health-threshold side effects) and the chase
//! controller that carries one boss across several encounters.

pub mod archetype;
pub mod chase;
pub mod engine;
pub mod state;

pub use arena_core as core;
pub use archetype::{BossBuilder, Capabilities};
pub use chase::{ChaseEncounterController, ChaseState};
pub use engine::{BossAbilityEngine, BossAction, BossInput};
pub use state::BossRuntimeState;
