//! Events emitted by the director for presentation (HUD, audio, VFX).
//!
//! Every hook the core fires goes through this one enum, so the core never
//! references a UI or audio function directly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityHandle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DirectorEvent {
    // --- Waves ---
    WaveStarted {
        arena: u32,
        wave: u32,
        wave_type: WaveType,
    },
    WaveCleared {
        arena: u32,
        wave: u32,
    },
    ModifierAnnounced {
        id: String,
        text: String,
    },
    BreatherStarted,
    BreatherEnded,
    StressPauseStarted {
        live_enemies: usize,
    },
    StressPauseEnded,
    EnemySpawned {
        handle: EntityHandle,
        kind: EnemyKind,
        position: Vec2,
    },
    SchoolSpawned {
        leader: EntityHandle,
        kind: EnemyKind,
        followers: u32,
    },
    SchoolLeaderPromoted {
        school_id: u32,
        leader: EntityHandle,
    },
    SchoolDisbanded {
        school_id: u32,
    },

    // --- Boss ---
    BossIntroStarted {
        arena: u32,
        boss: BossArchetypeId,
    },
    BossSpawned {
        handle: EntityHandle,
        boss: BossArchetypeId,
        phase: BossPhase,
        health: f32,
    },
    BossTellStarted {
        ability: Ability,
        frames: u32,
    },
    BossAbilityExecuted {
        ability: Ability,
        target: Vec2,
    },
    BossComboStarted {
        abilities: Vec<Ability>,
    },
    BossPhaseChanged {
        phase: BossPhase,
    },
    BossShieldRaised,
    BossExposed,
    BossFragmented {
        copies: u32,
    },
    BossRepositioned {
        target: Vec2,
    },
    BossRetreated {
        health: f32,
        waves_until_return: u32,
    },
    BossDefeated {
        boss: BossArchetypeId,
    },

    // --- Arena ---
    ArenaCompleted {
        arena: u32,
    },
    RunCompleted,
}
