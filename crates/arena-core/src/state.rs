//! Director snapshot: the complete visible pacing state after each tick.

use serde::{Deserialize, Serialize};

use crate::budget::ThreatBudget;
use crate::enums::*;
use crate::events::DirectorEvent;
use crate::types::{SimTime, SpawnChoreography};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorSnapshot {
    pub time: SimTime,
    pub run_phase: RunPhase,
    pub paused: bool,
    /// Modifier announcement in progress; the tick body is frozen.
    pub announcing: bool,
    pub arena: u32,
    pub wave: u32,
    pub wave_state: WaveState,
    pub spawn: Option<WaveView>,
    pub live_enemies: usize,
    pub boss: Option<BossView>,
    pub chase: Option<ChaseView>,
    pub events: Vec<DirectorEvent>,
}

/// Spawn-phase view of the active wave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveView {
    pub wave_type: WaveType,
    pub budget: ThreatBudget,
    pub pool: Vec<EnemyKind>,
    pub modifier: Option<String>,
    pub choreography: SpawnChoreography,
    pub stress_paused: bool,
    pub in_breather: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossView {
    pub archetype: BossArchetypeId,
    pub health: f32,
    pub max_health: f32,
    pub phase: BossPhase,
    pub ai_state: BossAiState,
    pub invulnerable: bool,
    pub exposed: bool,
    pub live_fragments: usize,
    /// Health left across the live fragments.
    pub fragment_health: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChaseView {
    pub segment: usize,
    pub phase_to_spawn: BossPhase,
    pub encounter_count: u32,
    pub persistent_health: Option<f32>,
    pub waves_until_return: u32,
}
