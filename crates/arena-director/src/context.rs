//! The state every system reads and writes during one tick.

use std::collections::BTreeSet;

use glam::Vec2;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use arena_boss_ai::{BossAbilityEngine, ChaseEncounterController};
use arena_core::budget::ThreatBudget;
use arena_core::catalog::WaveModifier;
use arena_core::components::{BossFragment, Dead, Enemy};
use arena_core::countdown::Countdown;
use arena_core::enums::{EnemyKind, RunPhase, WaveState, WaveType};
use arena_core::events::DirectorEvent;
use arena_core::types::{EntityHandle, PlayerView, SimTime, SpawnChoreography};

use crate::collaborators::SpatialQuery;

/// Spawn-phase state of the active wave. Created at wave start, dropped
/// when the wave clears.
#[derive(Debug, Clone)]
pub struct WaveRuntime {
    pub wave_type: WaveType,
    pub budget: ThreatBudget,
    pub pool: Vec<EnemyKind>,
    pub modifier: Option<WaveModifier>,
    pub choreography: SpawnChoreography,
    /// Active frames spent in the spawn phase.
    pub frame: u32,
    pub since_last_spawn: u32,
    pub breather: Countdown,
    pub spawns_since_breather: u32,
    pub stress_paused: bool,
    /// Types already charged against the cognitive cap.
    pub types_spawned: BTreeSet<EnemyKind>,
    pub exhaustion_logged: bool,
    /// Pincer alternation: next spawn uses the secondary direction.
    pub pincer_flip: bool,
}

impl WaveRuntime {
    pub fn new(
        wave_type: WaveType,
        budget: ThreatBudget,
        pool: Vec<EnemyKind>,
        modifier: Option<WaveModifier>,
        choreography: SpawnChoreography,
    ) -> Self {
        Self {
            wave_type,
            budget,
            pool,
            modifier,
            choreography,
            frame: 0,
            since_last_spawn: 0,
            breather: Countdown::idle(),
            spawns_since_breather: 0,
            stress_paused: false,
            types_spawned: BTreeSet::new(),
            exhaustion_logged: false,
            pincer_flip: false,
        }
    }

    pub fn interval_mult(&self) -> f32 {
        self.modifier.as_ref().map_or(1.0, |m| m.interval_mult)
    }
}

/// The boss currently in the arena.
#[derive(Debug, Clone)]
pub struct ActiveBoss {
    pub entity: Entity,
    pub engine: BossAbilityEngine,
}

/// Pillar positions for the current arena, fetched on first use and
/// refetched whenever the cached list is empty.
#[derive(Debug, Clone, Default)]
pub struct PillarCache {
    arena: Option<u32>,
    pillars: Vec<Vec2>,
}

impl PillarCache {
    pub fn invalidate(&mut self) {
        self.arena = None;
        self.pillars.clear();
    }

    pub fn get(&mut self, arena: u32, spatial: &dyn SpatialQuery) -> &[Vec2] {
        if self.arena != Some(arena) || self.pillars.is_empty() {
            self.pillars = spatial.pillars(arena);
            self.arena = Some(arena);
        }
        &self.pillars
    }
}

/// Everything that changes during a run, passed by reference into each
/// system.
pub struct SimulationContext {
    pub world: World,
    pub rng: ChaCha8Rng,
    pub time: SimTime,
    pub run_phase: RunPhase,
    pub paused: bool,
    /// Modifier announcement sub-pause. The tick body is frozen while running.
    pub announcement: Countdown,
    pub arena: u32,
    pub wave: u32,
    pub wave_state: WaveState,
    pub state_timer: Countdown,
    /// Set when a wave clears and the boss should come next.
    pub boss_due: bool,
    pub wave_runtime: Option<WaveRuntime>,
    pub boss: Option<ActiveBoss>,
    pub chase: Option<ChaseEncounterController>,
    pub player: PlayerView,
    pub boss_position: Vec2,
    pub pillar_cache: PillarCache,
    pub next_school_id: u32,
    pub events: Vec<DirectorEvent>,
}

impl SimulationContext {
    pub fn new(seed: u64) -> Self {
        Self {
            world: World::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            time: SimTime::default(),
            run_phase: RunPhase::default(),
            paused: false,
            announcement: Countdown::idle(),
            arena: 0,
            wave: 0,
            wave_state: WaveState::default(),
            state_timer: Countdown::idle(),
            boss_due: false,
            wave_runtime: None,
            boss: None,
            chase: None,
            player: PlayerView::default(),
            boss_position: Vec2::ZERO,
            pillar_cache: PillarCache::default(),
            next_school_id: 0,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: DirectorEvent) {
        self.events.push(event);
    }

    /// Switch wave state and arm its timer.
    pub fn enter(&mut self, state: WaveState, frames: u32) {
        self.wave_state = state;
        self.state_timer.arm(frames);
    }

    /// Drop every entity and all per-arena state.
    pub fn clear_arena(&mut self) {
        self.world.clear();
        self.wave_runtime = None;
        self.boss = None;
        self.chase = None;
        self.boss_due = false;
        self.announcement.cancel();
        self.pillar_cache.invalidate();
    }
}

pub fn handle_of(entity: Entity) -> EntityHandle {
    EntityHandle(entity.to_bits().get())
}

pub fn entity_of(handle: EntityHandle) -> Option<Entity> {
    Entity::from_bits(handle.0)
}

/// Live (not tombstoned) scheduler enemies plus boss fragments.
pub fn live_enemy_count(world: &World) -> usize {
    let enemies = world
        .query::<(&Enemy, Option<&Dead>)>()
        .iter()
        .filter(|(_, (_, dead))| dead.is_none())
        .count();
    enemies + live_fragment_count(world)
}

pub fn live_fragment_count(world: &World) -> usize {
    world
        .query::<(&BossFragment, Option<&Dead>)>()
        .iter()
        .filter(|(_, (_, dead))| dead.is_none())
        .count()
}

/// Health left across the live boss fragments.
pub fn live_fragment_health(world: &World) -> f32 {
    world
        .query::<(&BossFragment, Option<&Dead>)>()
        .iter()
        .filter(|(_, (_, dead))| dead.is_none())
        .map(|(_, (fragment, _))| fragment.health)
        .sum()
}

/// Handles of every live enemy and fragment, in entity order.
pub fn live_enemy_handles(world: &World) -> Vec<EntityHandle> {
    let mut handles: Vec<EntityHandle> = world
        .query::<(Option<&Enemy>, Option<&BossFragment>, Option<&Dead>)>()
        .iter()
        .filter(|(_, (enemy, fragment, dead))| {
            dead.is_none() && (enemy.is_some() || fragment.is_some())
        })
        .map(|(entity, _)| handle_of(entity))
        .collect();
    handles.sort();
    handles
}
