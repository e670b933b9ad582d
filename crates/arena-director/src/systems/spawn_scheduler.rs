//! Spawn scheduler: spends the wave's threat budget over time.
//!
//! Runs only in `WaveActive`. Per tick: stress gate, micro-breather, budget
//! exhaustion, then interval timing. No breather is armed by the spawn that
//! spends the last of the budget. A spawn attempt is a single enemy,
//! a burst of two or three, or occasionally a school.

use std::f32::consts::TAU;

use glam::Vec2;
use hecs::World;
use log::{debug, info, warn};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use arena_core::catalog::{Catalog, EnemySpec};
use arena_core::components::{Dead, SchoolLeader};
use arena_core::constants::*;
use arena_core::events::DirectorEvent;
use arena_core::types::{Bounds, PlayerView};

use crate::collaborators::{EntityFactory, SpatialQuery};
use crate::config::DirectorConfig;
use crate::context::{handle_of, live_enemy_count, SimulationContext, WaveRuntime};
use crate::systems::{choreography, pool};

/// Frames between spawns: shrinks as the budget is spent, scaled by the
/// global rate and the wave's modifier.
pub fn spawn_interval(progress: f32, rate_multiplier: f32, interval_mult: f32) -> u32 {
    let progress = progress.clamp(0.0, 1.0);
    let base = BASE_SPAWN_INTERVAL_FRAMES as f32 * (1.0 - INTERVAL_PROGRESS_SCALE * progress);
    let scaled = base / rate_multiplier.max(f32::EPSILON) * interval_mult;
    (scaled.round() as u32).max(MIN_SPAWN_INTERVAL_FRAMES)
}

pub fn run(
    ctx: &mut SimulationContext,
    catalog: &Catalog,
    config: &DirectorConfig,
    factory: &mut dyn EntityFactory,
    spatial: &dyn SpatialQuery,
) {
    let live = live_enemy_count(&ctx.world);
    let active_schools = active_school_count(&ctx.world);
    let half_extent = catalog.arena(ctx.arena).map_or(20.0, |a| a.half_extent);
    let tick = ctx.time.tick;
    let arena = ctx.arena;

    let SimulationContext {
        world,
        rng,
        wave_runtime,
        events,
        player,
        next_school_id,
        ..
    } = ctx;
    let Some(wave) = wave_runtime.as_mut() else {
        return;
    };
    wave.frame += 1;

    // Stress pause: a hard gate re-evaluated every tick.
    if live >= config.stress_threshold {
        if !wave.stress_paused {
            wave.stress_paused = true;
            debug!("stress pause: {} live enemies", live);
            events.push(DirectorEvent::StressPauseStarted { live_enemies: live });
        }
        return;
    }
    if wave.stress_paused {
        wave.stress_paused = false;
        events.push(DirectorEvent::StressPauseEnded);
    }

    // A running breather always finishes, so every start has its end.
    if wave.breather.is_running() {
        if wave.breather.tick() {
            events.push(DirectorEvent::BreatherEnded);
        }
        return;
    }

    if wave.budget.is_exhausted() {
        return;
    }

    wave.since_last_spawn += 1;
    let interval = spawn_interval(
        wave.budget.progress(),
        config.rate_multiplier,
        wave.interval_mult(),
    );
    if wave.since_last_spawn < interval {
        return;
    }
    wave.since_last_spawn = 0;

    let obstacles = spatial.obstacles(arena);
    let mut placer = Placer {
        world,
        rng,
        events,
        factory,
        player: *player,
        half_extent,
        obstacles: &obstacles,
        tick,
    };

    let mut spawned = 0;
    if active_schools < config.max_active_schools
        && placer.rng.gen::<f32>() < config.school_chance
    {
        spawned = placer.try_school(catalog, wave, config.school_size, next_school_id);
    }
    if spawned == 0 {
        let count = if placer.rng.gen::<f32>() < config.burst_chance {
            placer.rng.gen_range(BURST_MIN..=BURST_MAX)
        } else {
            1
        };
        for _ in 0..count {
            if !placer.try_single(catalog, wave) {
                break;
            }
            spawned += 1;
        }
    }

    if spawned == 0 {
        wave.budget.exhaust();
        if !wave.exhaustion_logged {
            wave.exhaustion_logged = true;
            warn!(
                "arena {} wave budget exhausted: nothing in {:?} is affordable ({} spawns)",
                arena, wave.pool, wave.budget.spawn_count
            );
        }
        return;
    }

    if wave.budget.is_exhausted() {
        info!(
            "arena {} spawn phase complete after {} spawns",
            arena, wave.budget.spawn_count
        );
        return;
    }

    if config.breather_every_spawns > 0 && config.breather_frames > 0 {
        wave.spawns_since_breather += spawned;
        if wave.spawns_since_breather >= config.breather_every_spawns {
            wave.spawns_since_breather = 0;
            wave.breather.arm(config.breather_frames);
            placer.events.push(DirectorEvent::BreatherStarted);
        }
    }
}

/// Schools whose leader is still alive.
pub fn active_school_count(world: &World) -> usize {
    world
        .query::<(&SchoolLeader, Option<&Dead>)>()
        .iter()
        .filter(|(_, (_, dead))| dead.is_none())
        .count()
}

/// Borrowed pieces of the context needed to place and create spawns.
struct Placer<'a, 'f> {
    world: &'a mut World,
    rng: &'a mut ChaCha8Rng,
    events: &'a mut Vec<DirectorEvent>,
    factory: &'a mut (dyn EntityFactory + 'f),
    player: PlayerView,
    half_extent: f32,
    obstacles: &'a [Bounds],
    tick: u64,
}

impl Placer<'_, '_> {
    fn next_position(&mut self, wave: &mut WaveRuntime) -> Vec2 {
        choreography::spawn_position(
            &wave.choreography,
            &self.player,
            self.half_extent,
            self.obstacles,
            &mut wave.pincer_flip,
            self.rng,
        )
    }

    fn charge(wave: &mut WaveRuntime, spec: &EnemySpec, members: u32) {
        let new_type = wave.types_spawned.insert(spec.kind);
        wave.budget.commit(&spec.cost, members, new_type);
    }

    fn try_single(&mut self, catalog: &Catalog, wave: &mut WaveRuntime) -> bool {
        let Some(spec) = pool::pick(
            catalog,
            &wave.pool,
            &wave.budget,
            &wave.types_spawned,
            1,
            false,
            self.rng,
        ) else {
            return false;
        };
        Self::charge(wave, spec, 1);

        let position = self.next_position(wave);
        let entity = self.factory.spawn_enemy(self.world, spec.kind, position, self.tick);
        debug!("spawned {:?} at {:?}", spec.kind, position);
        self.events.push(DirectorEvent::EnemySpawned {
            handle: handle_of(entity),
            kind: spec.kind,
            position,
        });
        true
    }

    /// Leader plus formation followers of one type, charged atomically.
    /// Returns the number of members spawned (0 if no type qualified).
    fn try_school(
        &mut self,
        catalog: &Catalog,
        wave: &mut WaveRuntime,
        size: u32,
        next_school_id: &mut u32,
    ) -> u32 {
        let Some(spec) = pool::pick(
            catalog,
            &wave.pool,
            &wave.budget,
            &wave.types_spawned,
            size,
            true,
            self.rng,
        ) else {
            return 0;
        };
        Self::charge(wave, spec, size);

        let school_id = *next_school_id;
        *next_school_id += 1;
        let origin = self.next_position(wave);
        let leader = self.factory.spawn_enemy(self.world, spec.kind, origin, self.tick);
        let _ = self.world.insert_one(leader, SchoolLeader { school_id });
        self.events.push(DirectorEvent::EnemySpawned {
            handle: handle_of(leader),
            kind: spec.kind,
            position: origin,
        });

        let followers = size - 1;
        for i in 0..followers {
            let angle = TAU * i as f32 / followers as f32;
            let offset = Vec2::new(angle.sin(), angle.cos()) * SCHOOL_SPACING;
            let position = choreography::nudge_clear(
                origin + offset,
                self.obstacles,
                self.half_extent - SPAWN_EDGE_INSET,
            );
            let entity = self.factory.spawn_school_follower(
                self.world, spec.kind, position, self.tick, school_id, offset,
            );
            self.events.push(DirectorEvent::EnemySpawned {
                handle: handle_of(entity),
                kind: spec.kind,
                position,
            });
        }

        debug!("school {} of {:?} ({} followers)", school_id, spec.kind, followers);
        self.events.push(DirectorEvent::SchoolSpawned {
            leader: handle_of(leader),
            kind: spec.kind,
            followers,
        });
        size
    }
}
