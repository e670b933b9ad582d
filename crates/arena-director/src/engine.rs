//! The director: the pacing engine's single entry point.
//!
//! `Director` owns the ECS world and every piece of run state, processes
//! queued commands at the tick boundary, runs the systems, and produces a
//! `DirectorSnapshot` per tick. Completely headless, so a seed and a command
//! script replay identically.

use std::collections::VecDeque;

use hecs::{Entity, World};
use log::{debug, info};

use arena_boss_ai::{BossRuntimeState, ChaseState};
use arena_core::catalog::Catalog;
use arena_core::commands::DirectorCommand;
use arena_core::components::{BossFragment, Dead, Enemy, Position};
use arena_core::enums::{RunPhase, WaveState};
use arena_core::state::DirectorSnapshot;
use arena_core::types::{EntityHandle, PlayerView, SimTime};

use crate::collaborators::{EntityFactory, EventSink, OpenArena, SpatialQuery, WorldFactory};
use crate::config::DirectorConfig;
use crate::context::{entity_of, live_enemy_handles, SimulationContext};
use crate::systems;

pub struct Director {
    ctx: SimulationContext,
    catalog: Catalog,
    config: DirectorConfig,
    command_queue: VecDeque<DirectorCommand>,
    despawn_buffer: Vec<Entity>,
    factory: Box<dyn EntityFactory>,
    spatial: Box<dyn SpatialQuery>,
    sinks: Vec<Box<dyn EventSink>>,
}

impl Director {
    /// Director over the builtin catalog.
    pub fn new(config: DirectorConfig) -> Self {
        Self::with_catalog(config, Catalog::builtin())
    }

    /// Director over a custom catalog. The starting arena is clamped into
    /// the catalog's range.
    pub fn with_catalog(mut config: DirectorConfig, catalog: Catalog) -> Self {
        let last = catalog.last_arena().max(1);
        config.start_arena = config.start_arena.clamp(1, last);
        Self {
            ctx: SimulationContext::new(config.seed),
            catalog,
            config,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            factory: Box::new(WorldFactory),
            spatial: Box::new(OpenArena),
            sinks: Vec::new(),
        }
    }

    pub fn with_factory(mut self, factory: impl EntityFactory + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }

    pub fn with_spatial(mut self, spatial: impl SpatialQuery + 'static) -> Self {
        self.spatial = Box::new(spatial);
        self
    }

    /// Register an observer. Sinks see every event in emission order,
    /// before the snapshot is returned.
    pub fn add_sink(&mut self, sink: impl EventSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: DirectorCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = DirectorCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance one frame and return the resulting snapshot.
    pub fn tick(&mut self) -> DirectorSnapshot {
        self.process_commands();

        if self.ctx.run_phase == RunPhase::Running && !self.ctx.paused {
            if self.ctx.announcement.is_running() {
                if self.ctx.announcement.tick() {
                    debug!("modifier announcement finished");
                }
            } else {
                self.run_systems();
            }
            self.ctx.time.advance();
        }

        let events = std::mem::take(&mut self.ctx.events);
        for sink in &mut self.sinks {
            for event in &events {
                sink.emit(event);
            }
        }
        systems::snapshot::build_snapshot(&self.ctx, events)
    }

    pub fn run_phase(&self) -> RunPhase {
        self.ctx.run_phase
    }

    pub fn wave_state(&self) -> WaveState {
        self.ctx.wave_state
    }

    pub fn arena(&self) -> u32 {
        self.ctx.arena
    }

    pub fn wave(&self) -> u32 {
        self.ctx.wave
    }

    pub fn time(&self) -> SimTime {
        self.ctx.time
    }

    pub fn is_paused(&self) -> bool {
        self.ctx.paused
    }

    pub fn world(&self) -> &World {
        &self.ctx.world
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }

    /// Handles of every live enemy and boss fragment.
    pub fn live_enemies(&self) -> Vec<EntityHandle> {
        live_enemy_handles(&self.ctx.world)
    }

    pub fn boss_state(&self) -> Option<&BossRuntimeState> {
        self.ctx.boss.as_ref().map(|boss| boss.engine.state())
    }

    pub fn chase_state(&self) -> Option<&ChaseState> {
        self.ctx.chase.as_ref().map(|chase| chase.state())
    }

    #[cfg(test)]
    pub(crate) fn context_mut(&mut self) -> &mut SimulationContext {
        &mut self.ctx
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Commands that do not apply in the current state are ignored.
    fn handle_command(&mut self, command: DirectorCommand) {
        match command {
            DirectorCommand::StartRun => {
                if matches!(self.ctx.run_phase, RunPhase::NotStarted | RunPhase::Complete) {
                    info!("run starts at arena {}", self.config.start_arena);
                    self.ctx.clear_arena();
                    self.ctx.time = SimTime::default();
                    self.ctx.paused = false;
                    self.ctx.run_phase = RunPhase::Running;
                    let arena = self.config.start_arena;
                    systems::wave_flow::start_arena(
                        &mut self.ctx,
                        &self.catalog,
                        &self.config,
                        arena,
                    );
                }
            }
            DirectorCommand::RestartArena => {
                if self.ctx.run_phase == RunPhase::Running {
                    let arena = self.ctx.arena;
                    info!("restarting arena {}", arena);
                    self.ctx.clear_arena();
                    systems::wave_flow::start_arena(
                        &mut self.ctx,
                        &self.catalog,
                        &self.config,
                        arena,
                    );
                }
            }
            DirectorCommand::Pause => {
                if self.ctx.run_phase == RunPhase::Running {
                    self.ctx.paused = true;
                }
            }
            DirectorCommand::Resume => {
                self.ctx.paused = false;
            }
            DirectorCommand::SkipCutscene => {
                if self.ctx.wave_state == WaveState::BossIntro {
                    debug!("boss intro skipped");
                    self.ctx.state_timer.cancel();
                }
            }
            DirectorCommand::EnemyDied { handle } => {
                let Some(entity) = entity_of(handle) else {
                    return;
                };
                let world = &mut self.ctx.world;
                let killable = world.get::<&Enemy>(entity).is_ok()
                    || world.get::<&BossFragment>(entity).is_ok();
                if killable && world.get::<&Dead>(entity).is_err() {
                    let _ = world.insert_one(entity, Dead);
                }
            }
            DirectorCommand::DamageBoss { amount } => {
                if self.ctx.wave_state != WaveState::BossActive {
                    return;
                }
                if let Some(boss) = self.ctx.boss.as_mut() {
                    let dealt = boss.engine.apply_damage(amount);
                    debug!(
                        "boss took {:.1} ({:.1} requested), {:.1} left",
                        dealt,
                        amount,
                        boss.engine.state().health
                    );
                }
            }
            DirectorCommand::UpdatePlayer { position, facing } => {
                self.ctx.player = PlayerView { position, facing };
            }
            DirectorCommand::UpdateBossPosition { position } => {
                self.ctx.boss_position = position;
                if let Some(boss) = &self.ctx.boss {
                    if let Ok(mut body) = self.ctx.world.get::<&mut Position>(boss.entity) {
                        body.0 = position;
                    }
                }
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Wave state machine
        systems::wave_flow::run(
            &mut self.ctx,
            &self.catalog,
            &self.config,
            self.factory.as_mut(),
        );
        // 2. Exactly one of the scheduler or the boss engine
        match self.ctx.wave_state {
            WaveState::WaveActive => systems::spawn_scheduler::run(
                &mut self.ctx,
                &self.catalog,
                &self.config,
                self.factory.as_mut(),
                self.spatial.as_ref(),
            ),
            WaveState::BossActive => {
                systems::boss::run(&mut self.ctx, self.factory.as_mut(), self.spatial.as_ref())
            }
            _ => {}
        }
        // 3. School leadership
        systems::school::run(
            &mut self.ctx.world,
            self.config.school_policy,
            &mut self.ctx.events,
        );
        // 4. Cleanup (tombstones)
        systems::cleanup::run(&mut self.ctx.world, &mut self.despawn_buffer);
    }
}
