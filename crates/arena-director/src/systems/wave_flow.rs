//! Wave state machine.
//!
//! ```text
//! WaveIntro -> WaveActive -> WaveClear -> WaveIntro
//!                                      -> BossIntro -> BossActive -> BossDefeated
//!                                                                 -> BossRetreat (chase)
//! BossRetreat -> WaveIntro
//! BossDefeated -> ArenaTransition -> WaveIntro (next arena)
//! ```
//!
//! Timed states advance when their countdown finishes. `WaveActive` ends when
//! the budget is spent and nothing is alive; `BossActive` ends on retreat or
//! defeat. This system runs first each tick so the scheduler and the boss
//! engine only see a settled state.

use glam::Vec2;
use log::{debug, info, warn};

use arena_boss_ai::{BossBuilder, ChaseEncounterController};
use arena_core::catalog::Catalog;
use arena_core::components::Dead;
use arena_core::constants::*;
use arena_core::enums::{BossArchetypeId, Direction, RunPhase, WaveState};
use arena_core::events::DirectorEvent;

use crate::collaborators::EntityFactory;
use crate::config::DirectorConfig;
use crate::context::{
    handle_of, live_enemy_count, live_fragment_count, ActiveBoss, SimulationContext, WaveRuntime,
};
use crate::systems::{budget, choreography, pool};

/// How far toward the north wall the boss appears, as a fraction of the
/// half extent.
const BOSS_SPAWN_DEPTH: f32 = 0.5;

/// Enter `arena` at its lesson wave.
pub fn start_arena(
    ctx: &mut SimulationContext,
    catalog: &Catalog,
    config: &DirectorConfig,
    arena: u32,
) {
    let Some(spec) = catalog.arena(arena) else {
        warn!("arena {} is not in the catalog", arena);
        return;
    };
    ctx.arena = arena;
    ctx.wave = 1;
    ctx.boss_due = false;
    ctx.chase = spec
        .chase
        .as_ref()
        .map(|chase| ChaseEncounterController::new(chase, config.chase_retreat_margin));
    ctx.pillar_cache.invalidate();
    info!(
        "arena {} begins: {} waves, boss {:?}{}",
        arena,
        spec.max_waves(),
        spec.boss,
        if ctx.chase.is_some() { " (chase)" } else { "" }
    );
    begin_wave(ctx, catalog, config);
}

/// Classify, budget and lay out the current wave, then enter its intro.
pub fn begin_wave(ctx: &mut SimulationContext, catalog: &Catalog, config: &DirectorConfig) {
    let Some(arena) = catalog.arena(ctx.arena) else {
        return;
    };
    let wave_type = budget::classify_wave(arena, ctx.chase.as_ref(), ctx.wave);
    let modifier = budget::roll_modifier(catalog, wave_type, config.modifier_chance, &mut ctx.rng);
    let threat = budget::allocate(catalog, ctx.arena, wave_type, modifier.as_ref());
    let enemies = pool::build_pool(catalog, ctx.arena, ctx.wave, wave_type, modifier.as_ref());
    let layout = choreography::choose(&mut ctx.rng);

    info!(
        "arena {} wave {} ({:?}): budget {}, cognitive cap {}, pool {:?}, {:?} from {:?}",
        ctx.arena,
        ctx.wave,
        wave_type,
        threat.total,
        threat.cognitive_max,
        enemies,
        layout.kind,
        layout.primary
    );

    ctx.emit(DirectorEvent::WaveStarted {
        arena: ctx.arena,
        wave: ctx.wave,
        wave_type,
    });
    if let Some(modifier) = &modifier {
        ctx.announcement.arm(ANNOUNCEMENT_FRAMES);
        ctx.emit(DirectorEvent::ModifierAnnounced {
            id: modifier.id.clone(),
            text: modifier.announcement.clone(),
        });
    }
    ctx.wave_runtime = Some(WaveRuntime::new(wave_type, threat, enemies, modifier, layout));
    ctx.enter(WaveState::WaveIntro, WAVE_INTRO_FRAMES);
}

pub fn run(
    ctx: &mut SimulationContext,
    catalog: &Catalog,
    config: &DirectorConfig,
    factory: &mut dyn EntityFactory,
) {
    let timer_done = ctx.state_timer.tick();

    match ctx.wave_state {
        WaveState::WaveIntro => {
            if timer_done {
                debug!("wave {} spawning", ctx.wave);
                ctx.wave_state = WaveState::WaveActive;
            }
        }
        WaveState::WaveActive => {
            let spent = ctx
                .wave_runtime
                .as_ref()
                .map_or(true, |wave| wave.budget.is_exhausted());
            if spent && ctx.boss.is_none() && live_enemy_count(&ctx.world) == 0 {
                clear_wave(ctx, catalog);
            }
        }
        WaveState::WaveClear => {
            if timer_done {
                if ctx.boss_due {
                    begin_boss_intro(ctx, catalog);
                } else {
                    ctx.wave += 1;
                    begin_wave(ctx, catalog, config);
                }
            }
        }
        WaveState::BossIntro => {
            if timer_done {
                spawn_boss(ctx, catalog, factory);
            }
        }
        WaveState::BossActive => resolve_boss(ctx),
        WaveState::BossRetreat => {
            if timer_done {
                remove_boss(ctx);
                ctx.wave += 1;
                begin_wave(ctx, catalog, config);
            }
        }
        WaveState::BossDefeated => {
            if timer_done {
                remove_boss(ctx);
                info!("arena {} complete", ctx.arena);
                ctx.emit(DirectorEvent::ArenaCompleted { arena: ctx.arena });
                ctx.enter(WaveState::ArenaTransition, ARENA_TRANSITION_FRAMES);
            }
        }
        WaveState::ArenaTransition => {
            if timer_done {
                if ctx.arena >= catalog.last_arena() {
                    info!("run complete after arena {}", ctx.arena);
                    ctx.run_phase = RunPhase::Complete;
                    ctx.emit(DirectorEvent::RunCompleted);
                } else {
                    let next = ctx.arena + 1;
                    ctx.clear_arena();
                    start_arena(ctx, catalog, config, next);
                }
            }
        }
    }
}

fn clear_wave(ctx: &mut SimulationContext, catalog: &Catalog) {
    ctx.wave_runtime = None;
    ctx.emit(DirectorEvent::WaveCleared {
        arena: ctx.arena,
        wave: ctx.wave,
    });
    ctx.boss_due = match ctx.chase.as_mut() {
        Some(chase) => chase.record_wave_cleared(),
        None => catalog
            .arena(ctx.arena)
            .map_or(true, |arena| ctx.wave >= arena.waves),
    };
    info!(
        "arena {} wave {} cleared{}",
        ctx.arena,
        ctx.wave,
        if ctx.boss_due { "; boss next" } else { "" }
    );
    ctx.enter(WaveState::WaveClear, WAVE_CLEAR_FRAMES);
}

fn begin_boss_intro(ctx: &mut SimulationContext, catalog: &Catalog) {
    ctx.boss_due = false;
    let Some(arena) = catalog.arena(ctx.arena) else {
        return;
    };
    ctx.emit(DirectorEvent::BossIntroStarted {
        arena: ctx.arena,
        boss: arena.boss,
    });
    ctx.enter(WaveState::BossIntro, BOSS_INTRO_FRAMES);
}

fn spawn_boss(ctx: &mut SimulationContext, catalog: &Catalog, factory: &mut dyn EntityFactory) {
    let Some(arena) = catalog.arena(ctx.arena) else {
        return;
    };
    let Some(archetype) = catalog.boss(arena.boss) else {
        warn!(
            "arena {} names boss {:?} with no archetype; skipping the fight",
            ctx.arena, arena.boss
        );
        ctx.emit(DirectorEvent::ArenaCompleted { arena: ctx.arena });
        ctx.enter(WaveState::ArenaTransition, ARENA_TRANSITION_FRAMES);
        return;
    };

    let position = Direction::North.unit() * arena.half_extent * BOSS_SPAWN_DEPTH;
    let engine = match ctx.chase.as_mut() {
        Some(chase) => {
            let mut engine = chase.spawn_boss(archetype);
            engine.state_mut().stuck.rebase(position);
            engine
        }
        None => BossBuilder::new(archetype).position(position).build(),
    };
    let entity = factory.spawn_boss(&mut ctx.world, ctx.arena, archetype.id, position);
    ctx.boss_position = position;

    let state = engine.state();
    info!(
        "{:?} enters arena {} in phase {} with {:.0} health",
        archetype.id,
        ctx.arena,
        state.phase.number(),
        state.health
    );
    ctx.emit(DirectorEvent::BossSpawned {
        handle: handle_of(entity),
        boss: archetype.id,
        phase: state.phase,
        health: state.health,
    });
    ctx.boss = Some(ActiveBoss { entity, engine });
    ctx.enter(WaveState::BossActive, 0);
}

enum Resolution {
    Fighting,
    Retreat { health: f32, waves: u32 },
    Defeat(BossArchetypeId),
}

/// Retreat is checked before defeat, so a chase boss knocked straight to
/// zero in a non-final phase still withdraws.
fn resolve_boss(ctx: &mut SimulationContext) {
    let fragments = live_fragment_count(&ctx.world);
    let Some(active) = ctx.boss.as_mut() else {
        return;
    };

    let resolution = match ctx.chase.as_mut() {
        Some(chase) if chase.should_retreat(&active.engine) => {
            let waves = chase.retreat(&mut active.engine);
            Resolution::Retreat {
                health: active.engine.state().health,
                waves,
            }
        }
        _ if active.engine.state().health <= 0.0 && fragments == 0 => {
            Resolution::Defeat(active.engine.state().archetype)
        }
        _ => Resolution::Fighting,
    };

    match resolution {
        Resolution::Fighting => {}
        Resolution::Retreat { health, waves } => {
            ctx.emit(DirectorEvent::BossRetreated {
                health,
                waves_until_return: waves,
            });
            ctx.enter(WaveState::BossRetreat, BOSS_RETREAT_FRAMES);
        }
        Resolution::Defeat(boss) => {
            info!("{:?} defeated in arena {}", boss, ctx.arena);
            ctx.emit(DirectorEvent::BossDefeated { boss });
            ctx.enter(WaveState::BossDefeated, BOSS_DEFEATED_FRAMES);
        }
    }
}

fn remove_boss(ctx: &mut SimulationContext) {
    if let Some(boss) = ctx.boss.take() {
        let _ = ctx.world.insert_one(boss.entity, Dead);
    }
    ctx.boss_position = Vec2::ZERO;
}
