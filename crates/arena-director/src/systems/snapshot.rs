//! Snapshot system: builds the director's visible state after each tick.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use arena_boss_ai::ChaseEncounterController;
use arena_core::events::DirectorEvent;
use arena_core::state::*;

use crate::context::{
    live_enemy_count, live_fragment_count, live_fragment_health, ActiveBoss, SimulationContext,
    WaveRuntime,
};

/// Build a complete DirectorSnapshot from the current context.
pub fn build_snapshot(ctx: &SimulationContext, events: Vec<DirectorEvent>) -> DirectorSnapshot {
    DirectorSnapshot {
        time: ctx.time,
        run_phase: ctx.run_phase,
        paused: ctx.paused,
        announcing: ctx.announcement.is_running(),
        arena: ctx.arena,
        wave: ctx.wave,
        wave_state: ctx.wave_state,
        spawn: ctx.wave_runtime.as_ref().map(build_wave),
        live_enemies: live_enemy_count(&ctx.world),
        boss: ctx.boss.as_ref().map(|boss| build_boss(boss, &ctx.world)),
        chase: ctx.chase.as_ref().map(build_chase),
        events,
    }
}

fn build_wave(wave: &WaveRuntime) -> WaveView {
    WaveView {
        wave_type: wave.wave_type,
        budget: wave.budget,
        pool: wave.pool.clone(),
        modifier: wave.modifier.as_ref().map(|m| m.id.clone()),
        choreography: wave.choreography,
        stress_paused: wave.stress_paused,
        in_breather: wave.breather.is_running(),
    }
}

fn build_boss(boss: &ActiveBoss, world: &World) -> BossView {
    let state = boss.engine.state();
    BossView {
        archetype: state.archetype,
        health: state.health,
        max_health: state.max_health,
        phase: state.phase,
        ai_state: state.ai_state,
        invulnerable: state.is_invulnerable(),
        exposed: state.is_exposed(),
        live_fragments: live_fragment_count(world),
        fragment_health: live_fragment_health(world),
    }
}

fn build_chase(chase: &ChaseEncounterController) -> ChaseView {
    let state = chase.state();
    ChaseView {
        segment: state.segment,
        phase_to_spawn: state.boss_phase_to_spawn,
        encounter_count: state.encounter_count,
        persistent_health: state.persistent_health,
        waves_until_return: chase.waves_until_return(),
    }
}
