//! Boss system: ticks the ability engine and turns its actions into world
//! changes and presentation events.

use std::f32::consts::TAU;

use glam::Vec2;
use log::{debug, info};

use arena_boss_ai::{BossAction, BossInput};
use arena_core::constants::FRAGMENT_SPREAD;
use arena_core::events::DirectorEvent;

use crate::collaborators::{EntityFactory, SpatialQuery};
use crate::context::SimulationContext;

pub fn run(
    ctx: &mut SimulationContext,
    factory: &mut dyn EntityFactory,
    spatial: &dyn SpatialQuery,
) {
    let SimulationContext {
        world,
        rng,
        boss,
        player,
        boss_position,
        pillar_cache,
        events,
        arena,
        ..
    } = ctx;
    let Some(active) = boss.as_mut() else {
        return;
    };

    let input = BossInput {
        position: *boss_position,
        player: player.position,
        pillars: pillar_cache.get(*arena, spatial),
    };
    let actions = active.engine.tick(&input, rng);

    for action in actions {
        let event = match action {
            BossAction::TellStarted { ability, frames } => {
                DirectorEvent::BossTellStarted { ability, frames }
            }
            BossAction::AbilityExecuted { ability, target } => {
                DirectorEvent::BossAbilityExecuted { ability, target }
            }
            BossAction::ComboStarted { abilities } => {
                DirectorEvent::BossComboStarted { abilities }
            }
            BossAction::PhaseChanged { phase } => {
                info!("{:?} entered phase {}", active.engine.state().archetype, phase.number());
                DirectorEvent::BossPhaseChanged { phase }
            }
            BossAction::ShieldRaised => DirectorEvent::BossShieldRaised,
            BossAction::Exposed => DirectorEvent::BossExposed,
            BossAction::Fragment { copies, health } => {
                for i in 0..copies {
                    let angle = TAU * i as f32 / copies.max(1) as f32;
                    let offset = Vec2::new(angle.sin(), angle.cos()) * FRAGMENT_SPREAD;
                    factory.spawn_fragment(world, *boss_position + offset, health);
                }
                DirectorEvent::BossFragmented { copies }
            }
            BossAction::Reposition { target } => DirectorEvent::BossRepositioned { target },
            BossAction::Defeated => {
                debug!("boss engine reports defeat");
                continue;
            }
        };
        events.push(event);
    }
}
