//! Seams to the systems the director does not own: entity creation,
//! arena geometry and presentation.
//!
//! Every trait method has a default, so `WorldFactory`, `OpenArena` and a
//! plain `Vec<DirectorEvent>` are complete implementations. A game shell
//! overrides only what it needs (meshes, obstacle lookup, HUD).

use glam::Vec2;
use hecs::{Entity, World};

use arena_core::components::*;
use arena_core::enums::{BossArchetypeId, EnemyKind};
use arena_core::events::DirectorEvent;
use arena_core::types::Bounds;

/// Creates entities on request of the scheduler and the boss flow.
pub trait EntityFactory {
    fn spawn_enemy(
        &mut self,
        world: &mut World,
        kind: EnemyKind,
        position: Vec2,
        tick: u64,
    ) -> Entity {
        world.spawn((
            Position(position),
            Enemy {
                kind,
                spawned_tick: tick,
            },
        ))
    }

    fn spawn_school_follower(
        &mut self,
        world: &mut World,
        kind: EnemyKind,
        position: Vec2,
        tick: u64,
        school_id: u32,
        offset: Vec2,
    ) -> Entity {
        world.spawn((
            Position(position),
            Enemy {
                kind,
                spawned_tick: tick,
            },
            SchoolMember { school_id, offset },
        ))
    }

    fn spawn_boss(
        &mut self,
        world: &mut World,
        _arena: u32,
        archetype: BossArchetypeId,
        position: Vec2,
    ) -> Entity {
        world.spawn((Position(position), BossBody { archetype }))
    }

    fn spawn_fragment(&mut self, world: &mut World, position: Vec2, health: f32) -> Entity {
        world.spawn((Position(position), BossFragment { health }))
    }
}

/// Plain ECS factory with no presentation side effects.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorldFactory;

impl EntityFactory for WorldFactory {}

/// Arena geometry lookups.
pub trait SpatialQuery {
    /// Obstacle and hazard footprints a spawn must not overlap.
    fn obstacles(&self, _arena: u32) -> Vec<Bounds> {
        Vec::new()
    }

    /// Perch points for pillar abilities.
    fn pillars(&self, _arena: u32) -> Vec<Vec2> {
        Vec::new()
    }
}

/// An empty floor.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenArena;

impl SpatialQuery for OpenArena {}

/// Fixed geometry shared by every arena.
#[derive(Debug, Default, Clone)]
pub struct StaticLayout {
    pub obstacles: Vec<Bounds>,
    pub pillars: Vec<Vec2>,
}

impl SpatialQuery for StaticLayout {
    fn obstacles(&self, _arena: u32) -> Vec<Bounds> {
        self.obstacles.clone()
    }

    fn pillars(&self, _arena: u32) -> Vec<Vec2> {
        self.pillars.clone()
    }
}

/// Observer on the director's event bus.
pub trait EventSink {
    fn emit(&mut self, event: &DirectorEvent);
}

impl EventSink for Vec<DirectorEvent> {
    fn emit(&mut self, event: &DirectorEvent) {
        self.push(event.clone());
    }
}

