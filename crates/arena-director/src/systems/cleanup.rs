//! Cleanup system: compacts tombstoned entities at the tick boundary.

use hecs::{Entity, World};

use arena_core::components::Dead;

/// Despawn every entity carrying `Dead`.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, _dead) in world.query_mut::<&Dead>() {
        despawn_buffer.push(entity);
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::components::{Enemy, Position};
    use arena_core::enums::EnemyKind;
    use glam::Vec2;

    #[test]
    fn only_tombstoned_entities_are_removed() {
        let mut world = World::new();
        let enemy = Enemy {
            kind: EnemyKind::Grunt,
            spawned_tick: 0,
        };
        let alive = world.spawn((Position(Vec2::ZERO), enemy));
        let dead = world.spawn((Position(Vec2::ONE), enemy, Dead));

        let mut buffer = Vec::new();
        run(&mut world, &mut buffer);

        assert!(world.contains(alive));
        assert!(!world.contains(dead));
        assert!(buffer.is_empty());
    }
}
