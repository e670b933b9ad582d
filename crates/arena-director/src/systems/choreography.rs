//! Spawn positions per choreography pattern, with the fairness rules for
//! random spawns and obstacle nudging.

use std::f32::consts::TAU;

use glam::Vec2;
use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use arena_core::constants::*;
use arena_core::enums::{ChoreographyKind, Direction};
use arena_core::types::{angle_between, bearing, Bounds, PlayerView, SpawnChoreography};

const KINDS: [ChoreographyKind; 3] = [
    ChoreographyKind::Lane,
    ChoreographyKind::Pincer,
    ChoreographyKind::Random,
];

/// Pick the wave's pattern. Fixed until the wave ends.
pub fn choose(rng: &mut ChaCha8Rng) -> SpawnChoreography {
    let kind = KINDS[rng.gen_range(0..KINDS.len())];
    let primary = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
    SpawnChoreography {
        kind,
        primary,
        secondary: primary.opposite(),
    }
}

/// Where the next spawn goes. `pincer_flip` alternates pincer sides.
pub fn spawn_position(
    choreography: &SpawnChoreography,
    player: &PlayerView,
    half_extent: f32,
    obstacles: &[Bounds],
    pincer_flip: &mut bool,
    rng: &mut ChaCha8Rng,
) -> Vec2 {
    let limit = (half_extent - SPAWN_EDGE_INSET).max(1.0);
    let candidate = match choreography.kind {
        ChoreographyKind::Lane => edge_point(choreography.primary, limit, rng),
        ChoreographyKind::Pincer => {
            let side = if *pincer_flip {
                choreography.secondary
            } else {
                choreography.primary
            };
            *pincer_flip = !*pincer_flip;
            edge_point(side, limit, rng)
        }
        ChoreographyKind::Random => random_point(player, half_extent, limit, rng),
    };
    nudge_clear(candidate, obstacles, limit)
}

/// A point on the arena edge facing `direction`, jittered along the edge.
fn edge_point(direction: Direction, limit: f32, rng: &mut ChaCha8Rng) -> Vec2 {
    let normal = direction.unit();
    let along = normal.perp();
    let jitter = rng.gen_range(-1.0..=1.0) * limit * LANE_JITTER_FRACTION;
    normal * limit + along * jitter
}

/// Sample around the player, never inside their view cone. Large arenas
/// also keep spawns out of the corners and the central corridors.
fn random_point(player: &PlayerView, half_extent: f32, limit: f32, rng: &mut ChaCha8Rng) -> Vec2 {
    let large = half_extent >= LARGE_ARENA_HALF_EXTENT;
    let max_distance = limit.max(RANDOM_SPAWN_MIN_DISTANCE);

    for _ in 0..RANDOM_SPAWN_ATTEMPTS {
        let angle = rng.gen_range(0.0..TAU);
        let distance = rng.gen_range(RANDOM_SPAWN_MIN_DISTANCE..=max_distance);
        let offset = Vec2::new(angle.sin(), angle.cos()) * distance;
        let candidate = clamp_to_arena(player.position + offset, limit);

        if candidate.distance(player.position) < f32::EPSILON {
            continue;
        }
        let relative = angle_between(bearing(player.position, candidate), player.facing);
        if relative < FACING_EXCLUSION_HALF_ANGLE {
            continue;
        }
        if large && (in_corner(candidate, limit) || in_corridor(candidate)) {
            continue;
        }
        return candidate;
    }

    debug!("random spawn attempts exhausted; spawning behind the player");
    clamp_to_arena(
        player.position - player.facing_dir() * RANDOM_SPAWN_MIN_DISTANCE,
        limit,
    )
}

pub fn in_corner(point: Vec2, limit: f32) -> bool {
    let edge = limit * CORNER_EXCLUSION_FRACTION;
    point.x.abs() > edge && point.y.abs() > edge
}

pub fn in_corridor(point: Vec2) -> bool {
    point.x.abs() < CORRIDOR_HALF_WIDTH || point.y.abs() < CORRIDOR_HALF_WIDTH
}

fn clamp_to_arena(point: Vec2, limit: f32) -> Vec2 {
    point.clamp(Vec2::splat(-limit), Vec2::splat(limit))
}

/// Push a candidate out of any obstacle it overlaps. Best effort: after
/// `SPAWN_NUDGE_ATTEMPTS` steps the last position is used as is.
pub fn nudge_clear(candidate: Vec2, obstacles: &[Bounds], limit: f32) -> Vec2 {
    let Some(blocking) = obstacles.iter().find(|b| b.contains(candidate)) else {
        return candidate;
    };

    let mut away = (candidate - blocking.center()).normalize_or_zero();
    if away == Vec2::ZERO {
        away = -candidate.normalize_or_zero();
    }
    if away == Vec2::ZERO {
        away = Vec2::X;
    }

    let mut point = candidate;
    for step in 1..=SPAWN_NUDGE_ATTEMPTS {
        point = clamp_to_arena(candidate + away * SPAWN_NUDGE_STEP * step as f32, limit);
        if !obstacles.iter().any(|b| b.contains(point)) {
            return point;
        }
    }
    debug!("spawn at {:?} could not be nudged clear", candidate);
    point
}
