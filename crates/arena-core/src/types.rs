//! Fundamental geometric and simulation types.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::{ChoreographyKind, Direction};

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each active tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        1.0 / crate::constants::TICK_RATE as f64
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// Opaque, comparable handle to a live entity, stable for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityHandle(pub u64);

/// What the core needs to know about the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Ground-plane position (x, z).
    pub position: Vec2,
    /// Facing in radians, 0 = North (+z), clockwise.
    pub facing: f32,
}

impl PlayerView {
    /// Unit vector the player is looking along.
    pub fn facing_dir(&self) -> Vec2 {
        Vec2::new(self.facing.sin(), self.facing.cos())
    }
}

/// Spawn layout for one wave. Fixed for the wave's duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnChoreography {
    pub kind: ChoreographyKind,
    pub primary: Direction,
    pub secondary: Direction,
}

impl Default for SpawnChoreography {
    fn default() -> Self {
        Self {
            kind: ChoreographyKind::Random,
            primary: Direction::North,
            secondary: Direction::South,
        }
    }
}

/// Axis-aligned obstacle or hazard footprint on the arena floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square footprint of half-size `half` centred at `center`.
    pub fn around(center: Vec2, half: f32) -> Self {
        Self::new(center - Vec2::splat(half), center + Vec2::splat(half))
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Bearing from `from` to `to` in radians (0 = North, clockwise).
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.x.atan2(d.y).rem_euclid(std::f32::consts::TAU)
}

/// Smallest absolute difference between two angles (radians).
pub fn angle_between(a: f32, b: f32) -> f32 {
    let diff = (a - b).rem_euclid(std::f32::consts::TAU);
    diff.min(std::f32::consts::TAU - diff)
}
