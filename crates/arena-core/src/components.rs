//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::{BossArchetypeId, EnemyKind};

/// Ground-plane position (x, z).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

/// A scheduler-spawned enemy. Counts toward the live-enemy total.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Tick the enemy was created.
    pub spawned_tick: u64,
}

/// Leader of a school formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolLeader {
    pub school_id: u32,
}

/// Follower slot in a school formation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchoolMember {
    pub school_id: u32,
    /// Formation offset from the leader.
    pub offset: Vec2,
}

/// The boss body. At most one per arena.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BossBody {
    pub archetype: BossArchetypeId,
}

/// A weaker copy split off the boss. Counts as a live enemy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BossFragment {
    pub health: f32,
}

/// Tombstone. The entity died this tick and is compacted at the tick boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Dead;
