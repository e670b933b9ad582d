//! Threat budget bookkeeping for a single wave.

use serde::{Deserialize, Serialize};

/// Static per-type spawn cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpawnCost {
    pub durability: u32,
    pub damage: u32,
    /// Cognitive weight charged the first time the type appears in a wave.
    pub cognitive: u32,
}

impl EnemySpawnCost {
    pub const fn new(durability: u32, damage: u32, cognitive: u32) -> Self {
        Self {
            durability,
            damage,
            cognitive,
        }
    }

    /// Budget points deducted per spawn.
    pub fn total(&self) -> u32 {
        self.durability + self.damage
    }
}

/// Per-wave resource pool. Created at wave start, mutated only by the
/// spawn scheduler, discarded when the wave clears.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatBudget {
    pub total: u32,
    pub remaining: u32,
    pub cognitive_max: u32,
    pub cognitive_used: u32,
    pub spawn_count: u32,
}

impl ThreatBudget {
    pub fn new(total: u32, cognitive_max: u32) -> Self {
        Self {
            total,
            remaining: total,
            cognitive_max,
            cognitive_used: 0,
            spawn_count: 0,
        }
    }

    pub fn can_afford(&self, points: u32) -> bool {
        points <= self.remaining
    }

    /// Whether adding `cognitive` more would stay within the cap.
    pub fn fits_cognitive(&self, cognitive: u32) -> bool {
        self.cognitive_used + cognitive <= self.cognitive_max
    }

    /// Fraction of the budget already spent, 0.0..=1.0.
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        1.0 - self.remaining as f32 / self.total as f32
    }

    /// Deduct `count` spawns of one type. `new_type` charges the cognitive
    /// weight once. Callers check affordability and the cap first.
    pub fn commit(&mut self, cost: &EnemySpawnCost, count: u32, new_type: bool) {
        let points = cost.total() * count;
        debug_assert!(self.can_afford(points));
        self.remaining = self.remaining.saturating_sub(points);
        if new_type {
            self.cognitive_used += cost.cognitive;
        }
        self.spawn_count += count;
    }

    /// Nothing left is affordable: the wave's spawn phase is over.
    pub fn exhaust(&mut self) {
        self.remaining = 0;
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}
