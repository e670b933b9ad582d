//! Capability sets and the archetype-keyed builder for boss instances.

use std::collections::BTreeMap;

use glam::Vec2;

use arena_core::catalog::BossArchetype;
use arena_core::countdown::Countdown;
use arena_core::enums::{BossAiState, BossPhase};

use crate::engine::BossAbilityEngine;
use crate::state::{BossRuntimeState, StuckTracker};

/// What an archetype can do beyond selecting abilities. Derived once from
/// the catalog instead of probing optional config every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub has_shield: bool,
    pub has_exposed: bool,
    pub has_split: bool,
    pub has_pillar_perch: bool,
    pub has_teleport: bool,
}

impl Capabilities {
    pub fn from_archetype(archetype: &BossArchetype) -> Self {
        Self {
            has_shield: archetype.shield.is_some(),
            has_exposed: archetype.exposed.is_some(),
            has_split: archetype.split.is_some(),
            has_pillar_perch: archetype.pillar_perch,
            has_teleport: archetype.teleport,
        }
    }

    /// Only the capabilities present in both sets.
    pub fn intersect(self, other: Capabilities) -> Self {
        Self {
            has_shield: self.has_shield && other.has_shield,
            has_exposed: self.has_exposed && other.has_exposed,
            has_split: self.has_split && other.has_split,
            has_pillar_perch: self.has_pillar_perch && other.has_pillar_perch,
            has_teleport: self.has_teleport && other.has_teleport,
        }
    }
}

/// Builds a `BossAbilityEngine` for one archetype.
pub struct BossBuilder {
    archetype: BossArchetype,
    phase: BossPhase,
    phase_lock: bool,
    health: Option<f32>,
    retreat_threshold: Option<f32>,
    position: Vec2,
    capabilities: Option<Capabilities>,
}

impl BossBuilder {
    pub fn new(archetype: &BossArchetype) -> Self {
        Self {
            archetype: archetype.clone(),
            phase: BossPhase::One,
            phase_lock: false,
            health: None,
            retreat_threshold: None,
            position: Vec2::ZERO,
            capabilities: None,
        }
    }

    pub fn phase(mut self, phase: BossPhase) -> Self {
        self.phase = phase;
        self
    }

    /// Pin the boss to its starting phase for the whole encounter.
    pub fn lock_phase(mut self) -> Self {
        self.phase_lock = true;
        self
    }

    pub fn health(mut self, health: f32) -> Self {
        self.health = Some(health);
        self
    }

    /// Absolute health at or below which the boss may retreat.
    pub fn retreat_threshold(mut self, threshold: f32) -> Self {
        self.retreat_threshold = Some(threshold);
        self
    }

    pub fn position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Restrict this instance to `allowed`. A capability the archetype has no
    /// config for is never gained.
    pub fn capabilities(mut self, allowed: Capabilities) -> Self {
        self.capabilities = Some(allowed);
        self
    }

    pub fn build(self) -> BossAbilityEngine {
        let archetype = self.archetype;
        let max_health = archetype.max_health;
        let health = self.health.unwrap_or(max_health).clamp(0.0, max_health);
        let derived = Capabilities::from_archetype(&archetype);
        let capabilities = self
            .capabilities
            .map_or(derived, |allowed| derived.intersect(allowed));

        // Every ability that can be selected or chained gets a cooldown slot.
        let mut ability_cooldowns = BTreeMap::new();
        for ability in archetype.abilities.keys() {
            ability_cooldowns.insert(*ability, Countdown::idle());
        }
        for combo in archetype.phase_combos.iter().flatten() {
            for ability in combo {
                ability_cooldowns.entry(*ability).or_insert_with(Countdown::idle);
            }
        }

        let state = BossRuntimeState {
            archetype: archetype.id,
            capabilities,
            phase: self.phase,
            phase_lock: self.phase_lock.then_some(self.phase),
            ability_cooldowns,
            combo: None,
            ai_state: BossAiState::Idle,
            ai_timer: Countdown::armed(archetype.decision_frames[self.phase.index()]),
            state_timer: Countdown::idle(),
            health,
            max_health,
            retreat_threshold: self.retreat_threshold.unwrap_or(0.0),
            can_retreat: self.retreat_threshold.is_some() && !self.phase.is_final(),
            shield_used: false,
            split_used: false,
            stuck: StuckTracker::new(self.position),
        };
        BossAbilityEngine::new(archetype, state)
    }
}
