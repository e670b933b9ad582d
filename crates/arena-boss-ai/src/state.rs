//! Runtime state owned by one boss instance.

use std::collections::BTreeMap;

use glam::Vec2;

use arena_core::constants::STUCK_EPSILON;
use arena_core::countdown::Countdown;
use arena_core::enums::{Ability, BossAiState, BossArchetypeId, BossPhase};

use crate::archetype::Capabilities;

/// A phase combo in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboProgress {
    pub abilities: Vec<Ability>,
    /// Index of the ability most recently started.
    pub index: usize,
    /// Minimum gap before the next step may start. Armed when a step executes.
    pub delay: Countdown,
    /// Frames the next step has waited on its cooldown.
    pub blocked_frames: u32,
}

impl ComboProgress {
    pub fn current(&self) -> Option<Ability> {
        self.abilities.get(self.index).copied()
    }

    pub fn next(&self) -> Option<Ability> {
        self.abilities.get(self.index + 1).copied()
    }
}

/// Displacement tracker for the anti-stuck heuristic.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StuckTracker {
    anchor: Vec2,
    still_frames: u32,
    strafe_left: bool,
}

impl StuckTracker {
    pub fn new(position: Vec2) -> Self {
        Self {
            anchor: position,
            ..Default::default()
        }
    }

    /// Record this tick's position. Returns frames spent within
    /// `STUCK_EPSILON` of the anchor.
    pub fn observe(&mut self, position: Vec2) -> u32 {
        if position.distance(self.anchor) > STUCK_EPSILON {
            self.anchor = position;
            self.still_frames = 0;
        } else {
            self.still_frames += 1;
        }
        self.still_frames
    }

    /// Restart the window without counting a forced move.
    pub fn rebase(&mut self, position: Vec2) {
        self.anchor = position;
        self.still_frames = 0;
    }

    /// Clear the window after a forced move and flip the strafe side.
    pub fn reset(&mut self, position: Vec2) -> bool {
        self.anchor = position;
        self.still_frames = 0;
        self.strafe_left = !self.strafe_left;
        self.strafe_left
    }

    pub fn still_frames(&self) -> u32 {
        self.still_frames
    }
}

/// Everything that changes while a boss fights. Owned exclusively by one
/// boss; destroyed when the boss is removed.
#[derive(Debug, Clone)]
pub struct BossRuntimeState {
    pub archetype: BossArchetypeId,
    pub capabilities: Capabilities,
    pub phase: BossPhase,
    /// Chase bosses fight with exactly one phase kit.
    pub phase_lock: Option<BossPhase>,
    pub ability_cooldowns: BTreeMap<Ability, Countdown>,
    pub combo: Option<ComboProgress>,
    pub ai_state: BossAiState,
    /// Idle frames until the next decision.
    pub ai_timer: Countdown,
    /// Remaining frames of the current tell, shield or exposed window.
    pub state_timer: Countdown,
    pub health: f32,
    pub max_health: f32,
    pub retreat_threshold: f32,
    pub can_retreat: bool,
    pub shield_used: bool,
    pub split_used: bool,
    pub stuck: StuckTracker,
}

impl BossRuntimeState {
    pub fn is_invulnerable(&self) -> bool {
        matches!(
            self.ai_state,
            BossAiState::Shielded | BossAiState::Retreating | BossAiState::Defeated
        )
    }

    pub fn is_exposed(&self) -> bool {
        self.ai_state == BossAiState::Exposed
    }

    pub fn is_defeated(&self) -> bool {
        self.ai_state == BossAiState::Defeated
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        self.health / self.max_health
    }

    pub fn cooldown(&self, ability: Ability) -> u32 {
        self.ability_cooldowns
            .get(&ability)
            .map(Countdown::remaining)
            .unwrap_or(0)
    }

    pub fn is_ready(&self, ability: Ability) -> bool {
        self.cooldown(ability) == 0
    }
}
