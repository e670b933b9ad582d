//! Boss ability state machine.
//!
//! `tick` runs once per active simulation frame, in a fixed order:
//! cooldowns, health-threshold effects, anti-stuck check, then the
//! tell / combo / selection step. No ECS dependency; the director feeds
//! positions in and turns the returned actions into events and spawns.

use glam::Vec2;
use log::{debug, warn};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use arena_core::catalog::{AbilitySpec, BossArchetype, ExposedConfig};
use arena_core::constants::*;
use arena_core::countdown::Countdown;
use arena_core::enums::{Ability, BossAiState, BossPhase};

use crate::state::{BossRuntimeState, ComboProgress};

/// World facts the boss reads each tick.
pub struct BossInput<'a> {
    pub position: Vec2,
    pub player: Vec2,
    pub pillars: &'a [Vec2],
}

/// Something the boss did this tick that the outside world must act on.
#[derive(Debug, Clone, PartialEq)]
pub enum BossAction {
    TellStarted { ability: Ability, frames: u32 },
    /// `ability` may differ from the selected one when a fallback applied.
    AbilityExecuted { ability: Ability, target: Vec2 },
    ComboStarted { abilities: Vec<Ability> },
    PhaseChanged { phase: BossPhase },
    ShieldRaised,
    Exposed,
    Fragment { copies: u32, health: f32 },
    Reposition { target: Vec2 },
    Defeated,
}

/// One live boss: its static archetype plus the runtime state it owns.
#[derive(Debug, Clone)]
pub struct BossAbilityEngine {
    archetype: BossArchetype,
    state: BossRuntimeState,
}

impl BossAbilityEngine {
    pub(crate) fn new(archetype: BossArchetype, state: BossRuntimeState) -> Self {
        Self { archetype, state }
    }

    pub fn archetype(&self) -> &BossArchetype {
        &self.archetype
    }

    pub fn state(&self) -> &BossRuntimeState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut BossRuntimeState {
        &mut self.state
    }

    /// Apply incoming damage. Returns the amount actually removed.
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        if amount <= 0.0 || self.state.is_invulnerable() {
            return 0.0;
        }
        let mult = match self.exposed_config() {
            Some(exposed) if self.state.is_exposed() => exposed.damage_mult,
            _ => 1.0,
        };
        let dealt = (amount * mult).min(self.state.health);
        self.state.health -= dealt;
        dealt
    }

    /// Withdraw from the fight. The boss stops acting and takes no damage.
    pub fn begin_retreat(&mut self) {
        self.interrupt();
        self.state.ai_state = BossAiState::Retreating;
    }

    pub fn tick<R: Rng>(&mut self, input: &BossInput, rng: &mut R) -> Vec<BossAction> {
        let mut actions = Vec::new();
        if matches!(
            self.state.ai_state,
            BossAiState::Defeated | BossAiState::Retreating
        ) {
            return actions;
        }

        for cooldown in self.state.ability_cooldowns.values_mut() {
            cooldown.tick();
        }

        if self.state.health <= 0.0 {
            self.interrupt();
            self.state.ai_state = BossAiState::Defeated;
            actions.push(BossAction::Defeated);
            return actions;
        }

        let interrupted = self.check_thresholds(&mut actions);
        self.check_stuck(input, &mut actions);
        if interrupted {
            return actions;
        }

        match self.state.ai_state {
            BossAiState::Tell { ability } => self.advance_tell(ability, input, &mut actions),
            BossAiState::Idle => self.advance_idle(rng, &mut actions),
            BossAiState::Shielded => {
                if self.state.state_timer.tick() {
                    match self.exposed_config() {
                        Some(exposed) => {
                            self.state.ai_state = BossAiState::Exposed;
                            self.state.state_timer.arm(exposed.frames);
                            actions.push(BossAction::Exposed);
                        }
                        None => self.enter_idle(),
                    }
                }
            }
            BossAiState::Exposed => {
                if self.state.state_timer.tick() {
                    self.enter_idle();
                }
            }
            BossAiState::Retreating | BossAiState::Defeated => {}
        }
        actions
    }

    /// Returns true when a shield went up this tick.
    fn check_thresholds(&mut self, actions: &mut Vec<BossAction>) -> bool {
        let fraction = self.state.health_fraction();
        let caps = self.state.capabilities;
        let mut interrupted = false;

        if self.state.phase_lock.is_none() {
            let target = phase_for_fraction(fraction, &self.archetype.phase_thresholds);
            if target > self.state.phase {
                self.state.phase = target;
                actions.push(BossAction::PhaseChanged { phase: target });
            }
        }

        if caps.has_shield && !self.state.shield_used {
            let reached = self
                .archetype
                .shield
                .filter(|shield| fraction <= shield.health_fraction);
            if let Some(shield) = reached {
                self.state.shield_used = true;
                self.interrupt();
                self.state.ai_state = BossAiState::Shielded;
                self.state.state_timer.arm(shield.frames);
                actions.push(BossAction::ShieldRaised);
                interrupted = true;
            }
        }

        if caps.has_split && !self.state.split_used {
            let reached = self
                .archetype
                .split
                .filter(|split| fraction <= split.health_fraction);
            if let Some(split) = reached {
                self.state.split_used = true;
                actions.push(BossAction::Fragment {
                    copies: split.copies,
                    health: split.fragment_health,
                });
            }
        }
        interrupted
    }

    fn check_stuck(&mut self, input: &BossInput, actions: &mut Vec<BossAction>) {
        if !matches!(
            self.state.ai_state,
            BossAiState::Idle | BossAiState::Tell { .. }
        ) {
            self.state.stuck.rebase(input.position);
            return;
        }
        if self.state.stuck.observe(input.position) < STUCK_THRESHOLD_FRAMES {
            return;
        }

        let left = self.state.stuck.reset(input.position);
        let to_player = (input.player - input.position).normalize_or_zero();
        let axis = if to_player == Vec2::ZERO {
            Vec2::X
        } else {
            to_player.perp()
        };
        let side = if left { 1.0 } else { -1.0 };
        let target = input.position + axis * side * REPOSITION_DISTANCE;
        debug!(
            "{:?} stuck at {:?}; strafing to {:?}",
            self.state.archetype, input.position, target
        );
        actions.push(BossAction::Reposition { target });
    }

    fn advance_tell(&mut self, ability: Ability, input: &BossInput, actions: &mut Vec<BossAction>) {
        if !self.state.state_timer.tick() {
            return;
        }

        let (executed, target) = self.resolve_target(ability, input);
        let cooldown = self.spec_for(ability).cooldown_frames;
        self.state
            .ability_cooldowns
            .insert(ability, Countdown::armed(cooldown));
        actions.push(BossAction::AbilityExecuted {
            ability: executed,
            target,
        });

        let next_delay = self
            .state
            .combo
            .as_ref()
            .and_then(ComboProgress::next)
            .map(|next| self.combo_delay(ability, next));
        let chained = match (next_delay, self.state.combo.as_mut()) {
            (Some(delay), Some(combo)) => {
                combo.delay.arm(delay);
                combo.blocked_frames = 0;
                true
            }
            _ => false,
        };
        if chained {
            self.state.ai_state = BossAiState::Idle;
        } else {
            self.state.combo = None;
            self.enter_idle();
        }
    }

    fn advance_idle<R: Rng>(&mut self, rng: &mut R, actions: &mut Vec<BossAction>) {
        if self.state.combo.is_some() {
            self.advance_combo(actions);
            return;
        }
        if self.state.ai_timer.tick() {
            self.decide(rng, actions);
        }
    }

    fn advance_combo(&mut self, actions: &mut Vec<BossAction>) {
        let next = {
            let Some(combo) = self.state.combo.as_mut() else {
                return;
            };
            if !combo.delay.tick() {
                return;
            }
            combo.next()
        };
        let Some(next) = next else {
            self.state.combo = None;
            self.enter_idle();
            return;
        };

        if !self.state.is_ready(next) {
            let mut stalled = 0;
            if let Some(combo) = self.state.combo.as_mut() {
                combo.blocked_frames += 1;
                stalled = combo.blocked_frames;
            }
            if stalled >= COMBO_STALL_LIMIT_FRAMES {
                debug!("combo abandoned: {:?} still cooling down", next);
                self.state.combo = None;
                self.enter_idle();
            }
            return;
        }

        if let Some(combo) = self.state.combo.as_mut() {
            combo.index += 1;
        }
        self.start_tell(next, actions);
    }

    fn decide<R: Rng>(&mut self, rng: &mut R, actions: &mut Vec<BossAction>) {
        let phase = self.state.phase;
        let combo_chance = self.archetype.combo_chance[phase.index()];

        if phase != BossPhase::One && combo_chance > 0.0 && rng.gen::<f32>() < combo_chance {
            let ready: Vec<&Vec<Ability>> = self
                .archetype
                .combos_for(phase)
                .iter()
                .filter(|combo| {
                    combo.len() >= 2
                        && combo.iter().all(|a| self.is_allowed(*a))
                        && self.state.is_ready(combo[0])
                })
                .collect();
            if !ready.is_empty() {
                let abilities = ready[rng.gen_range(0..ready.len())].clone();
                let first = abilities[0];
                actions.push(BossAction::ComboStarted {
                    abilities: abilities.clone(),
                });
                self.state.combo = Some(ComboProgress {
                    abilities,
                    index: 0,
                    delay: Countdown::idle(),
                    blocked_frames: 0,
                });
                self.start_tell(first, actions);
                return;
            }
        }

        let candidates: Vec<(Ability, f32)> = self
            .archetype
            .abilities
            .iter()
            .filter(|(ability, _)| self.is_allowed(**ability) && self.state.is_ready(**ability))
            .map(|(ability, spec)| (*ability, spec.weight(phase)))
            .filter(|(_, weight)| *weight > 0.0)
            .collect();

        match pick_weighted(&candidates, rng) {
            Some(ability) => self.start_tell(ability, actions),
            None => self.state.ai_timer.arm(IDLE_RETRY_FRAMES),
        }
    }

    fn start_tell(&mut self, ability: Ability, actions: &mut Vec<BossAction>) {
        let frames = self.spec_for(ability).tell(self.state.phase);
        self.state.ai_state = BossAiState::Tell { ability };
        self.state.state_timer.arm(frames);
        actions.push(BossAction::TellStarted { ability, frames });
    }

    fn enter_idle(&mut self) {
        self.state.ai_state = BossAiState::Idle;
        self.state
            .ai_timer
            .arm(self.archetype.decision_frames[self.state.phase.index()]);
    }

    fn interrupt(&mut self) {
        self.state.combo = None;
        self.state.state_timer.cancel();
    }

    fn exposed_config(&self) -> Option<ExposedConfig> {
        if self.state.capabilities.has_exposed {
            self.archetype.exposed
        } else {
            None
        }
    }

    fn is_allowed(&self, ability: Ability) -> bool {
        match ability {
            Ability::PillarPerch => self.state.capabilities.has_pillar_perch,
            Ability::Teleport => self.state.capabilities.has_teleport,
            _ => true,
        }
    }

    fn spec_for(&self, ability: Ability) -> AbilitySpec {
        match self.archetype.ability_spec(ability) {
            Some(spec) => *spec,
            None => {
                warn!(
                    "{:?} has no config for {}; using fallback",
                    self.archetype.id,
                    ability.as_str()
                );
                AbilitySpec::fallback()
            }
        }
    }

    fn combo_delay(&self, from: Ability, to: Ability) -> u32 {
        self.archetype
            .combo_delay(from, to)
            .unwrap_or(DEFAULT_COMBO_DELAY_FRAMES)
    }

    fn resolve_target(&self, ability: Ability, input: &BossInput) -> (Ability, Vec2) {
        match ability {
            Ability::PillarPerch => {
                let nearest = input.pillars.iter().copied().min_by(|a, b| {
                    a.distance_squared(input.position)
                        .total_cmp(&b.distance_squared(input.position))
                });
                match nearest {
                    Some(pillar) => (ability, pillar),
                    None => {
                        debug!("no pillars; pillar perch falls back to jump slam");
                        (Ability::JumpSlam, input.player)
                    }
                }
            }
            Ability::Teleport => {
                let away = (input.player - input.position).normalize_or_zero();
                (ability, input.player + away * REPOSITION_DISTANCE)
            }
            _ => (ability, input.player),
        }
    }
}

/// Phase implied by remaining health. Thresholds are fractions of max health.
pub fn phase_for_fraction(fraction: f32, thresholds: &[f32; 2]) -> BossPhase {
    if fraction <= thresholds[1] {
        BossPhase::Three
    } else if fraction <= thresholds[0] {
        BossPhase::Two
    } else {
        BossPhase::One
    }
}

fn pick_weighted<R: Rng>(candidates: &[(Ability, f32)], rng: &mut R) -> Option<Ability> {
    let dist = WeightedIndex::new(candidates.iter().map(|(_, weight)| *weight)).ok()?;
    candidates.get(dist.sample(rng)).map(|(ability, _)| *ability)
}
