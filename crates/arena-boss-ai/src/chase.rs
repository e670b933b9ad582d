//! Chase encounters: one boss fought across several segments of an arena.
//!
//! Each segment is a run of ordinary waves followed by an encounter with the
//! boss locked to that segment's phase. Non-final encounters end when health
//! drops to the phase's retreat threshold; the boss leaves and its health is
//! carried into the next encounter.

use log::info;
use serde::{Deserialize, Serialize};

use arena_core::catalog::{BossArchetype, ChaseSpec};
use arena_core::enums::BossPhase;

use crate::archetype::{BossBuilder, Capabilities};
use crate::engine::BossAbilityEngine;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaseState {
    pub segment: usize,
    pub boss_phase_to_spawn: BossPhase,
    pub encounter_count: u32,
    pub persistent_health: Option<f32>,
    pub phase_thresholds: [f32; 3],
    pub segment_wave_counts: Vec<u32>,
    /// Ordinary waves cleared in the current segment.
    pub waves_cleared: u32,
    /// Health added above the retreat threshold when the boss returns.
    pub retreat_margin: f32,
}

#[derive(Debug, Clone)]
pub struct ChaseEncounterController {
    state: ChaseState,
}

impl ChaseEncounterController {
    pub fn new(spec: &ChaseSpec, retreat_margin: f32) -> Self {
        let mut controller = Self {
            state: ChaseState {
                segment: 0,
                boss_phase_to_spawn: BossPhase::One,
                encounter_count: 0,
                persistent_health: None,
                phase_thresholds: spec.phase_thresholds,
                segment_wave_counts: spec.segment_wave_counts.clone(),
                waves_cleared: 0,
                retreat_margin: retreat_margin.max(0.0),
            },
        };
        controller.state.boss_phase_to_spawn = controller.phase_for_segment(0);
        controller
    }

    pub fn state(&self) -> &ChaseState {
        &self.state
    }

    pub fn segment_count(&self) -> usize {
        self.state.segment_wave_counts.len()
    }

    pub fn is_final_segment(&self) -> bool {
        self.state.segment + 1 >= self.segment_count()
    }

    /// Ordinary waves left before the boss comes back.
    pub fn waves_until_return(&self) -> u32 {
        self.state
            .segment_wave_counts
            .get(self.state.segment)
            .copied()
            .unwrap_or(0)
            .saturating_sub(self.state.waves_cleared)
    }

    /// Whether the wave about to start is the last of its segment.
    pub fn is_segment_exam(&self) -> bool {
        self.waves_until_return() == 1
    }

    /// Count a cleared ordinary wave. Returns true when the segment is done
    /// and the boss should return.
    pub fn record_wave_cleared(&mut self) -> bool {
        self.state.waves_cleared += 1;
        self.waves_until_return() == 0
    }

    /// Absolute retreat threshold for `phase`. The final phase never retreats.
    pub fn retreat_threshold(&self, archetype: &BossArchetype, phase: BossPhase) -> f32 {
        if phase.is_final() {
            return 0.0;
        }
        self.state.phase_thresholds[phase.index()] * archetype.max_health
    }

    /// Build the boss for the current segment, locked to its phase.
    pub fn spawn_boss(&mut self, archetype: &BossArchetype) -> BossAbilityEngine {
        let phase = self.state.boss_phase_to_spawn;
        let threshold = self.retreat_threshold(archetype, phase);
        let health = match self.state.persistent_health {
            Some(persisted) => persisted
                .max(threshold + self.state.retreat_margin)
                .min(archetype.max_health),
            None => archetype.max_health,
        };
        self.state.encounter_count += 1;
        info!(
            "chase encounter {} with {:?} in phase {} at {:.0}/{:.0}",
            self.state.encounter_count,
            archetype.id,
            phase.number(),
            health,
            archetype.max_health
        );

        let builder = BossBuilder::new(archetype)
            .phase(phase)
            .lock_phase()
            .health(health);
        if phase.is_final() {
            builder.build()
        } else {
            // A boss that will withdraw leaves no fragments behind.
            let allowed = Capabilities {
                has_split: false,
                ..Capabilities::from_archetype(archetype)
            };
            builder
                .retreat_threshold(threshold)
                .capabilities(allowed)
                .build()
        }
    }

    /// True when the live boss has been pushed down to its retreat threshold.
    pub fn should_retreat(&self, boss: &BossAbilityEngine) -> bool {
        let state = boss.state();
        state.can_retreat
            && !state.is_defeated()
            && !state.is_invulnerable()
            && state.health <= state.retreat_threshold
    }

    /// Send the boss away and advance to the next segment. Returns the
    /// number of waves before it returns.
    pub fn retreat(&mut self, boss: &mut BossAbilityEngine) -> u32 {
        self.state.persistent_health = Some(boss.state().health);
        boss.begin_retreat();

        if !self.is_final_segment() {
            self.state.segment += 1;
        }
        self.state.boss_phase_to_spawn = self.phase_for_segment(self.state.segment);
        self.state.waves_cleared = 0;
        let waves = self.waves_until_return();
        info!(
            "boss retreated at {:.0}; returns in phase {} after {} waves",
            boss.state().health,
            self.state.boss_phase_to_spawn.number(),
            waves
        );
        waves
    }

    /// Segments take consecutive phases ending on the final one, so a
    /// two-segment chase fights phases two and three.
    pub fn phase_for_segment(&self, segment: usize) -> BossPhase {
        let first = (BossPhase::FINAL.index() + 1).saturating_sub(self.segment_count());
        BossPhase::from_index(first + segment)
    }
}
