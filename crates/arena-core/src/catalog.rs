//! Read-only catalog data: enemy table, modifiers, arenas and boss archetypes.
//!
//! `Catalog::builtin()` ships the default campaign. A JSON override can be
//! loaded with `Catalog::from_json_str`, which validates after parsing.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::budget::EnemySpawnCost;
use crate::constants::{DEFAULT_COOLDOWN_FRAMES, DEFAULT_TELL_FRAMES};
use crate::enums::{Ability, BossArchetypeId, BossPhase, EnemyKind, WaveType};
use crate::error::CatalogError;

/// One row of the enemy table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpec {
    pub kind: EnemyKind,
    pub cost: EnemySpawnCost,
    /// Relative pick weight inside the pool.
    pub weight: f32,
    /// Arena that first introduces this type.
    pub intro_arena: u32,
    /// Earliest wave (within an arena) the type may appear.
    #[serde(default = "default_min_wave")]
    pub min_wave: u32,
    /// Last arena the type appears in; `None` means every later arena.
    #[serde(default)]
    pub max_arena: Option<u32>,
    /// Whether the type can form schools.
    #[serde(default)]
    pub schoolable: bool,
}

fn default_min_wave() -> u32 {
    1
}

/// Named wave preset. Rolled at most once per wave, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveModifier {
    pub id: String,
    pub budget_mult: f32,
    pub interval_mult: f32,
    #[serde(default)]
    pub cognitive_max: Option<u32>,
    #[serde(default)]
    pub force_types: Option<Vec<EnemyKind>>,
    pub announcement: String,
}

/// Base budget for a wave type before arena and modifier scaling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BudgetTemplate {
    pub total: u32,
    pub cognitive_max: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetTemplates {
    pub lesson: BudgetTemplate,
    pub integration: BudgetTemplate,
    pub exam: BudgetTemplate,
}

impl BudgetTemplates {
    pub fn get(&self, wave_type: WaveType) -> BudgetTemplate {
        match wave_type {
            WaveType::Lesson => self.lesson,
            WaveType::Integration => self.integration,
            WaveType::Exam => self.exam,
        }
    }
}

/// Multi-encounter boss layout for a chase arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChaseSpec {
    /// Ordinary waves played before each encounter. One entry per phase.
    pub segment_wave_counts: Vec<u32>,
    /// Retreat threshold per phase as a fraction of max health.
    /// The final phase's entry is ignored: it never retreats.
    pub phase_thresholds: [f32; 3],
}

impl ChaseSpec {
    pub fn total_waves(&self) -> u32 {
        self.segment_wave_counts.iter().sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaSpec {
    pub id: u32,
    /// Waves before the boss. Ignored for chase arenas.
    pub waves: u32,
    /// Half width of the square arena floor.
    pub half_extent: f32,
    pub boss: BossArchetypeId,
    #[serde(default)]
    pub chase: Option<ChaseSpec>,
}

impl ArenaSpec {
    /// Highest wave number played in this arena.
    pub fn max_waves(&self) -> u32 {
        match &self.chase {
            Some(chase) => chase.total_waves(),
            None => self.waves,
        }
    }
}

/// Per-ability tuning for one archetype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilitySpec {
    pub weights: [f32; 3],
    pub cooldown_frames: u32,
    pub tell_frames: [u32; 3],
}

impl AbilitySpec {
    /// Record used when an archetype lacks a spec for an ability.
    pub fn fallback() -> Self {
        Self {
            weights: [1.0; 3],
            cooldown_frames: DEFAULT_COOLDOWN_FRAMES,
            tell_frames: DEFAULT_TELL_FRAMES,
        }
    }

    pub fn weight(&self, phase: BossPhase) -> f32 {
        self.weights[phase.index()]
    }

    pub fn tell(&self, phase: BossPhase) -> u32 {
        self.tell_frames[phase.index()]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShieldConfig {
    /// Shield goes up the first time health falls to this fraction.
    pub health_fraction: f32,
    pub frames: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExposedConfig {
    pub frames: u32,
    pub damage_mult: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SplitConfig {
    pub health_fraction: f32,
    pub copies: u32,
    pub fragment_health: f32,
}

/// Static description of a boss. Runtime state is built from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossArchetype {
    pub id: BossArchetypeId,
    pub max_health: f32,
    pub abilities: BTreeMap<Ability, AbilitySpec>,
    /// Fixed sequences per phase. Phase one entries are never used.
    #[serde(default)]
    pub phase_combos: [Vec<Vec<Ability>>; 3],
    /// Minimum frames between two chained abilities, keyed by `combo_key`.
    #[serde(default)]
    pub combo_delays: BTreeMap<String, u32>,
    pub combo_chance: [f32; 3],
    /// Idle frames between decisions per phase. Shorter = more aggressive.
    pub decision_frames: [u32; 3],
    /// Health fractions where phase two and three begin.
    pub phase_thresholds: [f32; 2],
    #[serde(default)]
    pub shield: Option<ShieldConfig>,
    #[serde(default)]
    pub exposed: Option<ExposedConfig>,
    #[serde(default)]
    pub split: Option<SplitConfig>,
    #[serde(default)]
    pub pillar_perch: bool,
    #[serde(default)]
    pub teleport: bool,
}

impl BossArchetype {
    pub fn ability_spec(&self, ability: Ability) -> Option<&AbilitySpec> {
        self.abilities.get(&ability)
    }

    pub fn combo_delay(&self, from: Ability, to: Ability) -> Option<u32> {
        self.combo_delays.get(&combo_key(from, to)).copied()
    }

    pub fn combos_for(&self, phase: BossPhase) -> &[Vec<Ability>] {
        &self.phase_combos[phase.index()]
    }
}

/// Key of the combo delay table: `"charge_nova"`.
pub fn combo_key(from: Ability, to: Ability) -> String {
    format!("{}_{}", from.as_str(), to.as_str())
}

/// All read-only tables the director consults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub enemies: Vec<EnemySpec>,
    pub modifiers: Vec<WaveModifier>,
    pub arenas: Vec<ArenaSpec>,
    pub bosses: Vec<BossArchetype>,
    pub budget_templates: BudgetTemplates,
    /// Budget growth per arena after the first (0.25 = +25% per arena).
    pub arena_scaling: f32,
}

impl Catalog {
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn enemy(&self, kind: EnemyKind) -> Option<&EnemySpec> {
        self.enemies.iter().find(|e| e.kind == kind)
    }

    pub fn arena(&self, id: u32) -> Option<&ArenaSpec> {
        self.arenas.iter().find(|a| a.id == id)
    }

    pub fn boss(&self, id: BossArchetypeId) -> Option<&BossArchetype> {
        self.bosses.iter().find(|b| b.id == id)
    }

    pub fn modifier(&self, id: &str) -> Option<&WaveModifier> {
        self.modifiers.iter().find(|m| m.id == id)
    }

    /// Multiplier applied to every budget in `arena`.
    pub fn arena_scale(&self, arena: u32) -> f32 {
        1.0 + self.arena_scaling * arena.saturating_sub(1) as f32
    }

    pub fn last_arena(&self) -> u32 {
        self.arenas.iter().map(|a| a.id).max().unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.arenas.is_empty() {
            return Err(CatalogError::NoArenas);
        }
        for (index, arena) in self.arenas.iter().enumerate() {
            let expected = index as u32 + 1;
            if arena.id != expected {
                return Err(CatalogError::NonContiguousArena {
                    expected,
                    found: arena.id,
                });
            }
            if self.boss(arena.boss).is_none() {
                return Err(CatalogError::UnknownBoss {
                    arena: arena.id,
                    boss: arena.boss,
                });
            }
            if let Some(chase) = &arena.chase {
                if chase.segment_wave_counts.is_empty()
                    || chase.segment_wave_counts.len() > 3
                    || chase.segment_wave_counts.contains(&0)
                {
                    return Err(CatalogError::InvalidChase { arena: arena.id });
                }
                if !chase.phase_thresholds.iter().all(|t| is_fraction(*t)) {
                    return Err(CatalogError::InvalidChaseThresholds { arena: arena.id });
                }
            } else if arena.waves == 0 {
                return Err(CatalogError::NoWaves { arena: arena.id });
            }
        }

        let mut seen = HashSet::new();
        for enemy in &self.enemies {
            if !seen.insert(enemy.kind) {
                return Err(CatalogError::DuplicateEnemy(enemy.kind));
            }
            if enemy.cost.total() == 0 || !enemy.weight.is_finite() || enemy.weight <= 0.0 {
                return Err(CatalogError::InvalidEnemy(enemy.kind));
            }
        }

        for boss in &self.bosses {
            let fractions = [
                ("phase_thresholds", boss.phase_thresholds.as_slice()),
                ("combo_chance", boss.combo_chance.as_slice()),
            ];
            for (field, values) in fractions {
                if !values.iter().all(|v| is_fraction(*v)) {
                    return Err(CatalogError::InvalidBossFraction { boss: boss.id, field });
                }
            }
        }

        for modifier in &self.modifiers {
            let positive = |mult: f32| mult.is_finite() && mult > 0.0;
            if !positive(modifier.budget_mult) || !positive(modifier.interval_mult) {
                return Err(CatalogError::InvalidModifier {
                    id: modifier.id.clone(),
                });
            }
            if let Some(forced) = &modifier.force_types {
                if let Some(kind) = forced.iter().find(|k| self.enemy(**k).is_none()) {
                    return Err(CatalogError::UnknownForcedType {
                        id: modifier.id.clone(),
                        kind: *kind,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Finite and within 0..=1. NaN fails.
fn is_fraction(value: f32) -> bool {
    (0.0..=1.0).contains(&value)
}
