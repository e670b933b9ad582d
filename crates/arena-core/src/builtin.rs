//! Builtin campaign: four arenas, six enemy types, four bosses.
//!
//! Each arena introduces exactly one new enemy on its lesson wave. Arena 1
//! hosts the chase boss, which returns after each segment of waves.

use std::collections::BTreeMap;

use crate::budget::EnemySpawnCost;
use crate::catalog::*;
use crate::enums::{Ability, BossArchetypeId, EnemyKind};

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            enemies: builtin_enemies(),
            modifiers: builtin_modifiers(),
            arenas: builtin_arenas(),
            bosses: vec![warden(), colossus(), hivemind(), phantom()],
            budget_templates: BudgetTemplates {
                lesson: BudgetTemplate {
                    total: 60,
                    cognitive_max: 2,
                },
                integration: BudgetTemplate {
                    total: 120,
                    cognitive_max: 3,
                },
                exam: BudgetTemplate {
                    total: 180,
                    cognitive_max: 4,
                },
            },
            arena_scaling: 0.25,
        }
    }
}

fn enemy(
    kind: EnemyKind,
    cost: EnemySpawnCost,
    weight: f32,
    intro_arena: u32,
    min_wave: u32,
) -> EnemySpec {
    EnemySpec {
        kind,
        cost,
        weight,
        intro_arena,
        min_wave,
        max_arena: None,
        schoolable: false,
    }
}

fn builtin_enemies() -> Vec<EnemySpec> {
    vec![
        enemy(EnemyKind::Grunt, EnemySpawnCost::new(12, 8, 1), 1.0, 1, 1),
        EnemySpec {
            schoolable: true,
            ..enemy(EnemyKind::Swarmling, EnemySpawnCost::new(3, 2, 1), 0.8, 1, 3)
        },
        enemy(EnemyKind::Runner, EnemySpawnCost::new(8, 10, 1), 1.0, 2, 1),
        EnemySpec {
            max_arena: Some(3),
            ..enemy(EnemyKind::Bomber, EnemySpawnCost::new(6, 16, 2), 0.6, 2, 3)
        },
        enemy(EnemyKind::Tank, EnemySpawnCost::new(30, 10, 2), 0.5, 3, 1),
        enemy(EnemyKind::Spitter, EnemySpawnCost::new(10, 14, 2), 0.7, 4, 1),
    ]
}

fn builtin_modifiers() -> Vec<WaveModifier> {
    vec![
        WaveModifier {
            id: "swarm".into(),
            budget_mult: 1.3,
            interval_mult: 0.6,
            cognitive_max: None,
            force_types: None,
            announcement: "SWARM: they keep coming".into(),
        },
        WaveModifier {
            id: "elite".into(),
            budget_mult: 1.2,
            interval_mult: 1.4,
            cognitive_max: Some(2),
            force_types: None,
            announcement: "ELITE: fewer, tougher".into(),
        },
        WaveModifier {
            id: "blitz".into(),
            budget_mult: 1.0,
            interval_mult: 0.5,
            cognitive_max: None,
            force_types: None,
            announcement: "BLITZ".into(),
        },
        WaveModifier {
            id: "horde".into(),
            budget_mult: 1.25,
            interval_mult: 0.7,
            cognitive_max: None,
            force_types: Some(vec![EnemyKind::Grunt, EnemyKind::Swarmling]),
            announcement: "HORDE INCOMING".into(),
        },
    ]
}

fn builtin_arenas() -> Vec<ArenaSpec> {
    vec![
        ArenaSpec {
            id: 1,
            waves: 7,
            half_extent: 20.0,
            boss: BossArchetypeId::Warden,
            chase: Some(ChaseSpec {
                segment_wave_counts: vec![3, 2, 2],
                phase_thresholds: [0.66, 0.33, 0.0],
            }),
        },
        ArenaSpec {
            id: 2,
            waves: 5,
            half_extent: 24.0,
            boss: BossArchetypeId::Colossus,
            chase: None,
        },
        ArenaSpec {
            id: 3,
            waves: 6,
            half_extent: 28.0,
            boss: BossArchetypeId::Hivemind,
            chase: None,
        },
        ArenaSpec {
            id: 4,
            waves: 7,
            half_extent: 32.0,
            boss: BossArchetypeId::Phantom,
            chase: None,
        },
    ]
}

fn ability(weights: [f32; 3], cooldown_frames: u32, tell_frames: [u32; 3]) -> AbilitySpec {
    AbilitySpec {
        weights,
        cooldown_frames,
        tell_frames,
    }
}

fn delays(pairs: &[(Ability, Ability, u32)]) -> BTreeMap<String, u32> {
    pairs
        .iter()
        .map(|&(from, to, frames)| (combo_key(from, to), frames))
        .collect()
}

fn warden() -> BossArchetype {
    BossArchetype {
        id: BossArchetypeId::Warden,
        max_health: 1200.0,
        abilities: BTreeMap::from([
            (Ability::Charge, ability([3.0, 2.0, 2.0], 240, [50, 40, 30])),
            (Ability::JumpSlam, ability([2.0, 2.0, 3.0], 300, [60, 45, 35])),
            (Ability::PillarPerch, ability([1.0, 2.0, 2.0], 420, [40, 35, 30])),
            (Ability::Summon, ability([1.0, 1.0, 2.0], 600, [60, 50, 40])),
            (Ability::Nova, ability([0.0, 1.0, 2.0], 360, [55, 45, 35])),
        ]),
        phase_combos: [
            vec![],
            vec![vec![Ability::Charge, Ability::JumpSlam]],
            vec![
                vec![Ability::PillarPerch, Ability::Nova],
                vec![Ability::Charge, Ability::JumpSlam, Ability::Nova],
            ],
        ],
        combo_delays: delays(&[
            (Ability::Charge, Ability::JumpSlam, 40),
            (Ability::PillarPerch, Ability::Nova, 50),
            (Ability::JumpSlam, Ability::Nova, 45),
        ]),
        combo_chance: [0.0, 0.3, 0.45],
        decision_frames: [90, 70, 50],
        phase_thresholds: [0.66, 0.33],
        shield: None,
        exposed: None,
        split: None,
        pillar_perch: true,
        teleport: false,
    }
}

fn colossus() -> BossArchetype {
    BossArchetype {
        id: BossArchetypeId::Colossus,
        max_health: 1600.0,
        abilities: BTreeMap::from([
            (Ability::Charge, ability([2.0, 2.0, 2.0], 240, [55, 45, 35])),
            (Ability::JumpSlam, ability([2.0, 2.0, 2.0], 300, [60, 50, 40])),
            (Ability::Sweep, ability([1.0, 2.0, 3.0], 200, [45, 35, 30])),
            (Ability::HazardField, ability([0.0, 1.0, 2.0], 480, [50, 45, 40])),
        ]),
        phase_combos: [
            vec![],
            vec![vec![Ability::Sweep, Ability::Charge]],
            vec![vec![Ability::HazardField, Ability::Sweep, Ability::Charge]],
        ],
        combo_delays: delays(&[
            (Ability::Sweep, Ability::Charge, 35),
            (Ability::HazardField, Ability::Sweep, 30),
        ]),
        combo_chance: [0.0, 0.25, 0.4],
        decision_frames: [100, 80, 60],
        phase_thresholds: [0.66, 0.33],
        shield: Some(ShieldConfig {
            health_fraction: 0.5,
            frames: 240,
        }),
        exposed: Some(ExposedConfig {
            frames: 180,
            damage_mult: 1.5,
        }),
        split: None,
        pillar_perch: false,
        teleport: false,
    }
}

fn hivemind() -> BossArchetype {
    BossArchetype {
        id: BossArchetypeId::Hivemind,
        max_health: 1400.0,
        abilities: BTreeMap::from([
            (Ability::Summon, ability([3.0, 2.0, 2.0], 420, [60, 50, 40])),
            (Ability::Spiral, ability([2.0, 2.0, 3.0], 260, [45, 40, 30])),
            (Ability::Nova, ability([1.0, 2.0, 2.0], 320, [50, 40, 35])),
            (Ability::HazardField, ability([0.0, 1.0, 1.0], 480, [50, 45, 40])),
        ]),
        phase_combos: [
            vec![],
            vec![vec![Ability::Spiral, Ability::Nova]],
            vec![vec![Ability::Summon, Ability::Spiral, Ability::Nova]],
        ],
        combo_delays: delays(&[
            (Ability::Spiral, Ability::Nova, 40),
            (Ability::Summon, Ability::Spiral, 30),
        ]),
        combo_chance: [0.0, 0.3, 0.4],
        decision_frames: [90, 75, 55],
        phase_thresholds: [0.66, 0.33],
        shield: None,
        exposed: None,
        split: Some(SplitConfig {
            health_fraction: 0.4,
            copies: 3,
            fragment_health: 150.0,
        }),
        pillar_perch: false,
        teleport: false,
    }
}

fn phantom() -> BossArchetype {
    BossArchetype {
        id: BossArchetypeId::Phantom,
        max_health: 1800.0,
        abilities: BTreeMap::from([
            (Ability::Teleport, ability([2.0, 2.0, 3.0], 200, [30, 25, 20])),
            (Ability::Spiral, ability([2.0, 2.0, 2.0], 260, [45, 40, 30])),
            (Ability::Nova, ability([1.0, 2.0, 2.0], 300, [50, 40, 30])),
            (Ability::Sweep, ability([2.0, 1.0, 1.0], 220, [45, 35, 30])),
            (Ability::Charge, ability([1.0, 1.0, 1.0], 240, [50, 40, 30])),
        ]),
        phase_combos: [
            vec![],
            vec![vec![Ability::Teleport, Ability::Nova]],
            vec![
                vec![Ability::Teleport, Ability::Spiral, Ability::Nova],
                vec![Ability::Teleport, Ability::Nova],
            ],
        ],
        combo_delays: delays(&[
            (Ability::Teleport, Ability::Nova, 25),
            (Ability::Teleport, Ability::Spiral, 25),
            (Ability::Spiral, Ability::Nova, 35),
        ]),
        combo_chance: [0.0, 0.35, 0.5],
        decision_frames: [80, 60, 45],
        phase_thresholds: [0.66, 0.33],
        shield: None,
        exposed: None,
        split: None,
        pillar_perch: false,
        teleport: true,
    }
}
