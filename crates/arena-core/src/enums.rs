//! Enumeration types used throughout the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Top-level run lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    #[default]
    NotStarted,
    Running,
    Complete,
}

/// Wave state machine. Exactly one of the spawn scheduler (WaveActive)
/// or the boss ability engine (BossActive) runs in a given tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaveState {
    #[default]
    WaveIntro,
    WaveActive,
    WaveClear,
    BossIntro,
    BossActive,
    BossRetreat,
    BossDefeated,
    ArenaTransition,
}

/// Wave classification used to pick a budget template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveType {
    /// First wave of an arena: introduces the arena's new enemy alone.
    Lesson,
    /// Anything between the lesson and the exam.
    #[default]
    Integration,
    /// Last wave before the boss.
    Exam,
}

impl WaveType {
    /// Classify `wave` (1-based) given the wave number that precedes the boss.
    pub fn classify(wave: u32, exam_wave: u32) -> Self {
        if wave <= 1 {
            WaveType::Lesson
        } else if wave >= exam_wave {
            WaveType::Exam
        } else {
            WaveType::Integration
        }
    }
}

/// Enemy archetypes the scheduler can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Slow melee chaser.
    Grunt,
    /// Tiny, fragile, comes in schools.
    Swarmling,
    /// Fast flanker.
    Runner,
    /// Suicide charger.
    Bomber,
    /// High durability bruiser.
    Tank,
    /// Ranged projectile enemy.
    Spitter,
}

/// Compass direction on the arena floor. North is +z, East is +x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Unit vector in (x, z).
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::North => Vec2::new(0.0, 1.0),
            Direction::East => Vec2::new(1.0, 0.0),
            Direction::South => Vec2::new(0.0, -1.0),
            Direction::West => Vec2::new(-1.0, 0.0),
        }
    }
}

/// Spawn choreography pattern for a wave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoreographyKind {
    /// Every spawn from the primary direction.
    Lane,
    /// Alternate between primary and its opposite.
    Pincer,
    /// Angle/distance sampling biased away from the player's facing.
    #[default]
    Random,
}

/// What happens to a school when its leader dies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolPolicy {
    /// The nearest follower becomes leader and offsets are re-centred.
    #[default]
    Promote,
    /// Followers lose their formation and act alone.
    Disband,
}

/// Boss archetypes, one per arena in the builtin catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossArchetypeId {
    /// Multi-encounter chase boss perched on pillars.
    Warden,
    /// Shielded bruiser that becomes exposed.
    Colossus,
    /// Fragments into weaker copies.
    Hivemind,
    /// Teleporting caster.
    Phantom,
}

/// Boss abilities. The string form is used for combo delay keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Charge,
    JumpSlam,
    Summon,
    HazardField,
    Nova,
    Spiral,
    Sweep,
    Teleport,
    PillarPerch,
}

impl Ability {
    pub fn as_str(self) -> &'static str {
        match self {
            Ability::Charge => "charge",
            Ability::JumpSlam => "jump_slam",
            Ability::Summon => "summon",
            Ability::HazardField => "hazard_field",
            Ability::Nova => "nova",
            Ability::Spiral => "spiral",
            Ability::Sweep => "sweep",
            Ability::Teleport => "teleport",
            Ability::PillarPerch => "pillar_perch",
        }
    }
}

/// Boss difficulty tier. Escalates with damage taken unless phase-locked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BossPhase {
    #[default]
    One,
    Two,
    Three,
}

impl BossPhase {
    pub const FINAL: BossPhase = BossPhase::Three;

    /// Index into per-phase tables (0..3).
    pub fn index(self) -> usize {
        match self {
            BossPhase::One => 0,
            BossPhase::Two => 1,
            BossPhase::Three => 2,
        }
    }

    /// 1-based phase number.
    pub fn number(self) -> u32 {
        self.index() as u32 + 1
    }

    pub fn from_index(index: usize) -> Self {
        match index {
            0 => BossPhase::One,
            1 => BossPhase::Two,
            _ => BossPhase::Three,
        }
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn is_final(self) -> bool {
        self == Self::FINAL
    }
}

/// Boss AI state. Tagged so the ability in flight travels with the state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum BossAiState {
    /// Moving and waiting for the next decision.
    #[default]
    Idle,
    /// Wind-up before `ability` applies.
    Tell { ability: Ability },
    /// Invulnerable behind a shield; AI suspended.
    Shielded,
    /// Shield dropped; takes extra damage, AI suspended.
    Exposed,
    /// Chase boss withdrawing; invulnerable and harmless.
    Retreating,
    /// Health reached zero.
    Defeated,
}
