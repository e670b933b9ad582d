//! Director tuning. Every pacing knob with a sensible default; loadable from
//! partial JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use arena_core::constants::*;
use arena_core::enums::SchoolPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse director config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("start_arena must be at least 1")]
    ZeroStartArena,
    #[error("rate_multiplier must be positive, got {0}")]
    InvalidRate(f32),
    #[error("stress_threshold must be at least 1")]
    ZeroStressThreshold,
    #[error("{name} must be within 0..=1, got {value}")]
    InvalidChance { name: &'static str, value: f32 },
    #[error("school_size must be at least 2 (leader plus a follower), got {0}")]
    InvalidSchoolSize(u32),
    #[error("chase_retreat_margin must not be negative, got {0}")]
    NegativeMargin(f32),
}

/// Configuration for a director run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    /// RNG seed. Same seed and same commands give the same run.
    pub seed: u64,
    pub start_arena: u32,
    /// Global spawn-rate multiplier. 2.0 halves every interval.
    pub rate_multiplier: f32,
    /// Live-enemy count at which spawning halts.
    pub stress_threshold: usize,
    /// Spawns between micro-breathers. 0 disables them.
    pub breather_every_spawns: u32,
    pub breather_frames: u32,
    pub burst_chance: f32,
    pub school_chance: f32,
    pub max_active_schools: usize,
    /// Members per school, leader included.
    pub school_size: u32,
    pub school_policy: SchoolPolicy,
    pub modifier_chance: f32,
    /// Health a returning chase boss keeps above its retreat threshold.
    pub chase_retreat_margin: f32,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_arena: 1,
            rate_multiplier: 1.0,
            stress_threshold: DEFAULT_STRESS_THRESHOLD,
            breather_every_spawns: DEFAULT_BREATHER_EVERY_SPAWNS,
            breather_frames: DEFAULT_BREATHER_FRAMES,
            burst_chance: DEFAULT_BURST_CHANCE,
            school_chance: DEFAULT_SCHOOL_CHANCE,
            max_active_schools: DEFAULT_MAX_ACTIVE_SCHOOLS,
            school_size: DEFAULT_SCHOOL_SIZE,
            school_policy: SchoolPolicy::default(),
            modifier_chance: DEFAULT_MODIFIER_CHANCE,
            chase_retreat_margin: DEFAULT_CHASE_RETREAT_MARGIN,
        }
    }
}

impl DirectorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: DirectorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_arena == 0 {
            return Err(ConfigError::ZeroStartArena);
        }
        if self.rate_multiplier <= 0.0 || !self.rate_multiplier.is_finite() {
            return Err(ConfigError::InvalidRate(self.rate_multiplier));
        }
        if self.stress_threshold == 0 {
            return Err(ConfigError::ZeroStressThreshold);
        }
        for (name, value) in [
            ("burst_chance", self.burst_chance),
            ("school_chance", self.school_chance),
            ("modifier_chance", self.modifier_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidChance { name, value });
            }
        }
        if self.school_size < 2 {
            return Err(ConfigError::InvalidSchoolSize(self.school_size));
        }
        if self.chase_retreat_margin < 0.0 {
            return Err(ConfigError::NegativeMargin(self.chase_retreat_margin));
        }
        Ok(())
    }
}
