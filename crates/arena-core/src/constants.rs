//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz). One `tick` per rendered frame.
pub const TICK_RATE: u32 = 60;

// --- Wave state machine ---

/// Frames spent in WAVE_INTRO before spawning begins.
pub const WAVE_INTRO_FRAMES: u32 = 120;

/// Frames spent in WAVE_CLEAR before the next wave or boss intro.
pub const WAVE_CLEAR_FRAMES: u32 = 90;

/// Boss intro cinematic length. Can be cut short with `SkipCutscene`.
pub const BOSS_INTRO_FRAMES: u32 = 240;

/// Frames the boss spends withdrawing before the chase waves resume.
pub const BOSS_RETREAT_FRAMES: u32 = 150;

/// Frames of the defeat beat before the arena transition starts.
pub const BOSS_DEFEATED_FRAMES: u32 = 180;

/// Frames spent moving between arenas.
pub const ARENA_TRANSITION_FRAMES: u32 = 180;

/// Sub-pause while a wave modifier is announced. The tick body is frozen.
pub const ANNOUNCEMENT_FRAMES: u32 = 90;

// --- Spawn scheduler ---

/// Frames between spawn attempts at the very start of a wave.
pub const BASE_SPAWN_INTERVAL_FRAMES: u32 = 90;

/// Spawn interval floor, whatever the progress and multipliers.
pub const MIN_SPAWN_INTERVAL_FRAMES: u32 = 20;

/// Fraction of the base interval removed once the whole budget has been spent.
pub const INTERVAL_PROGRESS_SCALE: f32 = 0.5;

/// Live enemies at or above which spawning is suspended.
pub const DEFAULT_STRESS_THRESHOLD: usize = 10;

/// A micro-breather is forced after this many spawns.
pub const DEFAULT_BREATHER_EVERY_SPAWNS: u32 = 8;

/// Length of a micro-breather.
pub const DEFAULT_BREATHER_FRAMES: u32 = 120;

/// Probability that a spawn attempt becomes a burst.
pub const DEFAULT_BURST_CHANCE: f32 = 0.2;

/// Inclusive size range of a burst.
pub const BURST_MIN: u32 = 2;
pub const BURST_MAX: u32 = 3;

/// Probability that a spawn attempt becomes a school.
pub const DEFAULT_SCHOOL_CHANCE: f32 = 0.08;

/// Maximum schools alive at once.
pub const DEFAULT_MAX_ACTIVE_SCHOOLS: usize = 2;

/// Leader plus followers.
pub const DEFAULT_SCHOOL_SIZE: u32 = 4;

/// Spacing between formation slots (world units).
pub const SCHOOL_SPACING: f32 = 1.5;

/// Probability that a non-lesson wave rolls a modifier.
pub const DEFAULT_MODIFIER_CHANCE: f32 = 0.3;

// --- Spawn positions ---

/// Distance kept between spawns and the arena wall.
pub const SPAWN_EDGE_INSET: f32 = 2.0;

/// Lateral spread of a lane spawn, as a fraction of the arena half extent.
pub const LANE_JITTER_FRACTION: f32 = 0.6;

/// Closest a random spawn may land to the player.
pub const RANDOM_SPAWN_MIN_DISTANCE: f32 = 8.0;

/// Half-angle of the cone in front of the player where random spawns are rejected.
pub const FACING_EXCLUSION_HALF_ANGLE: f32 = std::f32::consts::FRAC_PI_4;

/// Arenas with at least this half extent apply corridor and corner exclusion.
pub const LARGE_ARENA_HALF_EXTENT: f32 = 28.0;

/// Fraction of the half extent past which both axes count as a corner.
pub const CORNER_EXCLUSION_FRACTION: f32 = 0.75;

/// Half width of the central corridors kept clear in large arenas.
pub const CORRIDOR_HALF_WIDTH: f32 = 2.5;

/// Rejection-sampling attempts for a random spawn position.
pub const RANDOM_SPAWN_ATTEMPTS: u32 = 12;

/// Step and attempts used when nudging a spawn out of an obstacle.
pub const SPAWN_NUDGE_STEP: f32 = 1.0;
pub const SPAWN_NUDGE_ATTEMPTS: u32 = 8;

// --- Boss AI ---

/// Cooldown used when an ability has no spec for the archetype.
pub const DEFAULT_COOLDOWN_FRAMES: u32 = 180;

/// Tell length per phase used when an ability has no spec.
pub const DEFAULT_TELL_FRAMES: [u32; 3] = [45, 35, 25];

/// Gap between combo steps when the pair has no configured minimum.
pub const DEFAULT_COMBO_DELAY_FRAMES: u32 = 30;

/// A combo step blocked by cooldown longer than this abandons the combo.
pub const COMBO_STALL_LIMIT_FRAMES: u32 = 180;

/// Frames between decision attempts when nothing was selectable.
pub const IDLE_RETRY_FRAMES: u32 = 10;

/// Movement below this distance does not count as displacement.
pub const STUCK_EPSILON: f32 = 0.5;

/// Frames without displacement before a reposition is forced.
pub const STUCK_THRESHOLD_FRAMES: u32 = 90;

/// Distance of a forced strafe.
pub const REPOSITION_DISTANCE: f32 = 6.0;

/// Health kept above the retreat threshold when a chase boss re-enters.
pub const DEFAULT_CHASE_RETREAT_MARGIN: f32 = 50.0;

/// Radius of the ring boss fragments spawn on.
pub const FRAGMENT_SPREAD: f32 = 3.0;
