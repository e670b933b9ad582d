//! Commands sent from the game shell to the director.
//!
//! Commands are queued and processed at the next tick boundary.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::types::EntityHandle;

/// All inputs the director accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DirectorCommand {
    // --- Run control ---
    /// Begin the run at the configured starting arena.
    StartRun,
    /// Restart the current arena from its lesson wave. Clears chase state.
    RestartArena,
    /// Freeze every timer.
    Pause,
    /// Unfreeze.
    Resume,
    /// Cut the boss intro cinematic short.
    SkipCutscene,

    // --- World feedback ---
    /// An enemy or fragment died.
    EnemyDied { handle: EntityHandle },
    /// Damage dealt to the boss.
    DamageBoss { amount: f32 },
    /// Latest player position and facing (radians, 0 = North).
    UpdatePlayer { position: Vec2, facing: f32 },
    /// Latest boss position from the movement layer.
    UpdateBossPosition { position: Vec2 },
}
