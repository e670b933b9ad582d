//! Pacing director for the arena survival game.
//!
//! Owns the hecs ECS world and the wave state machine, spends threat
//! budgets through the spawn scheduler, drives the boss ability engine,
//! and produces a `DirectorSnapshot` per frame for the game shell.

pub mod collaborators;
pub mod config;
pub mod context;
pub mod engine;
pub mod systems;

pub use arena_core as core;
pub use collaborators::{
    EntityFactory, EventSink, OpenArena, SpatialQuery, StaticLayout, WorldFactory,
};
pub use config::{ConfigError, DirectorConfig};
pub use engine::Director;

#[cfg(test)]
mod tests;
