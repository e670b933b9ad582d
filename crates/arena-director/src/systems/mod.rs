//! Systems run by the director each tick.
//!
//! Systems are free functions over the `SimulationContext` (or the parts of
//! it they need). They do not own state; all state lives in the context and
//! in components.

pub mod boss;
pub mod budget;
pub mod choreography;
pub mod cleanup;
pub mod pool;
pub mod school;
pub mod snapshot;
pub mod spawn_scheduler;
pub mod wave_flow;
