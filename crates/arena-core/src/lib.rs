//! Core types and definitions for the arena pacing engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! data-model records, catalog tables, commands, events, snapshots,
//! frame timers and constants. It holds no runtime state and has no
//! dependency on an ECS or a renderer.

pub mod budget;
pub mod builtin;
pub mod catalog;
pub mod commands;
pub mod components;
pub mod constants;
pub mod countdown;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
