//! Combat simulation for Skirmish.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces FrameSnapshots for the front end.

pub mod engine;
pub mod layout;
pub mod levels;
pub mod projectile;
pub mod systems;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use skirmish_core as core;

#[cfg(test)]
mod tests;
