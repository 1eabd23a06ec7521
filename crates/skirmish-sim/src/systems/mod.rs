//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only).
//! They do not own state; everything lives in components or the engine.

pub mod actor_ai;
pub mod animation;
pub mod cleanup;
pub mod combat;
pub mod hero_control;
pub mod movement;
pub mod projectiles;
pub mod ranged_fire;
pub mod snapshot;
pub mod wave_spawner;
