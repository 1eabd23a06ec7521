//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in the AI crate and in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Identity of a combat actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Monotonic id assigned at spawn; orders every outcome-affecting pass.
    pub id: u32,
    pub faction: Faction,
    /// Archetype key into the archetype table.
    pub species: String,
}

/// Health and armor pools. `current` stays within `[0, max]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
    /// Absorbs frontal hits while the hero's shield is raised.
    pub armor: f64,
}

/// Logical state machine data for one actor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActorMachine {
    pub state: ActorState,
    /// Animation frame within the current state.
    pub frame: u32,
    /// Ticks spent on the current frame.
    pub frame_ticks: u32,
    /// Ticks until a new attack may begin.
    pub cooldown: u32,
    /// Ticks spent in `Dead`.
    pub dead_timer: u32,
    /// Set once the current attack instance has landed (or fired).
    pub damage_latch: bool,
    /// Number of attacks started, used to rotate enemy attack variants.
    pub attacks_started: u32,
}

/// Per-enemy AI memory that persists across ticks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AiMemory {
    /// Patrol center (spawn x).
    pub origin_x: f64,
    /// Current patrol direction (-1 or +1).
    pub patrol_dir: f64,
    /// x where the current cooldown shuffle began.
    pub shuffle_anchor_x: Option<f64>,
    /// Current shuffle direction (-1 or +1).
    pub shuffle_dir: f64,
}

/// Hero-only control state driven by player input.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HeroControl {
    pub mode: HeroMode,
    pub shield_raised: bool,
    /// Ticks the attack button has been held, while charging.
    pub charge_ticks: Option<u32>,
    /// Next combo step to fire.
    pub combo_step: usize,
    /// Ticks since the last combo attack ended.
    pub combo_idle_ticks: u32,
    /// Height above the ground lane (cosmetic jump arc).
    pub elevation: f64,
    pub vertical_speed: f64,
}

/// Marks an entity as belonging to a scheduled wave.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaveTag {
    pub wave: usize,
}

/// Marks the player's hero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hero;

/// Marks an enemy actor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy;
