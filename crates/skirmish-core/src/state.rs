//! Frame snapshot: the complete visible state handed to the renderer each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{Position, SimTime};

/// Complete simulation state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub level: Option<String>,
    pub actors: Vec<ActorView>,
    pub projectiles: Vec<ProjectileView>,
    pub hero: Option<HeroView>,
    pub waves: WaveView,
    pub events: Vec<SimEvent>,
}

/// One actor as the renderer sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorView {
    pub actor_id: u32,
    pub species: String,
    pub faction: Faction,
    pub position: Position,
    pub facing: Facing,
    pub state: ActorState,
    pub frame: u32,
    pub health: f64,
    pub max_health: f64,
    pub armor: f64,
}

/// One live projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub projectile_id: u32,
    pub kind: ProjectileKind,
    pub faction: Faction,
    pub position: Position,
    pub phase: ProjectilePhase,
    pub frame: u32,
}

/// Hero-specific HUD data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroView {
    pub actor_id: u32,
    pub mode: HeroMode,
    pub shield_raised: bool,
    pub charging: bool,
    pub elevation: f64,
}

/// Wave progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    /// Waves deployed so far.
    pub spawned: usize,
    pub total: usize,
    /// Enemies still alive across all waves.
    pub enemies_alive: u32,
    pub complete: bool,
}
