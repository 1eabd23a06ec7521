//! Presentation-frame mapping for the renderer.
//!
//! The simulation only knows logical states and frame counters; sprite sheet
//! names are derived here and never fed back into the simulation.

use serde::{Deserialize, Serialize};

use crate::enums::{ActorState, ProjectileKind, ProjectilePhase};
use crate::state::{ActorView, ProjectileView};

/// Sprite sheet key plus frame index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteFrame {
    pub sheet: String,
    pub frame: u32,
}

/// Sheet name for a logical actor state (`attack<n>` is 1-based).
pub fn state_sheet(state: ActorState) -> String {
    match state {
        ActorState::Idle => "idle".into(),
        ActorState::Move => "move".into(),
        ActorState::Attack(n) => format!("attack{}", n as u32 + 1),
        ActorState::Hurt => "hurt".into(),
        ActorState::Dead => "dead".into(),
    }
}

pub fn sprite_frame(species: &str, state: ActorState, frame: u32) -> SpriteFrame {
    SpriteFrame {
        sheet: format!("{species}/{}", state_sheet(state)),
        frame,
    }
}

pub fn projectile_sprite(kind: ProjectileKind, phase: ProjectilePhase, frame: u32) -> SpriteFrame {
    let base = match kind {
        ProjectileKind::Bolt => "bolt",
        ProjectileKind::Explosive => "orb",
    };
    let sheet = match phase {
        ProjectilePhase::Flying => format!("{base}/fly"),
        ProjectilePhase::Exploding => format!("{base}/explode"),
        ProjectilePhase::Dead => format!("{base}/gone"),
    };
    SpriteFrame { sheet, frame }
}

impl ActorView {
    pub fn sprite(&self) -> SpriteFrame {
        sprite_frame(&self.species, self.state, self.frame)
    }
}

impl ProjectileView {
    pub fn sprite(&self) -> SpriteFrame {
        projectile_sprite(self.kind, self.phase, self.frame)
    }
}
