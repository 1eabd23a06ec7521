//! Player commands and per-tick input sent from the front end to the simulation.
//!
//! Commands are queued and processed at the next tick boundary. Input intents
//! are merged into one `InputFrame` that the engine consumes exactly once per tick.

use serde::{Deserialize, Serialize};

use crate::enums::LevelId;

/// Flow-control actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Load a built-in level and start simulating it.
    StartLevel { level: LevelId },
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
    /// Set time scale for real-time drivers (1.0 = normal, 0.0 = stalled).
    SetTimeScale { scale: f64 },
}

/// Snapshot of player intent for one tick.
///
/// The boolean intents are edge-triggered: each is true only for the
/// press (or release) that happened since the previous tick. The axis is
/// level-triggered: `None` means the front end reported no change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFrame {
    /// Horizontal movement axis in [-1, 1], or `None` to keep the held value.
    pub move_axis: Option<f64>,
    pub attack_pressed: bool,
    pub attack_released: bool,
    pub jump: bool,
    pub shield_toggle: bool,
    pub mode_switch: bool,
}

impl InputFrame {
    /// Fold a later frame into this one: edges accumulate, the axis takes the
    /// latest reported value.
    pub fn merge(&mut self, later: InputFrame) {
        if let Some(axis) = later.move_axis {
            self.move_axis = Some(axis.clamp(-1.0, 1.0));
        }
        self.attack_pressed |= later.attack_pressed;
        self.attack_released |= later.attack_released;
        self.jump |= later.jump;
        self.shield_toggle |= later.shield_toggle;
        self.mode_switch |= later.mode_switch;
    }

    /// Copy of this frame with every edge cleared, keeping the axis.
    pub fn held(&self) -> InputFrame {
        InputFrame {
            move_axis: self.move_axis,
            ..InputFrame::default()
        }
    }

    /// Axis to act on; a front end that never reported one is standing still.
    pub fn axis(&self) -> f64 {
        self.move_axis.unwrap_or(0.0)
    }
}
