//! SKIRMISH headless driver.
//!
//! Runs the simulation engine on its own thread at the nominal tick rate,
//! feeds it commands and input over a channel, and publishes snapshots and
//! game-flow events to whoever renders.

pub mod game_loop;
pub mod state;

pub use skirmish_core as core;
