//! Discrete events emitted by the simulation for the game-flow side.

use serde::{Deserialize, Serialize};

use crate::enums::Faction;

/// Game-flow events, collected per tick and delivered with the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// An actor received a lethal hit.
    ActorDied {
        actor_id: u32,
        faction: Faction,
        species: String,
    },
    /// The hero died.
    PlayerDied,
    /// The final wave was cleared. Fires once per level.
    AllEnemiesCleared,
    /// A wave was deployed.
    WaveSpawned { wave: usize, count: u32 },
}
