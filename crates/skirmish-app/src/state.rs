//! Application state shared between the front end and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use skirmish_core::commands::{InputFrame, PlayerCommand};
use skirmish_core::state::FrameSnapshot;

/// Messages sent from the front end to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A flow command to forward to the simulation engine.
    Player(PlayerCommand),
    /// Player intent, merged into the next tick's input frame.
    Input(InputFrame),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handles held by the front end.
///
/// - `command_tx` is `None` until the loop has been spawned
/// - `latest_snapshot` is shared with the game loop thread
pub struct AppState {
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot, updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<FrameSnapshot>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a message to the loop. Returns false if the loop is gone.
    pub fn send(&self, command: GameLoopCommand) -> bool {
        let Ok(guard) = self.command_tx.lock() else {
            return false;
        };
        guard
            .as_ref()
            .is_some_and(|tx| tx.send(command).is_ok())
    }

    /// Copy of the most recent snapshot.
    pub fn snapshot(&self) -> Option<FrameSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }
}
