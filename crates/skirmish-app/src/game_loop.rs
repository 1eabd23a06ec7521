//! Game loop thread: runs the simulation engine at 60Hz and publishes snapshots.
//!
//! Commands and input arrive via an `mpsc` channel. Each snapshot is stored in
//! shared state for polling, and its events are forwarded to the game-flow
//! side over a second channel.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use skirmish_core::constants::TICK_RATE;
use skirmish_core::events::SimEvent;
use skirmish_core::state::FrameSnapshot;
use skirmish_sim::engine::SimulationEngine;

use crate::state::GameLoopCommand;

/// Nominal duration of one tick at 1x speed.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Scales below this are treated as stalled.
const MIN_TIME_SCALE: f64 = 0.001;

/// Spawns the game loop in a new thread, taking ownership of `engine`.
///
/// Returns the command sender for the front end to use.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    latest_snapshot: Arc<Mutex<Option<FrameSnapshot>>>,
    event_tx: mpsc::Sender<SimEvent>,
) -> io::Result<mpsc::Sender<GameLoopCommand>> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    std::thread::Builder::new()
        .name("skirmish-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, cmd_rx, &latest_snapshot, &event_tx);
        })?;

    Ok(cmd_tx)
}

/// Wall-clock duration of one tick at `time_scale`, or `None` when stalled.
pub fn tick_duration(time_scale: f64) -> Option<Duration> {
    if time_scale > MIN_TIME_SCALE {
        Some(TICK_DURATION.div_f64(time_scale))
    } else {
        None
    }
}

/// Feed every pending message to the engine. Returns false on shutdown.
pub fn drain_commands(engine: &mut SimulationEngine, cmd_rx: &mpsc::Receiver<GameLoopCommand>) -> bool {
    loop {
        match cmd_rx.try_recv() {
            Ok(GameLoopCommand::Player(cmd)) => engine.queue_command(cmd),
            Ok(GameLoopCommand::Input(input)) => engine.submit_input(input),
            Ok(GameLoopCommand::Shutdown) => return false,
            Err(mpsc::TryRecvError::Empty) => return true,
            Err(mpsc::TryRecvError::Disconnected) => return false,
        }
    }
}

/// The game loop. Runs until Shutdown or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<FrameSnapshot>>,
    event_tx: &mpsc::Sender<SimEvent>,
) {
    info!("game loop started");
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands and input
        if !drain_commands(&mut engine, &cmd_rx) {
            info!(tick = engine.time().tick, "game loop stopped");
            return;
        }

        // 2. A zero time scale stalls the clock but still honors commands
        let Some(effective_tick_duration) = tick_duration(engine.time_scale()) else {
            engine.flush_commands();
            std::thread::sleep(TICK_DURATION);
            next_tick_time = Instant::now();
            continue;
        };

        // 3. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();

        // 4. Store latest snapshot for polling
        let events = snapshot.events.clone();
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Forward game-flow events; a closed receiver only loses events
        for event in events {
            let _ = event_tx.send(event);
        }

        // 6. Sleep until next tick
        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind: reset instead of spiraling into catch-up
            debug!("game loop fell behind, resetting clock");
            next_tick_time = now;
        }
    }
}
