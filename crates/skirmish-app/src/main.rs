//! skirmish: headless terminal driver for the combat simulation.
//!
//! Usage:
//!   skirmish [--level training|ambush|siege|<plan.json>] [--archetypes <table.json>] [--seed N]
//!
//! Reads one intent per stdin line while the simulation runs at 60Hz.

use std::io::BufRead;
use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use skirmish_app::game_loop::spawn_game_loop;
use skirmish_app::state::{AppState, GameLoopCommand};
use skirmish_core::commands::{InputFrame, PlayerCommand};
use skirmish_core::config::{ArchetypeTable, LevelPlan};
use skirmish_core::enums::LevelId;
use skirmish_core::events::SimEvent;
use skirmish_core::state::FrameSnapshot;
use skirmish_sim::engine::{SimConfig, SimulationEngine};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let seed = match parse_value(&args, "--seed") {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("invalid --seed `{raw}`"))?,
        None => SimConfig::default().seed,
    };
    let config = SimConfig {
        seed,
        ..Default::default()
    };

    let mut engine = match parse_value(&args, "--archetypes") {
        Some(path) => {
            let table = load_archetypes(Path::new(path))?;
            SimulationEngine::with_archetypes(config, table)
                .context("archetype table rejected")?
        }
        None => SimulationEngine::new(config),
    };

    let level = parse_value(&args, "--level").unwrap_or("training");
    match builtin_level(level) {
        Some(id) => engine.queue_command(PlayerCommand::StartLevel { level: id }),
        None => {
            let plan = load_level(Path::new(level), engine.archetypes())?;
            engine
                .load_level(plan)
                .with_context(|| format!("level `{level}` rejected"))?;
        }
    }

    let state = AppState::new();
    let (event_tx, event_rx) = mpsc::channel::<SimEvent>();
    let command_tx = spawn_game_loop(engine, Arc::clone(&state.latest_snapshot), event_tx)
        .context("failed to spawn game loop thread")?;
    *state
        .command_tx
        .lock()
        .map_err(|_| anyhow::anyhow!("command channel lock poisoned"))? = Some(command_tx);

    std::thread::Builder::new()
        .name("skirmish-events".into())
        .spawn(move || report_events(event_rx))
        .context("failed to spawn event thread")?;

    print_controls();
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        match parse_intent(line.trim()) {
            Some(Intent::Quit) => break,
            Some(Intent::Help) => print_controls(),
            Some(Intent::Status) => match state.snapshot() {
                Some(snapshot) => print_status(&snapshot),
                None => println!("no snapshot yet"),
            },
            Some(Intent::Send(command)) => {
                if !state.send(command) {
                    warn!("game loop is gone");
                    break;
                }
            }
            None => println!("unrecognized input `{}` (type `help`)", line.trim()),
        }
    }

    state.send(GameLoopCommand::Shutdown);
    Ok(())
}

/// One parsed line of terminal input.
#[derive(Debug)]
enum Intent {
    Send(GameLoopCommand),
    Status,
    Help,
    Quit,
}

fn parse_intent(line: &str) -> Option<Intent> {
    let mut words = line.split_whitespace();
    let word = words.next()?;
    let input = |frame: InputFrame| Some(Intent::Send(GameLoopCommand::Input(frame)));
    let player = |cmd: PlayerCommand| Some(Intent::Send(GameLoopCommand::Player(cmd)));

    match word {
        "a" | "left" => input(InputFrame {
            move_axis: Some(-1.0),
            ..Default::default()
        }),
        "d" | "right" => input(InputFrame {
            move_axis: Some(1.0),
            ..Default::default()
        }),
        "s" | "stop" => input(InputFrame {
            move_axis: Some(0.0),
            ..Default::default()
        }),
        // A tap: press and release land in the same tick.
        "j" | "attack" => input(InputFrame {
            attack_pressed: true,
            attack_released: true,
            ..Default::default()
        }),
        "charge" => input(InputFrame {
            attack_pressed: true,
            ..Default::default()
        }),
        "release" => input(InputFrame {
            attack_released: true,
            ..Default::default()
        }),
        "k" | "jump" => input(InputFrame {
            jump: true,
            ..Default::default()
        }),
        "l" | "shield" => input(InputFrame {
            shield_toggle: true,
            ..Default::default()
        }),
        "m" | "mode" => input(InputFrame {
            mode_switch: true,
            ..Default::default()
        }),
        "p" | "pause" => player(PlayerCommand::Pause),
        "r" | "resume" => player(PlayerCommand::Resume),
        "speed" => {
            let scale = words.next()?.parse::<f64>().ok()?;
            player(PlayerCommand::SetTimeScale { scale })
        }
        "level" => player(PlayerCommand::StartLevel {
            level: builtin_level(words.next()?)?,
        }),
        "status" | "?" => Some(Intent::Status),
        "q" | "quit" => Some(Intent::Quit),
        "h" | "help" => Some(Intent::Help),
        _ => None,
    }
}

fn builtin_level(name: &str) -> Option<LevelId> {
    match name.to_ascii_lowercase().as_str() {
        "training" => Some(LevelId::Training),
        "ambush" => Some(LevelId::Ambush),
        "siege" => Some(LevelId::Siege),
        _ => None,
    }
}

fn parse_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].as_str());
        }
    }
    None
}

fn load_archetypes(path: &Path) -> Result<ArchetypeTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read archetypes {}", path.display()))?;
    let table = ArchetypeTable::from_json(&text)
        .with_context(|| format!("invalid archetypes {}", path.display()))?;
    info!(path = %path.display(), species = table.species.len(), "archetypes loaded");
    Ok(table)
}

fn load_level(path: &Path, archetypes: &ArchetypeTable) -> Result<LevelPlan> {
    if !path.exists() {
        bail!(
            "`{}` is neither a built-in level (training, ambush, siege) nor a file",
            path.display()
        );
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read level {}", path.display()))?;
    LevelPlan::from_json(&text, archetypes)
        .with_context(|| format!("invalid level {}", path.display()))
}

/// Game-flow side: log what the simulation reports.
fn report_events(event_rx: mpsc::Receiver<SimEvent>) {
    for event in event_rx {
        match event {
            SimEvent::WaveSpawned { wave, count } => info!(wave, count, "wave incoming"),
            SimEvent::ActorDied {
                actor_id, species, ..
            } => info!(actor = actor_id, %species, "actor down"),
            SimEvent::PlayerDied => info!("you died"),
            SimEvent::AllEnemiesCleared => info!("all enemies cleared"),
        }
    }
}

fn print_status(snapshot: &FrameSnapshot) {
    println!(
        "[{:?}] tick {} level {} waves {}/{} enemies alive {}",
        snapshot.phase,
        snapshot.time.tick,
        snapshot.level.as_deref().unwrap_or("-"),
        snapshot.waves.spawned,
        snapshot.waves.total,
        snapshot.waves.enemies_alive,
    );
    for actor in &snapshot.actors {
        let sprite = actor.sprite();
        println!(
            "  #{:<3} {:<8} ({:>7.1}, {:>6.1}) {:>5.1}/{:<5.1} {} [{}]",
            actor.actor_id,
            actor.species,
            actor.position.x,
            actor.position.y,
            actor.health,
            actor.max_health,
            sprite.sheet,
            sprite.frame,
        );
    }
    for projectile in &snapshot.projectiles {
        let sprite = projectile.sprite();
        println!(
            "  *{:<3} ({:>7.1}, {:>6.1}) {} [{}]",
            projectile.projectile_id,
            projectile.position.x,
            projectile.position.y,
            sprite.sheet,
            sprite.frame,
        );
    }
    if let Some(hero) = &snapshot.hero {
        println!(
            "  hero mode {:?} shield {} charging {}",
            hero.mode, hero.shield_raised, hero.charging
        );
    }
}

fn print_usage() {
    eprintln!(
        "skirmish: headless combat simulation driver\n\
         \n\
           --level <name|path>   training, ambush, siege, or a level plan JSON file\n\
           --archetypes <path>   archetype table JSON (defaults to the built-in table)\n\
           --seed <N>            RNG seed (default: 42)\n\
         \n\
         Logging is controlled with RUST_LOG (default: info).\n"
    );
}

fn print_controls() {
    println!(
        "controls: a/d move, s stop, j attack, charge/release, k jump, l shield, m mode,\n\
         \x20         p pause, r resume, speed <x>, level <name>, status, q quit"
    );
}
