//! Simulation engine: the fixed-step clock of the combat core.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands and
//! input, runs all systems in a fixed order, and produces `FrameSnapshot`s.
//! No I/O and no wall clock: time only moves when `tick()` is called.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info, warn};

use skirmish_ai::profiles::default_archetypes;
use skirmish_core::commands::{InputFrame, PlayerCommand};
use skirmish_core::components::ActorMachine;
use skirmish_core::config::{ArchetypeTable, ConfigError, LevelPlan};
use skirmish_core::enums::GamePhase;
use skirmish_core::events::SimEvent;
use skirmish_core::state::FrameSnapshot;
use skirmish_core::types::{Position, SimTime};

use crate::levels;
use crate::systems;
use crate::systems::wave_spawner::WaveScheduler;
use crate::world_setup;

/// Configuration for starting a new simulation.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
        }
    }
}

/// Handle to the one hero the player controls.
#[derive(Debug, Clone)]
pub struct ActiveHero {
    pub entity: Entity,
    pub species: String,
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    time_scale: f64,
    seed: u64,
    rng: ChaCha8Rng,
    archetypes: ArchetypeTable,
    level: Option<LevelPlan>,
    scheduler: WaveScheduler,
    hero: Option<ActiveHero>,
    pending_input: InputFrame,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
    next_actor_id: u32,
    next_projectile_id: u32,
}

impl SimulationEngine {
    /// Create a new engine using the built-in archetype table.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            time_scale: config.time_scale,
            seed: config.seed,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            archetypes: default_archetypes(),
            level: None,
            scheduler: WaveScheduler::default(),
            hero: None,
            pending_input: InputFrame::default(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            next_actor_id: 0,
            next_projectile_id: 0,
        }
    }

    /// Create an engine with an external archetype table, validated up front.
    pub fn with_archetypes(config: SimConfig, archetypes: ArchetypeTable) -> Result<Self, ConfigError> {
        archetypes.validate()?;
        let mut engine = Self::new(config);
        engine.archetypes = archetypes;
        Ok(engine)
    }

    /// Validate and start a level. Nothing changes if validation fails.
    pub fn load_level(&mut self, plan: LevelPlan) -> Result<(), ConfigError> {
        plan.validate(&self.archetypes)?;
        let hero_params = self
            .archetypes
            .get(&plan.hero)
            .ok_or_else(|| ConfigError::UnknownSpecies {
                species: plan.hero.clone(),
            })?;

        self.world.clear();
        self.time = SimTime::default();
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.next_actor_id = 0;
        self.next_projectile_id = 0;
        self.events.clear();

        let id = self.next_actor_id;
        self.next_actor_id += 1;
        let entity = world_setup::spawn_hero(
            &mut self.world,
            id,
            &plan.hero,
            hero_params,
            plan.bounds.clamp(plan.hero_start),
        );
        self.hero = Some(ActiveHero {
            entity,
            species: plan.hero.clone(),
        });
        self.scheduler = WaveScheduler::new(plan.waves.clone());

        info!(
            level = %plan.name,
            waves = plan.waves.len(),
            enemies = plan.total_enemies(),
            "level started"
        );
        self.level = Some(plan);
        self.phase = GamePhase::Active;
        Ok(())
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Apply queued commands without advancing. Drivers call this while stalled.
    pub fn flush_commands(&mut self) {
        self.process_commands();
    }

    /// Merge input arriving between ticks; consumed once at the next tick.
    pub fn submit_input(&mut self, input: InputFrame) {
        self.pending_input.merge(input);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> FrameSnapshot {
        self.process_commands();
        let input = self.take_input();

        if self.phase == GamePhase::Active {
            let level_complete = self.run_systems(input);
            self.check_outcome(level_complete);
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.level.as_ref().map(|l| l.name.clone()),
            self.hero.as_ref().map(|h| h.entity),
            &self.scheduler,
            events,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn hero(&self) -> Option<&ActiveHero> {
        self.hero.as_ref()
    }

    pub fn archetypes(&self) -> &ArchetypeTable {
        &self.archetypes
    }

    pub fn level(&self) -> Option<&LevelPlan> {
        self.level.as_ref()
    }

    /// Entity of the actor with `id`.
    #[cfg(test)]
    pub fn actor_entity(&self, id: u32) -> Option<Entity> {
        self.world
            .query::<&skirmish_core::components::Actor>()
            .iter()
            .find(|(_, actor)| actor.id == id)
            .map(|(entity, _)| entity)
    }

    /// Apply damage to an actor outside of combat (bypasses shields).
    #[cfg(test)]
    pub fn damage_actor(
        &mut self,
        id: u32,
        amount: f64,
    ) -> Option<skirmish_ai::fsm::DamageOutcome> {
        let entity = self.actor_entity(id)?;
        systems::combat::apply_hit(&mut self.world, entity, amount, None, &mut self.events)
    }

    /// Spawn an enemy outside the wave plan. Returns its actor id.
    #[cfg(test)]
    pub fn spawn_enemy_at(&mut self, species: &str, position: Position) -> Option<u32> {
        let params = self.archetypes.get(species)?;
        let id = self.next_actor_id;
        self.next_actor_id += 1;
        world_setup::spawn_enemy(&mut self.world, id, species, params, position, None);
        Some(id)
    }

    /// Insert a projectile directly.
    #[cfg(test)]
    pub fn spawn_test_projectile(&mut self, projectile: crate::projectile::Projectile) {
        self.next_projectile_id = self.next_projectile_id.max(projectile.id + 1);
        world_setup::spawn_projectile(&mut self.world, projectile);
    }

    /// Edges cleared, axis held until the front end reports a change.
    fn take_input(&mut self) -> InputFrame {
        let input = self.pending_input;
        self.pending_input = input.held();
        input
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartLevel { level } => {
                let plan = levels::build_level(level);
                if let Err(err) = self.load_level(plan) {
                    error!(?level, %err, "built-in level failed validation");
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::SetTimeScale { scale } => {
                if !scale.is_finite() {
                    warn!(scale, "ignoring non-finite time scale");
                    return;
                }
                self.time_scale = scale.clamp(0.0, 4.0);
            }
        }
    }

    /// Position of the hero while alive.
    fn living_hero_position(&self) -> Option<Position> {
        let hero = self.hero.as_ref()?;
        let machine = self.world.get::<&ActorMachine>(hero.entity).ok()?;
        if machine.state.is_dead() {
            return None;
        }
        self.world.get::<&Position>(hero.entity).ok().map(|p| *p)
    }

    /// Run all systems in order. Returns true when the level was completed this tick.
    fn run_systems(&mut self, input: InputFrame) -> bool {
        let Some(bounds) = self.level.as_ref().map(|l| l.bounds) else {
            return false;
        };

        // 1. Animation frames, cooldowns, dead timers
        systems::animation::run(&mut self.world, &self.archetypes);
        // 2. Hero input
        if let Some(hero) = &self.hero {
            systems::hero_control::run(&mut self.world, &self.archetypes, hero.entity, input);
        }
        // 3. Enemy decisions
        let hero_pos = self.living_hero_position();
        systems::actor_ai::run(&mut self.world, &self.archetypes, hero_pos);
        // 4. Projectile launches for ranged attacks entering their hit window
        systems::ranged_fire::run(
            &mut self.world,
            &self.archetypes,
            hero_pos,
            &mut self.next_projectile_id,
        );
        // 5. Movement integration
        systems::movement::run(&mut self.world, &bounds);
        // 6. Projectile flight and explosions
        systems::projectiles::run(&mut self.world);
        // 7. Damage resolution
        systems::combat::run(&mut self.world, &self.archetypes, &mut self.events);
        // 8. Dead-actor and spent-projectile removal
        systems::cleanup::run(&mut self.world, &self.archetypes, &mut self.despawn_buffer);
        // 9. Wave scheduler
        systems::wave_spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.scheduler,
            &self.archetypes,
            &bounds,
            &mut self.next_actor_id,
            &mut self.events,
            self.time.tick,
        )
    }

    /// Freeze on defeat or victory. Defeat wins a same-tick tie.
    fn check_outcome(&mut self, level_complete: bool) {
        let hero_dead = self.hero.as_ref().is_some_and(|hero| {
            self.world
                .get::<&ActorMachine>(hero.entity)
                .is_ok_and(|m| m.state.is_dead())
        });

        if hero_dead {
            self.phase = GamePhase::Defeat;
            info!(tick = self.time.tick, "defeat");
        } else if level_complete {
            self.phase = GamePhase::Victory;
            info!(tick = self.time.tick, "victory");
        }
    }
}
