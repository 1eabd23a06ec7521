//! Wave spawning system: deploys waves as their spawn triggers are met.
//!
//! Wave 0 deploys unconditionally on the first tick. Wave i>0 either deploys
//! with wave i-1 (`Immediate`) or once every enemy of wave i-1 is dead and
//! the delay has elapsed since that clearance was first observed.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use skirmish_core::components::{ActorMachine, WaveTag};
use skirmish_core::config::{ArchetypeTable, ArenaBounds, WaveSpec};
use skirmish_core::enums::SpawnTrigger;
use skirmish_core::events::SimEvent;
use skirmish_core::types::{secs_to_ticks, Position};

use crate::layout;

/// One enemy to instantiate.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnOrder {
    pub wave: usize,
    pub species: String,
    pub position: Position,
}

/// Outcome of one scheduler pass.
#[derive(Debug, Default)]
pub struct SchedulerStep {
    pub spawns: Vec<SpawnOrder>,
    /// True exactly once: on the pass that observes the final clearance.
    pub level_complete: bool,
}

/// Scheduler state for one level.
#[derive(Debug, Clone, Default)]
pub struct WaveScheduler {
    waves: Vec<WaveSpec>,
    /// Index of the next wave to deploy. Only ever increases.
    next_wave: usize,
    /// Tick at which the previous wave was first observed cleared.
    cleared_at: Option<u64>,
    deployed: Vec<bool>,
    complete: bool,
}

impl WaveScheduler {
    pub fn new(waves: Vec<WaveSpec>) -> Self {
        let deployed = vec![false; waves.len()];
        Self {
            waves,
            next_wave: 0,
            cleared_at: None,
            deployed,
            complete: false,
        }
    }

    /// Waves deployed so far.
    pub fn spawned_waves(&self) -> usize {
        self.next_wave
    }

    pub fn total_waves(&self) -> usize {
        self.waves.len()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Run one pass. `alive_in_wave(i)` counts living enemies of wave `i`.
    pub fn step<R: Rng>(
        &mut self,
        tick: u64,
        alive_in_wave: impl Fn(usize) -> u32,
        rng: &mut R,
    ) -> SchedulerStep {
        let mut step = SchedulerStep::default();
        if self.complete || self.waves.is_empty() {
            return step;
        }

        let mut deployed_this_pass: Option<usize> = None;
        while self.next_wave < self.waves.len() {
            let index = self.next_wave;
            let ready = index == 0
                || match self.waves[index].trigger {
                    SpawnTrigger::Immediate => true,
                    SpawnTrigger::AfterPreviousCleared { delay_secs } => {
                        // Enemies ordered this pass are not in the world yet.
                        if deployed_this_pass == Some(index - 1) || alive_in_wave(index - 1) > 0 {
                            false
                        } else {
                            let cleared_at = *self.cleared_at.get_or_insert(tick);
                            tick.saturating_sub(cleared_at) >= secs_to_ticks(delay_secs)
                        }
                    }
                };
            if !ready {
                break;
            }

            self.next_wave += 1;
            self.cleared_at = None;
            if self.deployed[index] {
                warn!(wave = index, "wave already deployed, skipping");
                debug_assert!(false, "wave {index} deployed twice");
                continue;
            }
            self.deployed[index] = true;
            deployed_this_pass = Some(index);

            let wave = &self.waves[index];
            let positions = layout::spawn_positions(wave, rng);
            step.spawns.extend(
                wave.expanded_species()
                    .into_iter()
                    .zip(positions)
                    .map(|(species, position)| SpawnOrder {
                        wave: index,
                        species: species.to_string(),
                        position,
                    }),
            );
        }

        if self.next_wave == self.waves.len() && deployed_this_pass.is_none() {
            let alive: u32 = (0..self.waves.len()).map(&alive_in_wave).sum();
            if alive == 0 {
                self.complete = true;
                step.level_complete = true;
            }
        }
        step
    }
}

/// Count living enemies of `wave` in the world.
pub fn alive_in_wave(world: &World, wave: usize) -> u32 {
    world
        .query::<(&WaveTag, &ActorMachine)>()
        .iter()
        .filter(|(_, (tag, machine))| tag.wave == wave && !machine.state.is_dead())
        .count() as u32
}

/// Run the scheduler and instantiate whatever it orders.
/// Returns true on the tick the level is completed.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    scheduler: &mut WaveScheduler,
    archetypes: &ArchetypeTable,
    bounds: &ArenaBounds,
    next_actor_id: &mut u32,
    events: &mut Vec<SimEvent>,
    tick: u64,
) -> bool {
    let step = {
        let view: &World = world;
        scheduler.step(tick, |wave| alive_in_wave(view, wave), rng)
    };

    let mut per_wave: Vec<(usize, u32)> = Vec::new();
    for order in step.spawns {
        let Some(params) = archetypes.get(&order.species) else {
            warn!(species = %order.species, "spawn order for unknown species dropped");
            continue;
        };
        let id = *next_actor_id;
        *next_actor_id += 1;
        crate::world_setup::spawn_enemy(
            world,
            id,
            &order.species,
            params,
            bounds.clamp(order.position),
            Some(order.wave),
        );
        match per_wave.last_mut() {
            Some((wave, count)) if *wave == order.wave => *count += 1,
            _ => per_wave.push((order.wave, 1)),
        }
    }

    for (wave, count) in per_wave {
        debug!(wave, count, tick, "wave spawned");
        events.push(SimEvent::WaveSpawned { wave, count });
    }

    if step.level_complete {
        events.push(SimEvent::AllEnemiesCleared);
    }
    step.level_complete
}
