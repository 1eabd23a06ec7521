//! Snapshot system: queries the ECS world and builds a complete FrameSnapshot.
//!
//! This system is read-only and never modifies the world. Lists are
//! ordered by id so identical simulations serialize identically.

use hecs::{Entity, World};

use skirmish_core::components::*;
use skirmish_core::enums::*;
use skirmish_core::events::SimEvent;
use skirmish_core::state::*;
use skirmish_core::types::{Position, SimTime};

use crate::projectile::Projectile;
use crate::systems::wave_spawner::WaveScheduler;

/// Build a complete FrameSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    level: Option<String>,
    hero: Option<Entity>,
    scheduler: &WaveScheduler,
    events: Vec<SimEvent>,
) -> FrameSnapshot {
    FrameSnapshot {
        time: *time,
        phase,
        level,
        actors: build_actors(world),
        projectiles: build_projectiles(world),
        hero: hero.and_then(|entity| build_hero(world, entity)),
        waves: WaveView {
            spawned: scheduler.spawned_waves(),
            total: scheduler.total_waves(),
            enemies_alive: count_living_enemies(world),
            complete: scheduler.is_complete(),
        },
        events,
    }
}

fn build_actors(world: &World) -> Vec<ActorView> {
    let mut actors: Vec<ActorView> = world
        .query::<(&Actor, &Position, &Facing, &ActorMachine, &Health)>()
        .iter()
        .map(|(_, (actor, pos, facing, machine, health))| ActorView {
            actor_id: actor.id,
            species: actor.species.clone(),
            faction: actor.faction,
            position: *pos,
            facing: *facing,
            state: machine.state,
            frame: machine.frame,
            health: health.current,
            max_health: health.max,
            armor: health.armor,
        })
        .collect();
    actors.sort_by_key(|a| a.actor_id);
    actors
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<&Projectile>()
        .iter()
        .filter(|(_, p)| !p.is_dead())
        .map(|(_, p)| ProjectileView {
            projectile_id: p.id,
            kind: p.kind,
            faction: p.faction,
            position: p.position,
            phase: p.phase,
            frame: p.frame,
        })
        .collect();
    projectiles.sort_by_key(|p| p.projectile_id);
    projectiles
}

fn build_hero(world: &World, entity: Entity) -> Option<HeroView> {
    let actor = world.get::<&Actor>(entity).ok()?;
    let control = world.get::<&HeroControl>(entity).ok()?;
    Some(HeroView {
        actor_id: actor.id,
        mode: control.mode,
        shield_raised: control.shield_raised,
        charging: control.charge_ticks.is_some(),
        elevation: control.elevation,
    })
}

fn count_living_enemies(world: &World) -> u32 {
    world
        .query::<(&Enemy, &ActorMachine)>()
        .iter()
        .filter(|(_, (_, machine))| !machine.state.is_dead())
        .count() as u32
}
