//! Cleanup system: removes dead enemies and spent projectiles.
//!
//! A dead actor is retained for its archetype's dead duration so the death
//! animation can finish. The hero is never removed.

use hecs::{Entity, World};

use skirmish_core::components::{Actor, ActorMachine, Enemy};
use skirmish_core::config::ArchetypeTable;

use crate::projectile::Projectile;

/// Single filter pass, run once per tick.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, archetypes: &ArchetypeTable, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (actor, machine, _enemy)) in
        world.query_mut::<(&Actor, &ActorMachine, &Enemy)>()
    {
        if !machine.state.is_dead() {
            continue;
        }
        let retain_for = archetypes
            .get(&actor.species)
            .map_or(0, |params| params.dead_duration_ticks);
        if machine.dead_timer >= retain_for {
            despawn_buffer.push(entity);
        }
    }

    for (entity, projectile) in world.query_mut::<&Projectile>() {
        if projectile.is_dead() {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
