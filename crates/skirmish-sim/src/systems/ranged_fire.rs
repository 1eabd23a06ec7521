//! Ranged fire system: launches projectiles when a ranged attack's
//! hit window opens.
//!
//! The attacker's damage latch doubles as the "already fired" flag, so one
//! attack instance launches exactly one projectile.

use hecs::{Entity, World};
use tracing::debug;

use skirmish_ai::fsm;
use skirmish_core::components::{Actor, ActorMachine};
use skirmish_core::config::ArchetypeTable;
use skirmish_core::enums::{Facing, Faction};
use skirmish_core::types::Position;

use crate::projectile::Projectile;
use crate::world_setup;

/// Fire every due projectile, in actor-id order.
/// `hero_pos` is the aim point for enemy shots.
pub fn run(
    world: &mut World,
    archetypes: &ArchetypeTable,
    hero_pos: Option<Position>,
    next_projectile_id: &mut u32,
) {
    let mut shooters: Vec<(u32, Entity)> = world
        .query::<(&Actor, &ActorMachine)>()
        .iter()
        .filter(|(_, (actor, machine))| {
            archetypes.get(&actor.species).is_some_and(|params| {
                fsm::can_deal_damage(machine, params)
                    && fsm::current_attack(machine, params).is_some_and(|a| a.projectile().is_some())
            })
        })
        .map(|(entity, (actor, _))| (actor.id, entity))
        .collect();
    shooters.sort_unstable_by_key(|(id, _)| *id);

    for (_, entity) in shooters {
        let Ok((actor, machine, pos, facing)) =
            world.query_one_mut::<(&Actor, &mut ActorMachine, &Position, &Facing)>(entity)
        else {
            continue;
        };
        let Some(params) = archetypes.get(&actor.species) else {
            continue;
        };
        let Some(attack) = fsm::current_attack(machine, params) else {
            continue;
        };
        let Some(spec) = attack.projectile() else {
            continue;
        };

        let aim_point = match (actor.faction, hero_pos) {
            (Faction::Enemy, Some(hero)) => hero,
            _ => Position::new(pos.x + facing.sign() * spec.max_range, pos.y),
        };

        let id = *next_projectile_id;
        *next_projectile_id += 1;
        let projectile = Projectile::launch(
            id,
            actor.id,
            actor.faction,
            attack,
            spec,
            *pos,
            aim_point,
            *facing,
        );
        debug!(
            projectile = id,
            owner = actor.id,
            kind = ?spec.kind,
            "projectile launched"
        );
        fsm::mark_damage_dealt(machine);
        world_setup::spawn_projectile(world, projectile);
    }
}
