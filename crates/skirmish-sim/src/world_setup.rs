//! Entity spawn factories for the simulation world.
//!
//! Creates the hero, enemies, and projectiles with their component bundles.

use hecs::{EntityBuilder, World};

use skirmish_core::components::*;
use skirmish_core::config::ArchetypeParams;
use skirmish_core::enums::*;
use skirmish_core::types::{Position, Velocity};

use crate::projectile::Projectile;

/// Spawn the player's hero.
pub fn spawn_hero(
    world: &mut World,
    id: u32,
    species: &str,
    params: &ArchetypeParams,
    position: Position,
) -> hecs::Entity {
    world.spawn((
        Actor {
            id,
            faction: Faction::Hero,
            species: species.to_string(),
        },
        Hero,
        position,
        Velocity::zero(),
        Facing::Right,
        full_health(params),
        ActorMachine::default(),
        HeroControl::default(),
    ))
}

/// Spawn one enemy, tagged with its wave when it came from the scheduler.
pub fn spawn_enemy(
    world: &mut World,
    id: u32,
    species: &str,
    params: &ArchetypeParams,
    position: Position,
    wave: Option<usize>,
) -> hecs::Entity {
    let mut builder = EntityBuilder::new();
    builder
        .add(Actor {
            id,
            faction: Faction::Enemy,
            species: species.to_string(),
        })
        .add(Enemy)
        .add(position)
        .add(Velocity::zero())
        .add(Facing::Left)
        .add(full_health(params))
        .add(ActorMachine::default())
        .add(AiMemory {
            origin_x: position.x,
            patrol_dir: -1.0,
            shuffle_anchor_x: None,
            shuffle_dir: 1.0,
        });
    if let Some(wave) = wave {
        builder.add(WaveTag { wave });
    }
    world.spawn(builder.build())
}

pub fn spawn_projectile(world: &mut World, projectile: Projectile) -> hecs::Entity {
    world.spawn((projectile,))
}

fn full_health(params: &ArchetypeParams) -> Health {
    Health {
        current: params.max_health,
        max: params.max_health,
        armor: params.armor,
    }
}
