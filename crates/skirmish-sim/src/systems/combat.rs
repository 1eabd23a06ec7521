//! Combat resolution: applies melee, area, and projectile damage.
//!
//! Runs once per tick after actor and projectile updates. Strikes are
//! gathered first, then resolved one attacker category at a time in
//! `AttackCategory::RESOLUTION_ORDER`, by attacker id within a category.
//! Each strike is re-checked just before it resolves, so an attacker killed
//! earlier in the same pass does not hit back.

use hecs::{Entity, World};
use tracing::{debug, info};

use skirmish_ai::fsm::{self, DamageOutcome};
use skirmish_core::components::{Actor, ActorMachine, Health, HeroControl};
use skirmish_core::config::{ArchetypeTable, Delivery};
use skirmish_core::enums::*;
use skirmish_core::events::SimEvent;
use skirmish_core::types::Position;

use crate::projectile::Projectile;

/// Where a strike comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Actor(Entity),
    Projectile(Entity),
}

#[derive(Debug, Clone, Copy)]
struct Strike {
    category: AttackCategory,
    /// Actor id or projectile id, for ordering within a category.
    order: u32,
    source: Source,
    faction: Faction,
    position: Position,
    /// Melee strikes only land on the facing side.
    facing: Option<Facing>,
    range: f64,
    damage: f64,
    area: AreaPolicy,
}

#[derive(Debug, Clone, Copy)]
struct Target {
    id: u32,
    entity: Entity,
    faction: Faction,
    position: Position,
}

/// Resolve all strikes due this tick.
pub fn run(world: &mut World, archetypes: &ArchetypeTable, events: &mut Vec<SimEvent>) {
    resolve(world, archetypes, events, &AttackCategory::RESOLUTION_ORDER);
}

/// Resolve all strikes due this tick, one category at a time in `order`.
pub(crate) fn resolve(
    world: &mut World,
    archetypes: &ArchetypeTable,
    events: &mut Vec<SimEvent>,
    order: &[AttackCategory],
) {
    let mut strikes = gather_strikes(world, archetypes);
    strikes.sort_by_key(|s| (s.category, s.order));

    let mut targets: Vec<Target> = world
        .query::<(&Actor, &Position)>()
        .iter()
        .map(|(entity, (actor, pos))| Target {
            id: actor.id,
            entity,
            faction: actor.faction,
            position: *pos,
        })
        .collect();
    targets.sort_unstable_by_key(|t| t.id);

    for &category in order {
        for strike in strikes.iter().filter(|s| s.category == category) {
            if !still_armed(world, archetypes, strike.source) {
                continue;
            }

            let hits = select_targets(world, strike, &targets);
            if hits.is_empty() {
                continue;
            }
            for target in &hits {
                apply_hit(world, target.entity, strike.damage, Some(strike.position), events);
            }

            match strike.source {
                Source::Actor(entity) => {
                    if let Ok(mut machine) = world.get::<&mut ActorMachine>(entity) {
                        fsm::mark_damage_dealt(&mut machine);
                    }
                }
                Source::Projectile(entity) => {
                    if let Ok(mut projectile) = world.get::<&mut Projectile>(entity) {
                        projectile.mark_damage_dealt();
                    }
                }
            }
        }
    }
}

/// Apply `amount` to an actor, routing frontal hits through a raised shield.
/// `from` is where the hit came from; `None` bypasses the shield.
pub fn apply_hit(
    world: &mut World,
    entity: Entity,
    amount: f64,
    from: Option<Position>,
    events: &mut Vec<SimEvent>,
) -> Option<DamageOutcome> {
    let (actor, machine, health, position, facing, control) = world
        .query_one_mut::<(
            &Actor,
            &mut ActorMachine,
            &mut Health,
            &Position,
            &Facing,
            Option<&mut HeroControl>,
        )>(entity)
        .ok()?;

    let mut amount = amount;
    if let (Some(control), Some(from)) = (control, from) {
        if control.shield_raised && facing.faces(position.dx_to(&from)) {
            let absorbed = amount.min(health.armor);
            health.armor -= absorbed;
            amount -= absorbed;
            if health.armor <= 0.0 {
                health.armor = 0.0;
                control.shield_raised = false;
            }
            // Fully blocked: no flinch.
            if amount <= 0.0 && !machine.state.is_dead() {
                return Some(DamageOutcome::Wounded);
            }
        }
    }

    let outcome = fsm::apply_damage(machine, health, amount);
    if outcome == DamageOutcome::Killed {
        events.push(SimEvent::ActorDied {
            actor_id: actor.id,
            faction: actor.faction,
            species: actor.species.clone(),
        });
        match actor.faction {
            Faction::Hero => {
                info!(actor = actor.id, "hero died");
                events.push(SimEvent::PlayerDied);
            }
            Faction::Enemy => {
                debug!(actor = actor.id, species = %actor.species, "enemy died");
            }
        }
    }
    Some(outcome)
}

fn gather_strikes(world: &World, archetypes: &ArchetypeTable) -> Vec<Strike> {
    let mut strikes = Vec::new();

    for (entity, (actor, machine, pos, facing)) in world
        .query::<(&Actor, &ActorMachine, &Position, &Facing)>()
        .iter()
    {
        let Some(params) = archetypes.get(&actor.species) else {
            continue;
        };
        if !fsm::can_deal_damage(machine, params) {
            continue;
        }
        let Some(attack) = fsm::current_attack(machine, params) else {
            continue;
        };
        let facing = match attack.delivery {
            Delivery::Melee => Some(*facing),
            Delivery::Area => None,
            // Launched by the ranged fire system.
            Delivery::Projectile(_) => continue,
        };
        strikes.push(Strike {
            category: attack.category(actor.faction),
            order: actor.id,
            source: Source::Actor(entity),
            faction: actor.faction,
            position: *pos,
            facing,
            range: attack.range,
            damage: attack.damage,
            area: attack.area,
        });
    }

    for (entity, projectile) in world.query::<&Projectile>().iter() {
        if !projectile.can_deal_damage() {
            continue;
        }
        strikes.push(Strike {
            category: projectile.category,
            order: projectile.id,
            source: Source::Projectile(entity),
            faction: projectile.faction,
            position: projectile.position,
            facing: None,
            range: projectile.hit_range,
            damage: projectile.damage,
            area: projectile.area,
        });
    }

    strikes
}

/// Whether the strike's source can still deal damage at this point of the pass.
fn still_armed(world: &World, archetypes: &ArchetypeTable, source: Source) -> bool {
    match source {
        Source::Actor(entity) => {
            let Ok(actor) = world.get::<&Actor>(entity) else {
                return false;
            };
            let Ok(machine) = world.get::<&ActorMachine>(entity) else {
                return false;
            };
            archetypes
                .get(&actor.species)
                .is_some_and(|params| fsm::can_deal_damage(&machine, params))
        }
        Source::Projectile(entity) => world
            .get::<&Projectile>(entity)
            .is_ok_and(|p| p.can_deal_damage()),
    }
}

/// Living opponents in range (and in front, for melee), nearest first or all.
fn select_targets(world: &World, strike: &Strike, targets: &[Target]) -> Vec<Target> {
    let projectile = match strike.source {
        Source::Projectile(entity) => world.get::<&Projectile>(entity).ok().map(|p| (*p).clone()),
        Source::Actor(_) => None,
    };

    let mut hits: Vec<(f64, Target)> = targets
        .iter()
        .filter(|t| t.faction == strike.faction.opponent())
        .filter(|t| {
            world
                .get::<&ActorMachine>(t.entity)
                .is_ok_and(|m| !m.state.is_dead())
        })
        .filter(|t| match &projectile {
            Some(p) => p.is_colliding_with(&t.position, strike.range),
            None => strike.position.range_to(&t.position) <= strike.range,
        })
        .filter(|t| {
            strike
                .facing
                .map_or(true, |f| f.faces(strike.position.dx_to(&t.position)))
        })
        .map(|t| (strike.position.range_to(&t.position), *t))
        .collect();

    match strike.area {
        AreaPolicy::AllTargets => hits.into_iter().map(|(_, t)| t).collect(),
        AreaPolicy::FirstTarget => {
            hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)));
            hits.into_iter().take(1).map(|(_, t)| t).collect()
        }
    }
}
