//! Enemy AI system: runs the decision policy for every living enemy.
//!
//! For each enemy, computes distance to the hero, selects a behavior via
//! `skirmish_ai::policy`, and applies the resulting state request and steering.

use hecs::World;

use skirmish_ai::fsm;
use skirmish_ai::policy::{self, Decision};
use skirmish_core::components::{Actor, ActorMachine, AiMemory, Enemy};
use skirmish_core::config::ArchetypeTable;
use skirmish_core::enums::Facing;
use skirmish_core::types::{Position, Velocity};

/// Run AI for all enemies. `target` is the living hero's position, if any.
pub fn run(world: &mut World, archetypes: &ArchetypeTable, target: Option<Position>) {
    for (_entity, (actor, machine, memory, pos, vel, facing, _enemy)) in world.query_mut::<(
        &Actor,
        &mut ActorMachine,
        &mut AiMemory,
        &Position,
        &mut Velocity,
        &mut Facing,
        &Enemy,
    )>() {
        let Some(params) = archetypes.get(&actor.species) else {
            continue;
        };

        // Locked states (attacking, hurt, dead) hold still until they finish.
        if machine.state.is_animation_locked() {
            *vel = Velocity::zero();
            continue;
        }

        let distance = target.map_or(f64::INFINITY, |t| pos.range_to(&t));
        let decision = policy::decide(params, distance, machine.cooldown);
        let target_pos = target.unwrap_or(*pos);

        if decision == Decision::Attack {
            // Rotate through the attack list by attacks started so far.
            let index = (machine.attacks_started as usize % params.attacks.len()) as u8;
            if fsm::request_attack(machine, params, index) {
                *facing = Facing::toward(pos.dx_to(&target_pos), *facing);
                *vel = Velocity::zero();
                memory.shuffle_anchor_x = None;
                continue;
            }
        }

        let steering = policy::steer(params, decision, *pos, target_pos, memory, *facing);
        *vel = steering.velocity;
        *facing = steering.facing;
        fsm::request_locomotion(machine, steering.moving);
    }
}
