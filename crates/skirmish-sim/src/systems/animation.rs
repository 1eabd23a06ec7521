//! Animation system: advances every actor's state machine by one tick.

use hecs::World;

use skirmish_ai::fsm;
use skirmish_core::components::{Actor, ActorMachine};
use skirmish_core::config::ArchetypeTable;

pub fn run(world: &mut World, archetypes: &ArchetypeTable) {
    for (_entity, (actor, machine)) in world.query_mut::<(&Actor, &mut ActorMachine)>() {
        if let Some(params) = archetypes.get(&actor.species) {
            fsm::update(machine, params);
        }
    }
}
