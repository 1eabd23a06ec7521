//! Kinematic integration for actors.
//!
//! Updates Position from Velocity each tick (position += velocity * dt),
//! clamps to the arena, and integrates the hero's jump arc.

use hecs::World;

use skirmish_core::components::{ActorMachine, HeroControl};
use skirmish_core::config::ArenaBounds;
use skirmish_core::constants::{DT, JUMP_GRAVITY};
use skirmish_core::types::{Position, Velocity};

pub fn run(world: &mut World, bounds: &ArenaBounds) {
    for (_entity, (pos, vel, machine)) in
        world.query_mut::<(&mut Position, &Velocity, &ActorMachine)>()
    {
        // Animation-locked actors never move.
        if !machine.state.is_animation_locked() {
            pos.x += vel.x * DT;
            pos.y += vel.y * DT;
        }
        *pos = bounds.clamp(*pos);
    }

    update_jumps(world);
}

/// Integrate vertical elevation for jumping heroes. Lands at zero.
pub fn update_jumps(world: &mut World) {
    for (_entity, control) in world.query_mut::<&mut HeroControl>() {
        if control.elevation <= 0.0 && control.vertical_speed <= 0.0 {
            control.elevation = 0.0;
            control.vertical_speed = 0.0;
            continue;
        }
        control.elevation += control.vertical_speed * DT;
        control.vertical_speed -= JUMP_GRAVITY * DT;
        if control.elevation <= 0.0 {
            control.elevation = 0.0;
            control.vertical_speed = 0.0;
        }
    }
}
