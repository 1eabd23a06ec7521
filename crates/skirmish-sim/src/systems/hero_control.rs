//! Hero control system: consumes the tick's input frame.
//!
//! Handles stance and shield toggles, jumping, combo / charged / ranged
//! attacks, and horizontal movement. Runs once per tick with the input
//! frame taken at the start of that tick.

use hecs::{Entity, World};

use skirmish_ai::fsm;
use skirmish_core::commands::InputFrame;
use skirmish_core::components::{Actor, ActorMachine, Health, HeroControl};
use skirmish_core::config::{ArchetypeParams, ArchetypeTable};
use skirmish_core::constants::JUMP_SPEED;
use skirmish_core::enums::{ActorState, AttackTrigger, Facing, HeroMode};
use skirmish_core::types::Velocity;

pub fn run(world: &mut World, archetypes: &ArchetypeTable, hero: Entity, input: InputFrame) {
    let Ok((actor, machine, control, velocity, facing, health)) = world.query_one_mut::<(
        &Actor,
        &mut ActorMachine,
        &mut HeroControl,
        &mut Velocity,
        &mut Facing,
        &Health,
    )>(hero) else {
        return;
    };
    let Some(params) = archetypes.get(&actor.species) else {
        return;
    };

    if machine.state.is_dead() {
        *velocity = Velocity::zero();
        control.charge_ticks = None;
        control.shield_raised = false;
        return;
    }

    if !matches!(machine.state, ActorState::Attack(_)) {
        control.combo_idle_ticks = control.combo_idle_ticks.saturating_add(1);
    }
    if let Some(held) = control.charge_ticks.as_mut() {
        *held = held.saturating_add(1);
    }

    let locked = machine.state.is_animation_locked();

    if !locked {
        if input.mode_switch {
            control.mode = match control.mode {
                HeroMode::Melee => HeroMode::Ranged,
                HeroMode::Ranged => HeroMode::Melee,
            };
            control.charge_ticks = None;
        }
        if input.shield_toggle {
            control.shield_raised = !control.shield_raised && health.armor > 0.0;
            control.charge_ticks = None;
        }
        if input.jump && control.elevation <= 0.0 && control.vertical_speed == 0.0 {
            control.vertical_speed = JUMP_SPEED;
        }
    }

    if !locked && !control.shield_raised {
        handle_attack(machine, control, params, input);
    } else if input.attack_released {
        control.charge_ticks = None;
    }

    if machine.state.is_animation_locked() || control.shield_raised {
        *velocity = Velocity::zero();
        fsm::request_locomotion(machine, false);
        return;
    }

    let axis = input.axis().clamp(-1.0, 1.0);
    *velocity = Velocity::new(axis * params.speed, 0.0);
    *facing = Facing::toward(axis, *facing);
    fsm::request_locomotion(machine, axis != 0.0);
}

fn handle_attack(
    machine: &mut ActorMachine,
    control: &mut HeroControl,
    params: &ArchetypeParams,
    input: InputFrame,
) {
    match control.mode {
        HeroMode::Ranged => {
            if input.attack_pressed {
                if let Some(&index) = params.attacks_for(AttackTrigger::Ranged).first() {
                    fsm::request_attack(machine, params, index);
                }
            }
        }
        HeroMode::Melee => {
            let charged = params.attacks_for(AttackTrigger::Charged).first().copied();
            if input.attack_pressed {
                if charged.is_some() {
                    control.charge_ticks = Some(0);
                } else {
                    fire_combo(machine, control, params);
                }
            }
            if input.attack_released {
                if let Some(held) = control.charge_ticks.take() {
                    match charged {
                        Some(index) if held >= params.charge_ticks => {
                            fsm::request_attack(machine, params, index);
                        }
                        _ => fire_combo(machine, control, params),
                    }
                }
            }
        }
    }
}

/// Fire the next combo step, restarting the chain once the window lapses.
fn fire_combo(machine: &mut ActorMachine, control: &mut HeroControl, params: &ArchetypeParams) {
    let combo = params.attacks_for(AttackTrigger::Combo);
    if combo.is_empty() {
        return;
    }
    if control.combo_idle_ticks > params.combo_window_ticks {
        control.combo_step = 0;
    }
    let step = control.combo_step % combo.len();
    if fsm::request_attack(machine, params, combo[step]) {
        control.combo_step = (step + 1) % combo.len();
        control.combo_idle_ticks = 0;
    }
}
