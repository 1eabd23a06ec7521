//! Actor state machine.
//!
//! Pure functions over an `ActorMachine` and the actor's archetype
//! parameters. The logical state and frame counter live here; sprite
//! selection is left to the presentation mapper. No ECS dependency.

use tracing::warn;

use skirmish_core::components::{ActorMachine, Health};
use skirmish_core::config::{ArchetypeParams, AttackSpec};
use skirmish_core::enums::ActorState;

/// Notable transitions produced by [`update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsmEvent {
    /// An attack ran its full frame sequence and returned to Idle.
    AttackFinished { attack: u8 },
    /// A hurt sequence completed.
    HurtFinished,
}

/// Result of [`apply_damage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was already dead; nothing changed.
    AlreadyDead,
    Wounded,
    /// This hit was lethal. Reported exactly once per actor.
    Killed,
}

/// Advance one tick of animation and timers.
pub fn update(m: &mut ActorMachine, params: &ArchetypeParams) -> Option<FsmEvent> {
    let tpf = params.ticks_per_frame.max(1);

    if m.state == ActorState::Dead {
        // Hold the final death frame; the timer drives removal eligibility.
        m.frame_ticks += 1;
        if m.frame_ticks >= tpf {
            m.frame_ticks = 0;
            if m.frame + 1 < params.death_frames {
                m.frame += 1;
            }
        }
        m.dead_timer = m.dead_timer.saturating_add(1);
        return None;
    }

    if !matches!(m.state, ActorState::Attack(_)) {
        m.cooldown = m.cooldown.saturating_sub(1);
    }

    m.frame_ticks += 1;
    if m.frame_ticks < tpf {
        return None;
    }
    m.frame_ticks = 0;
    m.frame += 1;

    match m.state {
        ActorState::Attack(index) => {
            let (frames, cooldown) = params
                .attacks
                .get(index as usize)
                .map(|a| (a.frames, a.cooldown_ticks))
                .unwrap_or((1, 0));
            if m.frame >= frames {
                enter(m, ActorState::Idle);
                m.cooldown = cooldown;
                return Some(FsmEvent::AttackFinished { attack: index });
            }
            None
        }
        ActorState::Hurt => {
            if m.frame >= params.hurt_frames {
                enter(m, ActorState::Idle);
                return Some(FsmEvent::HurtFinished);
            }
            None
        }
        ActorState::Idle => {
            m.frame %= params.idle_frames.max(1);
            None
        }
        ActorState::Move => {
            m.frame %= params.move_frames.max(1);
            None
        }
        ActorState::Dead => None,
    }
}

/// Begin attack `index`. Rejected while locked, cooling down, or for an unknown index.
pub fn request_attack(m: &mut ActorMachine, params: &ArchetypeParams, index: u8) -> bool {
    if m.state.is_animation_locked() || m.cooldown > 0 {
        return false;
    }
    if index as usize >= params.attacks.len() {
        return false;
    }
    enter(m, ActorState::Attack(index));
    m.damage_latch = false;
    m.attacks_started = m.attacks_started.wrapping_add(1);
    true
}

/// Switch between Idle and Move. Ignored while locked.
pub fn request_locomotion(m: &mut ActorMachine, moving: bool) -> bool {
    if m.state.is_animation_locked() {
        return false;
    }
    let next = if moving {
        ActorState::Move
    } else {
        ActorState::Idle
    };
    if m.state != next {
        enter(m, next);
    }
    true
}

/// The attack currently being performed, if any.
pub fn current_attack<'a>(m: &ActorMachine, params: &'a ArchetypeParams) -> Option<&'a AttackSpec> {
    match m.state {
        ActorState::Attack(index) => params.attacks.get(index as usize),
        _ => None,
    }
}

/// True while inside the current attack's hit window and the latch is clear.
pub fn can_deal_damage(m: &ActorMachine, params: &ArchetypeParams) -> bool {
    if m.damage_latch {
        return false;
    }
    current_attack(m, params).is_some_and(|attack| {
        let [start, end] = attack.hit_window;
        (start..=end).contains(&m.frame)
    })
}

pub fn mark_damage_dealt(m: &mut ActorMachine) {
    m.damage_latch = true;
}

/// Apply post-mitigation damage to an actor.
///
/// Health is kept within `[0, max]`. Lethal damage pre-empts any lock and
/// enters `Dead`; further hits on a dead actor are no-ops. Non-lethal damage
/// interrupts Idle/Move into Hurt but never cancels an attack.
pub fn apply_damage(m: &mut ActorMachine, health: &mut Health, amount: f64) -> DamageOutcome {
    if m.state.is_dead() {
        debug_assert!(health.current == 0.0, "dead actor with health {}", health.current);
        health.current = 0.0;
        return DamageOutcome::AlreadyDead;
    }

    debug_assert!(amount >= 0.0, "negative damage {amount}");
    let amount = if amount.is_finite() && amount >= 0.0 {
        amount
    } else {
        warn!(amount, "discarding invalid damage amount");
        0.0
    };

    let next = health.current - amount;
    debug_assert!(health.current <= health.max, "health above max");
    health.current = next.clamp(0.0, health.max);

    if health.current <= 0.0 {
        enter(m, ActorState::Dead);
        m.dead_timer = 0;
        m.cooldown = 0;
        m.damage_latch = true;
        return DamageOutcome::Killed;
    }

    if matches!(m.state, ActorState::Idle | ActorState::Move) {
        enter(m, ActorState::Hurt);
    }
    DamageOutcome::Wounded
}

fn enter(m: &mut ActorMachine, state: ActorState) {
    m.state = state;
    m.frame = 0;
    m.frame_ticks = 0;
}
