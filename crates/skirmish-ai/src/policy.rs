//! Enemy decision policy.
//!
//! Distance thresholds are checked in a fixed priority order every tick,
//! so an actor never flees and attacks in the same tick.

use glam::DVec2;
use skirmish_core::components::AiMemory;
use skirmish_core::config::ArchetypeParams;
use skirmish_core::constants::*;
use skirmish_core::enums::Facing;
use skirmish_core::types::{Position, Velocity};

/// Distance from a shuffle turning point that counts as having reached it.
const TURN_TOLERANCE: f64 = 1e-6;

/// Behavior chosen for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Start an attack (Attack state).
    Attack,
    /// Kiting: move away from a target that came too close (Move).
    Retreat,
    /// Cooling down inside attack range: bounded back-and-forth (Move).
    Shuffle,
    /// Hold position facing the target (Idle).
    Hold,
    /// Close in on the target (Move).
    Pursue,
    /// No target: oscillate around the remembered origin (Move).
    Patrol,
}

/// Movement produced for a decision.
#[derive(Debug, Clone, Copy)]
pub struct Steering {
    pub decision: Decision,
    pub velocity: Velocity,
    pub facing: Facing,
    /// Whether the actor should be in Move rather than Idle.
    pub moving: bool,
}

/// Pick a behavior. First match wins.
pub fn decide(params: &ArchetypeParams, distance: f64, cooldown: u32) -> Decision {
    if distance < params.attack_range && cooldown == 0 {
        return Decision::Attack;
    }
    if let Some(retreat) = params.retreat_distance {
        if distance < retreat {
            return Decision::Retreat;
        }
    }
    if distance < params.attack_range {
        return Decision::Shuffle;
    }
    if distance < params.stop_distance {
        return Decision::Hold;
    }
    if distance < params.detection_range {
        return Decision::Pursue;
    }
    Decision::Patrol
}

/// Turn a decision into velocity and facing, updating AI memory.
pub fn steer(
    params: &ArchetypeParams,
    decision: Decision,
    position: Position,
    target: Position,
    memory: &mut AiMemory,
    facing: Facing,
) -> Steering {
    let dx = position.dx_to(&target);
    let face_target = Facing::toward(dx, facing);

    if decision != Decision::Shuffle {
        memory.shuffle_anchor_x = None;
    }

    let (velocity, facing, moving) = match decision {
        Decision::Attack | Decision::Hold => (Velocity::zero(), face_target, false),
        Decision::Retreat => {
            let away = -face_target.sign();
            (Velocity::new(away * params.speed, 0.0), face_target, true)
        }
        Decision::Shuffle => (shuffle(params, position, face_target, memory), face_target, true),
        Decision::Pursue => {
            let offset = target.to_vec() - position.to_vec();
            let v = offset.normalize_or_zero() * params.speed;
            (Velocity::new(v.x, v.y), face_target, v != DVec2::ZERO)
        }
        Decision::Patrol => {
            let v = patrol(params, position, memory);
            let dir = Facing::toward(v.x, facing);
            (v, dir, true)
        }
    };

    Steering {
        decision,
        velocity,
        facing,
        moving,
    }
}

/// Back off up to `SHUFFLE_AMPLITUDE` from where the shuffle began, then
/// return to that anchor. Never steps closer to the target than the anchor.
fn shuffle(params: &ArchetypeParams, position: Position, face_target: Facing, memory: &mut AiMemory) -> Velocity {
    let away = -face_target.sign();
    let anchor = match memory.shuffle_anchor_x {
        Some(anchor) => anchor,
        None => {
            memory.shuffle_anchor_x = Some(position.x);
            memory.shuffle_dir = away;
            position.x
        }
    };

    let displacement = (position.x - anchor) * away;
    if displacement >= SHUFFLE_AMPLITUDE - TURN_TOLERANCE {
        memory.shuffle_dir = -away;
    } else if displacement <= TURN_TOLERANCE {
        memory.shuffle_dir = away;
    }

    // Cut the last step short so it ends on the turning point.
    let remaining = if memory.shuffle_dir == away {
        SHUFFLE_AMPLITUDE - displacement
    } else {
        displacement
    };
    let speed = (params.speed * SHUFFLE_SPEED_FACTOR).min(remaining.max(0.0) / DT);
    Velocity::new(memory.shuffle_dir * speed, 0.0)
}

fn patrol(params: &ArchetypeParams, position: Position, memory: &mut AiMemory) -> Velocity {
    if memory.patrol_dir == 0.0 {
        memory.patrol_dir = 1.0;
    }
    if position.x >= memory.origin_x + params.patrol_radius {
        memory.patrol_dir = -1.0;
    } else if position.x <= memory.origin_x - params.patrol_radius {
        memory.patrol_dir = 1.0;
    }
    Velocity::new(memory.patrol_dir * params.speed * PATROL_SPEED_FACTOR, 0.0)
}
