//! Projectile lifecycle: Flying → (Exploding) → Dead.
//!
//! Bolts fly in a fixed direction and can hit while in flight. Explosives
//! fly toward an aim point captured once at launch, then explode and deal
//! damage at most once during the explosion.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use skirmish_core::config::{AttackSpec, ProjectileSpec};
use skirmish_core::constants::DT;
use skirmish_core::enums::*;
use skirmish_core::types::Position;

/// A live projectile (stored as an ECS component).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    /// Actor id of the shooter.
    pub owner: u32,
    pub faction: Faction,
    pub category: AttackCategory,
    pub kind: ProjectileKind,
    pub position: Position,
    /// Position at the start of the last update, for interpolation.
    pub previous_position: Position,
    /// Units per second.
    pub velocity: DVec2,
    pub aim_point: Position,
    pub damage: f64,
    pub hit_range: f64,
    pub max_range: f64,
    pub explode_proximity: f64,
    pub explosion_frames: u32,
    pub ticks_per_frame: u32,
    pub area: AreaPolicy,
    pub phase: ProjectilePhase,
    pub frame: u32,
    pub frame_ticks: u32,
    pub has_dealt_damage: bool,
    pub distance_traveled: f64,
}

impl Projectile {
    /// Build a projectile for `attack` fired from `origin` toward `aim_point`.
    /// A zero-length aim falls back to the shooter's facing.
    #[allow(clippy::too_many_arguments)]
    pub fn launch(
        id: u32,
        owner: u32,
        faction: Faction,
        attack: &AttackSpec,
        spec: &ProjectileSpec,
        origin: Position,
        aim_point: Position,
        facing: Facing,
    ) -> Self {
        let offset = aim_point.to_vec() - origin.to_vec();
        let direction = if offset.length_squared() > f64::EPSILON {
            offset.normalize()
        } else {
            DVec2::new(facing.sign(), 0.0)
        };

        Self {
            id,
            owner,
            faction,
            category: attack.category(faction),
            kind: spec.kind,
            position: origin,
            previous_position: origin,
            velocity: direction * spec.speed,
            aim_point,
            damage: attack.damage,
            hit_range: spec.hit_range,
            max_range: spec.max_range,
            explode_proximity: spec.explode_proximity,
            explosion_frames: spec.explosion_frames,
            ticks_per_frame: spec.ticks_per_frame.max(1),
            area: match spec.kind {
                ProjectileKind::Bolt => AreaPolicy::FirstTarget,
                ProjectileKind::Explosive => attack.area,
            },
            phase: ProjectilePhase::Flying,
            frame: 0,
            frame_ticks: 0,
            has_dealt_damage: false,
            distance_traveled: 0.0,
        }
    }

    /// Advance one tick.
    pub fn update(&mut self) {
        self.previous_position = self.position;
        match self.phase {
            ProjectilePhase::Flying => {
                let step = self.velocity * DT;
                self.position = Position::from_vec(self.position.to_vec() + step);
                self.distance_traveled += step.length();

                match self.kind {
                    ProjectileKind::Bolt => {
                        if self.distance_traveled >= self.max_range {
                            self.phase = ProjectilePhase::Dead;
                        }
                    }
                    ProjectileKind::Explosive => {
                        let near_aim =
                            self.position.range_to(&self.aim_point) <= self.explode_proximity;
                        if near_aim || self.distance_traveled >= self.max_range {
                            self.phase = ProjectilePhase::Exploding;
                            self.frame = 0;
                            self.frame_ticks = 0;
                        }
                    }
                }
            }
            ProjectilePhase::Exploding => {
                self.frame_ticks += 1;
                if self.frame_ticks >= self.ticks_per_frame {
                    self.frame_ticks = 0;
                    self.frame += 1;
                    if self.frame >= self.explosion_frames {
                        self.phase = ProjectilePhase::Dead;
                    }
                }
            }
            ProjectilePhase::Dead => {}
        }
    }

    /// Authoritative collision test. Bolts collide while flying, explosives
    /// only while exploding.
    pub fn is_colliding_with(&self, target: &Position, range: f64) -> bool {
        let active = match self.kind {
            ProjectileKind::Bolt => self.phase == ProjectilePhase::Flying,
            ProjectileKind::Explosive => self.phase == ProjectilePhase::Exploding,
        };
        active && self.position.range_to(target) <= range
    }

    pub fn can_deal_damage(&self) -> bool {
        if self.has_dealt_damage {
            return false;
        }
        match self.kind {
            ProjectileKind::Bolt => self.phase == ProjectilePhase::Flying,
            ProjectileKind::Explosive => self.phase == ProjectilePhase::Exploding,
        }
    }

    /// Set the damage latch. A bolt is spent by its first hit.
    pub fn mark_damage_dealt(&mut self) {
        self.has_dealt_damage = true;
        if self.kind == ProjectileKind::Bolt {
            self.phase = ProjectilePhase::Dead;
        }
    }

    pub fn is_dead(&self) -> bool {
        self.phase == ProjectilePhase::Dead
    }

    /// Render-only position between the last two ticks (`alpha` in [0, 1]).
    pub fn interpolated_position(&self, alpha: f64) -> Position {
        let a = self.previous_position.to_vec();
        let b = self.position.to_vec();
        Position::from_vec(a.lerp(b, alpha.clamp(0.0, 1.0)))
    }
}
