//! Level and archetype configuration.
//!
//! Both are external data (JSON) fed to the simulation. Everything is
//! validated at load time so the scheduler and AI never meet an
//! unreachable state or an empty wave mid-simulation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::enums::*;
use crate::types::Position;

/// Rejected configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level `{level}` has no waves")]
    NoWaves { level: String },
    #[error("wave {wave} spawns no enemies")]
    EmptyWave { wave: usize },
    #[error("wave {wave}: `{species}` has a zero count")]
    ZeroCount { wave: usize, species: String },
    #[error("unknown species `{species}`")]
    UnknownSpecies { species: String },
    #[error("`{species}` must belong to the {expected:?} faction")]
    WrongFaction { species: String, expected: Faction },
    #[error("`{species}`: {detail}")]
    UnreachableState { species: String, detail: String },
    #[error("`{species}` attack `{attack}`: {detail}")]
    InvalidAttack {
        species: String,
        attack: String,
        detail: String,
    },
    #[error("{context}: {detail}")]
    InvalidValue { context: String, detail: String },
}

/// Projectile factory parameters attached to a ranged attack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub kind: ProjectileKind,
    /// Units per second.
    pub speed: f64,
    /// Travel distance after which a bolt expires or an explosive detonates.
    pub max_range: f64,
    /// Collision radius against targets.
    pub hit_range: f64,
    #[serde(default = "default_explode_proximity")]
    pub explode_proximity: f64,
    #[serde(default = "default_explosion_frames")]
    pub explosion_frames: u32,
    #[serde(default = "default_projectile_ticks_per_frame")]
    pub ticks_per_frame: u32,
}

/// How an attack delivers its damage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Delivery {
    /// Hits targets in range on the facing side.
    #[default]
    Melee,
    /// Hits targets in range on either side.
    Area,
    /// Fires one projectile when the hit window opens.
    Projectile(ProjectileSpec),
}

/// One attack variant of an archetype.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackSpec {
    pub name: String,
    /// Length of the attack animation in frames.
    pub frames: u32,
    /// Inclusive frame range during which damage may be applied.
    pub hit_window: [u32; 2],
    pub damage: f64,
    /// Reach of melee/area strikes.
    pub range: f64,
    /// Cooldown started when the attack completes.
    pub cooldown_ticks: u32,
    #[serde(default)]
    pub area: AreaPolicy,
    #[serde(default)]
    pub trigger: AttackTrigger,
    #[serde(default)]
    pub delivery: Delivery,
}

impl AttackSpec {
    /// Resolution category for this attack when used by `faction`.
    pub fn category(&self, faction: Faction) -> AttackCategory {
        match (faction, &self.delivery) {
            (Faction::Hero, Delivery::Melee) => AttackCategory::HeroMelee,
            (Faction::Hero, Delivery::Area) => AttackCategory::HeroSkill,
            (Faction::Hero, Delivery::Projectile(p)) => match p.kind {
                ProjectileKind::Bolt => AttackCategory::HeroRanged,
                ProjectileKind::Explosive => AttackCategory::HeroSkill,
            },
            (Faction::Enemy, Delivery::Melee | Delivery::Area) => AttackCategory::EnemyMelee,
            (Faction::Enemy, Delivery::Projectile(_)) => AttackCategory::EnemyProjectile,
        }
    }

    pub fn projectile(&self) -> Option<&ProjectileSpec> {
        match &self.delivery {
            Delivery::Projectile(p) => Some(p),
            _ => None,
        }
    }
}

/// Capabilities an archetype composes from its data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub melee: bool,
    pub ranged: bool,
    pub kiting: bool,
}

/// Per-archetype parameters: movement, AI thresholds, animation, attacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeParams {
    pub faction: Faction,
    /// Units per second.
    pub speed: f64,
    pub attack_range: f64,
    pub stop_distance: f64,
    pub detection_range: f64,
    /// Kiting archetypes back away when the target is closer than this.
    #[serde(default)]
    pub retreat_distance: Option<f64>,
    pub max_health: f64,
    #[serde(default)]
    pub armor: f64,
    pub attacks: Vec<AttackSpec>,
    pub hurt_frames: u32,
    pub death_frames: u32,
    #[serde(default = "default_idle_frames")]
    pub idle_frames: u32,
    #[serde(default = "default_move_frames")]
    pub move_frames: u32,
    #[serde(default = "default_ticks_per_frame")]
    pub ticks_per_frame: u32,
    #[serde(default = "default_dead_duration")]
    pub dead_duration_ticks: u32,
    #[serde(default = "default_patrol_radius")]
    pub patrol_radius: f64,
    #[serde(default = "default_charge_ticks")]
    pub charge_ticks: u32,
    #[serde(default = "default_combo_window")]
    pub combo_window_ticks: u32,
}

impl ArchetypeParams {
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            melee: self
                .attacks
                .iter()
                .any(|a| matches!(a.delivery, Delivery::Melee | Delivery::Area)),
            ranged: self.attacks.iter().any(|a| a.projectile().is_some()),
            kiting: self.retreat_distance.is_some(),
        }
    }

    /// Indices of attacks fired by `trigger`, in declaration order.
    pub fn attacks_for(&self, trigger: AttackTrigger) -> Vec<u8> {
        self.attacks
            .iter()
            .enumerate()
            .filter(|(_, a)| a.trigger == trigger)
            .map(|(i, _)| i as u8)
            .collect()
    }

    pub fn validate(&self, species: &str) -> Result<(), ConfigError> {
        let unreachable = |detail: String| ConfigError::UnreachableState {
            species: species.to_string(),
            detail,
        };
        let invalid = |detail: &str| ConfigError::InvalidValue {
            context: format!("`{species}`"),
            detail: detail.to_string(),
        };

        if !(self.max_health > 0.0) {
            return Err(invalid("max_health must be positive"));
        }
        if !(self.speed >= 0.0) || !(self.armor >= 0.0) {
            return Err(invalid("speed and armor must be non-negative"));
        }
        if self.ticks_per_frame == 0 || self.hurt_frames == 0 || self.death_frames == 0 {
            return Err(invalid("frame counts and ticks_per_frame must be positive"));
        }
        if self.idle_frames == 0 || self.move_frames == 0 {
            return Err(invalid("locomotion frame counts must be positive"));
        }
        if self.attacks.is_empty() {
            return Err(invalid("at least one attack is required"));
        }
        if self.attacks.len() > u8::MAX as usize {
            return Err(invalid("too many attacks"));
        }
        if !(self.attack_range > 0.0) {
            return Err(invalid("attack_range must be positive"));
        }
        if self.attack_range >= self.detection_range {
            return Err(unreachable(format!(
                "attack_range {} must be below detection_range {}",
                self.attack_range, self.detection_range
            )));
        }
        if !(self.stop_distance >= 0.0) || self.stop_distance >= self.detection_range {
            return Err(unreachable(format!(
                "stop_distance {} must be within [0, detection_range {})",
                self.stop_distance, self.detection_range
            )));
        }
        if let Some(retreat) = self.retreat_distance {
            if !(retreat > 0.0) || retreat >= self.stop_distance {
                return Err(unreachable(format!(
                    "retreat_distance {} must be within (0, stop_distance {})",
                    retreat, self.stop_distance
                )));
            }
        }

        for attack in &self.attacks {
            let bad = |detail: &str| ConfigError::InvalidAttack {
                species: species.to_string(),
                attack: attack.name.clone(),
                detail: detail.to_string(),
            };
            if attack.frames == 0 {
                return Err(bad("frames must be positive"));
            }
            let [start, end] = attack.hit_window;
            if start > end || end >= attack.frames {
                return Err(bad("hit_window must satisfy start <= end < frames"));
            }
            if !(attack.damage >= 0.0) || !(attack.range >= 0.0) {
                return Err(bad("damage and range must be non-negative"));
            }
            if let Some(p) = attack.projectile() {
                if !(p.speed > 0.0) || !(p.max_range > 0.0) || !(p.hit_range > 0.0) {
                    return Err(bad("projectile speed, max_range and hit_range must be positive"));
                }
                if p.ticks_per_frame == 0 {
                    return Err(bad("projectile ticks_per_frame must be positive"));
                }
                if p.kind == ProjectileKind::Explosive && p.explosion_frames == 0 {
                    return Err(bad("explosive projectiles need explosion frames"));
                }
            }
        }
        Ok(())
    }
}

/// Archetype table keyed by species name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchetypeTable {
    pub species: BTreeMap<String, ArchetypeParams>,
}

impl ArchetypeTable {
    pub fn get(&self, species: &str) -> Option<&ArchetypeParams> {
        self.species.get(species)
    }

    pub fn insert(&mut self, species: impl Into<String>, params: ArchetypeParams) {
        self.species.insert(species.into(), params);
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let table: ArchetypeTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (species, params) in &self.species {
            params.validate(species)?;
        }
        Ok(())
    }
}

/// `count` enemies of one species within a wave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesCount {
    pub species: String,
    pub count: u32,
}

/// A scheduled batch of enemies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveSpec {
    pub enemies: Vec<SpeciesCount>,
    pub base_x: f64,
    pub base_y: f64,
    pub spacing: f64,
    #[serde(default)]
    pub jitter_x: f64,
    #[serde(default)]
    pub jitter_y: f64,
    #[serde(default)]
    pub layout: LayoutPattern,
    #[serde(default = "default_cluster_size")]
    pub cluster_size: u32,
    #[serde(default = "default_wave_amplitude")]
    pub wave_amplitude: f64,
    #[serde(default)]
    pub trigger: SpawnTrigger,
}

impl WaveSpec {
    /// Enemies in this wave. Summed wide so no count list can overflow it.
    pub fn total_count(&self) -> u64 {
        self.enemies.iter().map(|e| u64::from(e.count)).sum()
    }

    /// Species of each enemy, in spawn-index order.
    pub fn expanded_species(&self) -> Vec<&str> {
        self.enemies
            .iter()
            .flat_map(|e| std::iter::repeat(e.species.as_str()).take(e.count as usize))
            .collect()
    }
}

/// Walkable rectangle of a level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            max_x: DEFAULT_STAGE_WIDTH,
            min_y: DEFAULT_LANE_MIN_Y,
            max_y: DEFAULT_LANE_MAX_Y,
        }
    }
}

impl ArenaBounds {
    pub fn clamp(&self, pos: Position) -> Position {
        Position::new(
            pos.x.clamp(self.min_x, self.max_x),
            pos.y.clamp(self.min_y, self.max_y),
        )
    }
}

/// A level: the hero and its ordered wave plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelPlan {
    pub name: String,
    pub hero: String,
    pub hero_start: Position,
    #[serde(default)]
    pub bounds: ArenaBounds,
    pub waves: Vec<WaveSpec>,
}

impl LevelPlan {
    pub fn from_json(json: &str, archetypes: &ArchetypeTable) -> Result<Self, ConfigError> {
        let plan: LevelPlan = serde_json::from_str(json)?;
        plan.validate(archetypes)?;
        Ok(plan)
    }

    /// Total enemies across all waves.
    pub fn total_enemies(&self) -> u64 {
        self.waves.iter().map(WaveSpec::total_count).sum()
    }

    pub fn validate(&self, archetypes: &ArchetypeTable) -> Result<(), ConfigError> {
        let hero = archetypes
            .get(&self.hero)
            .ok_or_else(|| ConfigError::UnknownSpecies {
                species: self.hero.clone(),
            })?;
        if hero.faction != Faction::Hero {
            return Err(ConfigError::WrongFaction {
                species: self.hero.clone(),
                expected: Faction::Hero,
            });
        }
        hero.validate(&self.hero)?;

        let b = &self.bounds;
        if !(b.min_x < b.max_x) || !(b.min_y <= b.max_y) {
            return Err(ConfigError::InvalidValue {
                context: format!("level `{}` bounds", self.name),
                detail: "min must not exceed max".into(),
            });
        }

        if self.waves.is_empty() {
            return Err(ConfigError::NoWaves {
                level: self.name.clone(),
            });
        }

        for (index, wave) in self.waves.iter().enumerate() {
            let invalid = |detail: &str| ConfigError::InvalidValue {
                context: format!("wave {index}"),
                detail: detail.to_string(),
            };
            let total = wave.total_count();
            if total == 0 {
                return Err(ConfigError::EmptyWave { wave: index });
            }
            if total > MAX_WAVE_ENEMIES {
                return Err(invalid(&format!(
                    "{total} enemies exceeds the limit of {MAX_WAVE_ENEMIES}"
                )));
            }
            for entry in &wave.enemies {
                if entry.count == 0 {
                    return Err(ConfigError::ZeroCount {
                        wave: index,
                        species: entry.species.clone(),
                    });
                }
                let params =
                    archetypes
                        .get(&entry.species)
                        .ok_or_else(|| ConfigError::UnknownSpecies {
                            species: entry.species.clone(),
                        })?;
                if params.faction != Faction::Enemy {
                    return Err(ConfigError::WrongFaction {
                        species: entry.species.clone(),
                        expected: Faction::Enemy,
                    });
                }
                params.validate(&entry.species)?;
            }

            if !(wave.spacing >= 0.0) || !(wave.jitter_x >= 0.0) || !(wave.jitter_y >= 0.0) {
                return Err(invalid("spacing and jitter must be non-negative"));
            }
            if wave.layout == LayoutPattern::Cluster && wave.cluster_size == 0 {
                return Err(invalid("cluster_size must be positive"));
            }
            if let SpawnTrigger::AfterPreviousCleared { delay_secs } = wave.trigger {
                if !delay_secs.is_finite() || delay_secs < 0.0 {
                    return Err(invalid("delay_secs must be a finite non-negative number"));
                }
            }
        }
        Ok(())
    }
}

fn default_explode_proximity() -> f64 {
    DEFAULT_EXPLODE_PROXIMITY
}

fn default_explosion_frames() -> u32 {
    DEFAULT_EXPLOSION_FRAMES
}

fn default_projectile_ticks_per_frame() -> u32 {
    DEFAULT_PROJECTILE_TICKS_PER_FRAME
}

fn default_idle_frames() -> u32 {
    DEFAULT_IDLE_FRAMES
}

fn default_move_frames() -> u32 {
    DEFAULT_MOVE_FRAMES
}

fn default_ticks_per_frame() -> u32 {
    DEFAULT_TICKS_PER_FRAME
}

fn default_dead_duration() -> u32 {
    DEFAULT_DEAD_DURATION_TICKS
}

fn default_patrol_radius() -> f64 {
    DEFAULT_PATROL_RADIUS
}

fn default_charge_ticks() -> u32 {
    DEFAULT_CHARGE_TICKS
}

fn default_combo_window() -> u32 {
    DEFAULT_COMBO_WINDOW_TICKS
}

fn default_cluster_size() -> u32 {
    DEFAULT_CLUSTER_SIZE
}

fn default_wave_amplitude() -> f64 {
    DEFAULT_WAVE_AMPLITUDE
}
