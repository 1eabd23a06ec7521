//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Which side an actor fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Hero,
    Enemy,
}

impl Faction {
    pub fn opponent(self) -> Faction {
        match self {
            Faction::Hero => Faction::Enemy,
            Faction::Enemy => Faction::Hero,
        }
    }
}

/// Horizontal facing of an actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for Left, +1.0 for Right.
    pub fn sign(self) -> f64 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing that points along `dx`. Zero keeps `current`.
    pub fn toward(dx: f64, current: Facing) -> Facing {
        if dx > 0.0 {
            Facing::Right
        } else if dx < 0.0 {
            Facing::Left
        } else {
            current
        }
    }

    /// Whether a point `dx` away lies on the facing side (dx == 0 counts).
    pub fn faces(self, dx: f64) -> bool {
        dx == 0.0 || dx.signum() == self.sign()
    }
}

/// Logical actor state. `Attack(n)` indexes the archetype's attack list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorState {
    #[default]
    Idle,
    Move,
    Attack(u8),
    Hurt,
    Dead,
}

impl ActorState {
    /// Locked states run their frame sequence to completion before accepting input.
    pub fn is_animation_locked(self) -> bool {
        matches!(self, ActorState::Attack(_) | ActorState::Hurt | ActorState::Dead)
    }

    pub fn is_dead(self) -> bool {
        self == ActorState::Dead
    }
}

/// Projectile flight model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Straight bolt: hits while flying, no explosion.
    Bolt,
    /// Flies to a fixed aim point, then explodes.
    Explosive,
}

/// Projectile lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectilePhase {
    #[default]
    Flying,
    Exploding,
    Dead,
}

/// Attacker category. Declaration order is the resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttackCategory {
    HeroMelee,
    HeroRanged,
    HeroSkill,
    EnemyMelee,
    EnemyProjectile,
}

impl AttackCategory {
    /// Fixed order in which the combat resolver processes categories.
    pub const RESOLUTION_ORDER: [AttackCategory; 5] = [
        AttackCategory::HeroMelee,
        AttackCategory::HeroRanged,
        AttackCategory::HeroSkill,
        AttackCategory::EnemyMelee,
        AttackCategory::EnemyProjectile,
    ];
}

/// How many qualifying targets one strike may damage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaPolicy {
    /// The nearest qualifying target only.
    #[default]
    FirstTarget,
    /// Every qualifying target.
    AllTargets,
}

/// Which hero input fires an attack. Enemies ignore this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackTrigger {
    #[default]
    Combo,
    Charged,
    Ranged,
}

/// Spatial arrangement for a wave's spawn points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LayoutPattern {
    #[default]
    Line,
    Wave,
    Cluster,
    Scattered,
    Arena,
}

/// Condition gating a wave's deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SpawnTrigger {
    /// Deploy together with the previous wave.
    #[default]
    Immediate,
    /// Deploy once every enemy of the previous wave is dead and the delay has elapsed.
    AfterPreviousCleared { delay_secs: f64 },
}

/// Hero weapon stance, toggled by the mode-switch intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeroMode {
    #[default]
    Melee,
    Ranged,
}

/// Built-in level selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelId {
    /// Two lines of grunts, then a brute cluster.
    Training,
    /// Ranged ambush with an immediate follow-up wave.
    Ambush,
    /// Mixed waves ending in an arena boss fight.
    Siege,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No level loaded.
    #[default]
    Idle,
    Active,
    Paused,
    Victory,
    Defeat,
}
