//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Actor defaults ---

/// Ticks a dead actor is retained before removal (death animation budget).
pub const DEFAULT_DEAD_DURATION_TICKS: u32 = 60;

/// Ticks each animation frame is held.
pub const DEFAULT_TICKS_PER_FRAME: u32 = 5;

/// Frame counts for looping locomotion animations (cosmetic only).
pub const DEFAULT_IDLE_FRAMES: u32 = 4;
pub const DEFAULT_MOVE_FRAMES: u32 = 6;

// --- AI ---

/// Speed multiplier while shuffling inside attack range during cooldown.
pub const SHUFFLE_SPEED_FACTOR: f64 = 0.4;

/// Maximum distance a shuffling actor backs away from where the shuffle began.
pub const SHUFFLE_AMPLITUDE: f64 = 24.0;

/// Speed multiplier while patrolling with no target in detection range.
pub const PATROL_SPEED_FACTOR: f64 = 0.5;

/// Default half-width of the patrol band around an actor's spawn point.
pub const DEFAULT_PATROL_RADIUS: f64 = 80.0;

// --- Hero control ---

/// Ticks after a combo attack ends during which the next press continues the combo.
pub const DEFAULT_COMBO_WINDOW_TICKS: u32 = 24;

/// Ticks the attack button must be held to release a charged attack.
pub const DEFAULT_CHARGE_TICKS: u32 = 45;

/// Initial upward speed of a jump (units/s).
pub const JUMP_SPEED: f64 = 420.0;

/// Downward acceleration applied to a jumping hero (units/s²).
pub const JUMP_GRAVITY: f64 = 1400.0;

// --- Projectiles ---

/// Default distance from the aim point at which an explosive bolt detonates.
pub const DEFAULT_EXPLODE_PROXIMITY: f64 = 12.0;

/// Default explosion animation length (frames).
pub const DEFAULT_EXPLOSION_FRAMES: u32 = 6;

/// Default ticks per explosion frame.
pub const DEFAULT_PROJECTILE_TICKS_PER_FRAME: u32 = 3;

// --- Wave layouts ---

/// Default vertical amplitude of the WAVE layout sine offset.
pub const DEFAULT_WAVE_AMPLITUDE: f64 = 40.0;

/// Phase step per enemy index for the WAVE layout (radians).
pub const WAVE_LAYOUT_FREQUENCY: f64 = 0.9;

/// Default number of enemies per CLUSTER sub-group.
pub const DEFAULT_CLUSTER_SIZE: u32 = 3;

/// Horizontal spacing between members of one cluster, as a fraction of the wave spacing.
pub const CLUSTER_MEMBER_SPACING_FACTOR: f64 = 0.25;

/// Largest number of enemies a single wave may deploy.
pub const MAX_WAVE_ENEMIES: u64 = 512;

// --- Stage ---

/// Default playable stage width.
pub const DEFAULT_STAGE_WIDTH: f64 = 2400.0;

/// Default depth band (min/max y) actors may walk in.
pub const DEFAULT_LANE_MIN_Y: f64 = 300.0;
pub const DEFAULT_LANE_MAX_Y: f64 = 460.0;
