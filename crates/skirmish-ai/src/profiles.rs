//! Built-in archetype parameters.
//!
//! Every species is data: thresholds, animation lengths, and an attack list.
//! Capabilities (melee, ranged, kiting) follow from that data.

use skirmish_core::config::*;
use skirmish_core::constants::*;
use skirmish_core::enums::*;

/// Species key of the built-in hero.
pub const HERO_SPECIES: &str = "warden";

/// The built-in archetype table: one hero and five enemy species.
pub fn default_archetypes() -> ArchetypeTable {
    let mut table = ArchetypeTable::default();
    for species in ["warden", "grunt", "brute", "archer", "shaman", "golem"] {
        if let Some(params) = get_profile(species) {
            table.insert(species, params);
        }
    }
    table
}

/// Parameters for a built-in species.
pub fn get_profile(species: &str) -> Option<ArchetypeParams> {
    let params = match species {
        "warden" => ArchetypeParams {
            speed: 220.0,
            attack_range: 80.0,
            stop_distance: 60.0,
            detection_range: 600.0,
            max_health: 200.0,
            armor: 60.0,
            attacks: vec![
                strike("slash", 4, [1, 2], 12.0, 85.0, 0),
                strike("cross-slash", 4, [1, 2], 14.0, 85.0, 0),
                strike("cleave", 6, [2, 3], 22.0, 95.0, 12),
                AttackSpec {
                    area: AreaPolicy::AllTargets,
                    trigger: AttackTrigger::Charged,
                    delivery: Delivery::Area,
                    ..strike("ground-slam", 8, [4, 5], 40.0, 140.0, 30)
                },
                AttackSpec {
                    trigger: AttackTrigger::Ranged,
                    ..shot(
                        "arc-bolt",
                        5,
                        2,
                        18.0,
                        20,
                        bolt(ProjectileKind::Bolt, 600.0, 700.0, 24.0),
                    )
                },
            ],
            hurt_frames: 3,
            death_frames: 6,
            ticks_per_frame: 4,
            ..base(Faction::Hero)
        },
        "grunt" => ArchetypeParams {
            speed: 90.0,
            attack_range: 70.0,
            stop_distance: 55.0,
            detection_range: 420.0,
            max_health: 40.0,
            attacks: vec![strike("club", 6, [3, 4], 8.0, 85.0, 50)],
            ..base(Faction::Enemy)
        },
        "brute" => ArchetypeParams {
            speed: 55.0,
            attack_range: 90.0,
            stop_distance: 70.0,
            detection_range: 450.0,
            max_health: 160.0,
            attacks: vec![strike("smash", 8, [5, 6], 28.0, 105.0, 90)],
            hurt_frames: 2,
            death_frames: 6,
            ticks_per_frame: 6,
            ..base(Faction::Enemy)
        },
        "archer" => ArchetypeParams {
            speed: 100.0,
            attack_range: 320.0,
            stop_distance: 260.0,
            detection_range: 520.0,
            retreat_distance: Some(140.0),
            max_health: 45.0,
            attacks: vec![shot(
                "arrow",
                6,
                3,
                10.0,
                75,
                bolt(ProjectileKind::Bolt, 420.0, 480.0, 22.0),
            )],
            ..base(Faction::Enemy)
        },
        "shaman" => ArchetypeParams {
            speed: 70.0,
            attack_range: 280.0,
            stop_distance: 240.0,
            detection_range: 500.0,
            max_health: 60.0,
            attacks: vec![shot(
                "fireball",
                7,
                4,
                20.0,
                110,
                bolt(ProjectileKind::Explosive, 300.0, 360.0, 48.0),
            )],
            ..base(Faction::Enemy)
        },
        "golem" => ArchetypeParams {
            speed: 45.0,
            attack_range: 130.0,
            stop_distance: 100.0,
            detection_range: 900.0,
            max_health: 600.0,
            attacks: vec![
                strike("crush", 9, [5, 6], 35.0, 140.0, 70),
                shot(
                    "boulder",
                    8,
                    5,
                    30.0,
                    120,
                    ProjectileSpec {
                        explosion_frames: 8,
                        ..bolt(ProjectileKind::Explosive, 260.0, 420.0, 60.0)
                    },
                ),
            ],
            hurt_frames: 2,
            death_frames: 8,
            ticks_per_frame: 6,
            dead_duration_ticks: 120,
            ..base(Faction::Enemy)
        },
        _ => return None,
    };
    Some(params)
}

fn base(faction: Faction) -> ArchetypeParams {
    ArchetypeParams {
        faction,
        speed: 0.0,
        attack_range: 0.0,
        stop_distance: 0.0,
        detection_range: 0.0,
        retreat_distance: None,
        max_health: 0.0,
        armor: 0.0,
        attacks: Vec::new(),
        hurt_frames: 3,
        death_frames: 5,
        idle_frames: DEFAULT_IDLE_FRAMES,
        move_frames: DEFAULT_MOVE_FRAMES,
        ticks_per_frame: DEFAULT_TICKS_PER_FRAME,
        dead_duration_ticks: DEFAULT_DEAD_DURATION_TICKS,
        patrol_radius: DEFAULT_PATROL_RADIUS,
        charge_ticks: DEFAULT_CHARGE_TICKS,
        combo_window_ticks: DEFAULT_COMBO_WINDOW_TICKS,
    }
}

fn strike(name: &str, frames: u32, hit_window: [u32; 2], damage: f64, range: f64, cooldown_ticks: u32) -> AttackSpec {
    AttackSpec {
        name: name.to_string(),
        frames,
        hit_window,
        damage,
        range,
        cooldown_ticks,
        area: AreaPolicy::FirstTarget,
        trigger: AttackTrigger::Combo,
        delivery: Delivery::Melee,
    }
}

/// Ranged attack that releases its projectile on `release_frame`.
fn shot(
    name: &str,
    frames: u32,
    release_frame: u32,
    damage: f64,
    cooldown_ticks: u32,
    projectile: ProjectileSpec,
) -> AttackSpec {
    AttackSpec {
        delivery: Delivery::Projectile(projectile),
        ..strike(name, frames, [release_frame, release_frame], damage, 0.0, cooldown_ticks)
    }
}

fn bolt(kind: ProjectileKind, speed: f64, max_range: f64, hit_range: f64) -> ProjectileSpec {
    ProjectileSpec {
        kind,
        speed,
        max_range,
        hit_range,
        explode_proximity: DEFAULT_EXPLODE_PROXIMITY,
        explosion_frames: DEFAULT_EXPLOSION_FRAMES,
        ticks_per_frame: DEFAULT_PROJECTILE_TICKS_PER_FRAME,
    }
}
