//! Built-in level plans.
//!
//! Each level is plain `LevelPlan` data, the same shape a level file
//! deserializes into, validated before the scheduler sees it.

use skirmish_ai::profiles::HERO_SPECIES;
use skirmish_core::config::*;
use skirmish_core::enums::{LayoutPattern, LevelId, SpawnTrigger};
use skirmish_core::types::Position;

/// Lane center the hero starts on.
const LANE_Y: f64 = 380.0;

/// Build the plan for a built-in level.
pub fn build_level(level: LevelId) -> LevelPlan {
    match level {
        LevelId::Training => build_training(),
        LevelId::Ambush => build_ambush(),
        LevelId::Siege => build_siege(),
    }
}

/// Training: a line of grunts, then a brute escorted by a grunt cluster.
fn build_training() -> LevelPlan {
    LevelPlan {
        name: "Training Grounds".into(),
        hero: HERO_SPECIES.into(),
        hero_start: Position::new(150.0, LANE_Y),
        bounds: ArenaBounds::default(),
        waves: vec![
            WaveSpec {
                jitter_x: 20.0,
                jitter_y: 30.0,
                ..wave(&[("grunt", 3)], 700.0, 90.0, LayoutPattern::Line)
            },
            WaveSpec {
                cluster_size: 2,
                trigger: after_cleared(2.0),
                ..wave(&[("brute", 1), ("grunt", 3)], 900.0, 140.0, LayoutPattern::Cluster)
            },
        ],
    }
}

/// Ambush: archers and grunts in a sine formation with shamans deployed
/// right behind them, then a mixed follow-up.
fn build_ambush() -> LevelPlan {
    LevelPlan {
        name: "Forest Ambush".into(),
        hero: HERO_SPECIES.into(),
        hero_start: Position::new(400.0, LANE_Y),
        bounds: ArenaBounds::default(),
        waves: vec![
            wave(&[("grunt", 3), ("archer", 2)], 800.0, 90.0, LayoutPattern::Wave),
            WaveSpec {
                jitter_x: 40.0,
                jitter_y: 50.0,
                ..wave(&[("shaman", 2)], 1300.0, 150.0, LayoutPattern::Scattered)
            },
            WaveSpec {
                jitter_x: 40.0,
                jitter_y: 50.0,
                trigger: after_cleared(3.0),
                ..wave(&[("brute", 2), ("archer", 2)], 1000.0, 120.0, LayoutPattern::Scattered)
            },
        ],
    }
}

/// Siege: three escalating waves, then the golem with its guard in an arena ring.
fn build_siege() -> LevelPlan {
    LevelPlan {
        name: "Siege of the Keep".into(),
        hero: HERO_SPECIES.into(),
        hero_start: Position::new(200.0, LANE_Y),
        bounds: ArenaBounds::default(),
        waves: vec![
            WaveSpec {
                jitter_x: 15.0,
                jitter_y: 40.0,
                ..wave(&[("grunt", 4)], 750.0, 70.0, LayoutPattern::Line)
            },
            WaveSpec {
                trigger: after_cleared(2.0),
                ..wave(&[("shaman", 2), ("archer", 2)], 1100.0, 100.0, LayoutPattern::Wave)
            },
            WaveSpec {
                trigger: after_cleared(2.0),
                ..wave(&[("brute", 2), ("grunt", 2)], 900.0, 150.0, LayoutPattern::Cluster)
            },
            WaveSpec {
                jitter_x: 10.0,
                jitter_y: 5.0,
                trigger: after_cleared(4.0),
                ..wave(&[("golem", 1), ("grunt", 4)], 1400.0, 70.0, LayoutPattern::Arena)
            },
        ],
    }
}

fn wave(enemies: &[(&str, u32)], base_x: f64, spacing: f64, layout: LayoutPattern) -> WaveSpec {
    WaveSpec {
        enemies: enemies
            .iter()
            .map(|&(species, count)| SpeciesCount {
                species: species.to_string(),
                count,
            })
            .collect(),
        base_x,
        base_y: LANE_Y,
        spacing,
        jitter_x: 0.0,
        jitter_y: 0.0,
        layout,
        cluster_size: skirmish_core::constants::DEFAULT_CLUSTER_SIZE,
        wave_amplitude: skirmish_core::constants::DEFAULT_WAVE_AMPLITUDE,
        trigger: SpawnTrigger::Immediate,
    }
}

fn after_cleared(delay_secs: f64) -> SpawnTrigger {
    SpawnTrigger::AfterPreviousCleared { delay_secs }
}
