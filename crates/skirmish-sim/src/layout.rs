//! Spawn layout patterns.
//!
//! Each enemy's spawn point is computed from its index within the wave and
//! the wave's total count. Jitter draws from the engine's seeded RNG.

use std::f64::consts::TAU;

use rand::Rng;

use skirmish_core::config::WaveSpec;
use skirmish_core::constants::{CLUSTER_MEMBER_SPACING_FACTOR, WAVE_LAYOUT_FREQUENCY};
use skirmish_core::enums::LayoutPattern;
use skirmish_core::types::Position;

/// Spawn positions for every enemy of `wave`, in spawn-index order.
pub fn spawn_positions<R: Rng>(wave: &WaveSpec, rng: &mut R) -> Vec<Position> {
    let total = wave.total_count() as usize;
    (0..total)
        .map(|index| spawn_position(wave, index, total, rng))
        .collect()
}

/// Spawn position of enemy `index` out of `total`.
pub fn spawn_position<R: Rng>(wave: &WaveSpec, index: usize, total: usize, rng: &mut R) -> Position {
    let i = index as f64;
    let line_x = wave.base_x + i * wave.spacing;

    match wave.layout {
        LayoutPattern::Line => Position::new(
            line_x + one_sided(rng, wave.jitter_x),
            wave.base_y + one_sided(rng, wave.jitter_y),
        ),
        LayoutPattern::Wave => Position::new(
            line_x + one_sided(rng, wave.jitter_x),
            wave.base_y
                + wave.wave_amplitude * (i * WAVE_LAYOUT_FREQUENCY).sin()
                + one_sided(rng, wave.jitter_y),
        ),
        LayoutPattern::Cluster => {
            let size = wave.cluster_size.max(1) as usize;
            let cluster = (index / size) as f64;
            let member = (index % size) as f64;
            let anchor_x = wave.base_x + cluster * wave.spacing * size as f64;
            Position::new(
                anchor_x
                    + member * wave.spacing * CLUSTER_MEMBER_SPACING_FACTOR
                    + one_sided(rng, wave.jitter_x),
                wave.base_y + one_sided(rng, wave.jitter_y),
            )
        }
        LayoutPattern::Scattered => Position::new(
            line_x + symmetric(rng, wave.jitter_x),
            wave.base_y + symmetric(rng, wave.jitter_y),
        ),
        LayoutPattern::Arena => {
            let angle = i / total.max(1) as f64 * TAU;
            Position::new(
                wave.base_x + wave.spacing * angle.cos() + symmetric(rng, wave.jitter_x),
                wave.base_y + wave.spacing * angle.sin() + symmetric(rng, wave.jitter_y),
            )
        }
    }
}

/// Offset in `[0, max)`.
fn one_sided<R: Rng>(rng: &mut R, max: f64) -> f64 {
    if max > 0.0 {
        rng.gen_range(0.0..max)
    } else {
        0.0
    }
}

/// Offset in `[-max, max]`.
fn symmetric<R: Rng>(rng: &mut R, max: f64) -> f64 {
    if max > 0.0 {
        rng.gen_range(-max..=max)
    } else {
        0.0
    }
}
