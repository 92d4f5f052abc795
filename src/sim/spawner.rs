//! Wave progression and enemy spawning
//!
//! The wave number is a pure function of elapsed session time; spawn rate and
//! population cap are pure functions of the wave.

use glam::Vec2;
use rand::Rng;

use super::enemy::{Archetype, Enemy};
use super::state::{GameEvent, GameState};
use crate::tuning::Tuning;
use crate::{chance, rand_range};

/// `floor(elapsed / wave_duration) + 1`
pub fn wave_for_elapsed(elapsed_ms: f64, wave_duration_ms: f64) -> u32 {
    (elapsed_ms.max(0.0) / wave_duration_ms).floor() as u32 + 1
}

/// Seconds between spawns; shrinks with the wave down to a floor
pub fn spawn_interval(wave: u32, tuning: &Tuning) -> f32 {
    (tuning.spawn_base_interval - wave as f32 * tuning.spawn_interval_per_wave)
        .clamp(tuning.spawn_min_interval, tuning.spawn_base_interval)
}

/// Maximum live enemies for a wave; grows with the wave up to the hard ceiling
pub fn population_cap(wave: u32, tuning: &Tuning) -> usize {
    let cap = tuning.spawn_base_cap + (wave as f32 * tuning.spawn_cap_per_wave).floor() as usize;
    cap.clamp(tuning.spawn_base_cap.min(tuning.max_enemies), tuning.max_enemies)
}

/// Random point just outside one of the four viewport edges
pub fn edge_spawn_point<R: Rng>(rng: &mut R, viewport: Vec2, padding: f32) -> Vec2 {
    let (w, h) = (viewport.x, viewport.y);
    match rng.random_range(0..4u8) {
        0 => Vec2::new(rand_range(rng, -padding, w + padding), -padding),
        1 => Vec2::new(w + padding, rand_range(rng, -padding, h + padding)),
        2 => Vec2::new(rand_range(rng, -padding, w + padding), h + padding),
        _ => Vec2::new(-padding, rand_range(rng, -padding, h + padding)),
    }
}

/// Recompute the wave from elapsed time. Emits `WaveAdvanced` only on the
/// frame the value changes and returns whether it did.
pub fn update_wave(state: &mut GameState) -> bool {
    let wave = wave_for_elapsed(state.elapsed_ms, state.tuning.wave_duration_ms);
    if wave <= state.wave {
        return false;
    }
    state.wave = wave;
    log::info!("Wave {} reached at {:.1}s", wave, state.elapsed_ms / 1000.0);
    state.events.push(GameEvent::WaveAdvanced { wave });
    true
}

/// Accumulate time and spawn at most one enemy when the interval has elapsed
/// and the population is under the cap. Returns whether an enemy spawned.
pub fn update_spawning(state: &mut GameState, dt: f32) -> bool {
    state.spawn_accumulator += dt;

    let interval = spawn_interval(state.wave, &state.tuning);
    let cap = population_cap(state.wave, &state.tuning);
    if state.enemies.len() >= cap || state.spawn_accumulator < interval {
        return false;
    }
    // Reset, not subtract: a long stall spawns one enemy, not a burst
    state.spawn_accumulator = 0.0;

    let pos = edge_spawn_point(&mut state.rng, state.viewport, state.tuning.spawn_padding);
    let archetype = Archetype::roll(&mut state.rng);
    state.enemies.push(Enemy::new(pos, archetype, state.wave));

    let audible = chance(&mut state.rng, state.tuning.audible_spawn_chance);
    log::debug!("Spawned {:?} at ({:.0}, {:.0})", archetype, pos.x, pos.y);
    state.events.push(GameEvent::EnemySpawned { archetype, audible });
    true
}
