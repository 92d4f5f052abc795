//! Swarm Shooter - A single-screen arena shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, collisions, game state)
//! - `game`: Frame clock and session lifecycle around the simulation
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser input abstraction
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::{FrameClock, Game};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Largest frame step the simulation accepts (seconds)
    pub const MAX_FRAME_DT: f32 = 0.033;
    /// Frame length contact damage is calibrated against (60 Hz)
    pub const REFERENCE_FRAME_DT: f32 = 1.0 / 60.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_MOVE_SPEED: f32 = 260.0; // units per second
    pub const PLAYER_SPRINT_MULTIPLIER: f32 = 1.35;
    pub const PLAYER_RELOAD_MS: f32 = 140.0;
    pub const PLAYER_EDGE_MARGIN: f32 = 16.0;
    /// Max aim jitter (radians) at zero health
    pub const PLAYER_MAX_SPREAD: f32 = 0.2;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 3.0;
    pub const PROJECTILE_SPEED: f32 = 700.0;
    pub const PROJECTILE_DAMAGE: f32 = 25.0;
    pub const PROJECTILE_LIFE_SECS: f32 = 4.0;
    pub const PROJECTILE_OFFSCREEN_MARGIN: f32 = 120.0;
    pub const PROJECTILE_MUZZLE_OFFSET: f32 = 18.0;
    pub const PROJECTILE_HUE_STEP: u32 = 37;

    /// Enemy steering
    pub const ENEMY_FRICTION: f32 = 0.98;
    pub const ENEMY_SEPARATION_WEIGHT: f32 = 120.0;
    pub const ENEMY_SEPARATION_PADDING: f32 = 4.0;
    pub const ENEMY_EDGE_MARGIN: f32 = 12.0;
    pub const ENEMY_BOUNCE: f32 = -0.4;
    /// Hard ceiling on the enemy population (separation is O(n²))
    pub const MAX_ENEMIES: usize = 60;

    /// Spawning
    pub const WAVE_DURATION_MS: f64 = 15_000.0;
    pub const SPAWN_PADDING: f32 = 40.0;
    pub const SPAWN_BASE_INTERVAL: f32 = 1.2;
    pub const SPAWN_INTERVAL_PER_WAVE: f32 = 0.06;
    pub const SPAWN_MIN_INTERVAL: f32 = 0.25;
    pub const SPAWN_BASE_CAP: usize = 4;
    pub const SPAWN_CAP_PER_WAVE: f32 = 1.5;

    /// Contact damage
    pub const CONTACT_DAMAGE_FRACTION: f32 = 0.02;
    pub const CONTACT_RADIUS_TOLERANCE: f32 = 2.0;
    pub const CONTACT_PUSH: f32 = 4.0;

    /// Low health warning
    pub const LOW_HEALTH_RATIO: f32 = 0.3;
    pub const LOW_HEALTH_WARNING_MS: f64 = 2000.0;

    /// Visual effect decay (per second)
    pub const SHAKE_DECAY: f32 = 20.0;
    pub const FLASH_DECAY: f32 = 3.0;
    pub const RECOIL_DECAY: f32 = 10.0;
    pub const EXPLOSION_SHAKE: f32 = 15.0;
    pub const EXPLOSION_FLASH: f32 = 0.4;

    /// Feedback rolls
    pub const HIT_PARTICLES: usize = 8;
    pub const CONTACT_PARTICLE_CHANCE: f32 = 0.2;
    pub const AUDIBLE_DAMAGE_CHANCE: f32 = 0.1;
    pub const AUDIBLE_SPAWN_CHANCE: f32 = 0.3;
}

/// Unit vector from `from` toward `to`, or zero if they coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Uniform sample in `[min, max)`; returns `min` for an empty range
#[inline]
pub fn rand_range<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// True with probability `p`
#[inline]
pub fn chance<R: Rng>(rng: &mut R, p: f32) -> bool {
    rng.random::<f32>() < p
}

/// Convert HSL (hue in degrees, saturation/lightness 0-1) to linear RGBA
pub fn hsl_to_rgba(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> [f32; 4] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m, alpha]
}
