//! Data-driven game balance
//!
//! Balance and feedback numbers the simulation reads live here so a host page
//! can override any subset of them with a JSON blob. Missing fields fall back
//! to the constants in [`crate::consts`]. Fixed physics of the body model
//! (enemy friction, the 60 Hz reference frame) and archetype stat tables are
//! not tunable.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tuning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Largest dt a single frame may advance (seconds)
    pub max_frame_dt: f32,

    // === Player ===
    pub player_radius: f32,
    pub player_max_health: f32,
    pub player_move_speed: f32,
    pub player_sprint_multiplier: f32,
    pub player_reload_ms: f32,
    pub player_edge_margin: f32,
    pub player_max_spread: f32,

    // === Projectiles ===
    pub projectile_radius: f32,
    pub projectile_speed: f32,
    pub projectile_damage: f32,
    pub projectile_life_secs: f32,
    pub projectile_offscreen_margin: f32,
    pub projectile_muzzle_offset: f32,

    // === Enemies ===
    pub enemy_separation_weight: f32,
    pub enemy_separation_padding: f32,
    pub enemy_edge_margin: f32,
    pub enemy_bounce: f32,
    /// Ceiling applied on top of the wave-derived population cap
    pub max_enemies: usize,

    // === Spawning ===
    pub wave_duration_ms: f64,
    pub spawn_padding: f32,
    pub spawn_base_interval: f32,
    pub spawn_interval_per_wave: f32,
    pub spawn_min_interval: f32,
    pub spawn_base_cap: usize,
    pub spawn_cap_per_wave: f32,

    // === Contact damage ===
    /// Fraction of touch damage applied per 60 Hz frame of contact
    pub contact_damage_fraction: f32,
    pub contact_radius_tolerance: f32,
    pub contact_push: f32,

    // === Warnings ===
    pub low_health_ratio: f32,
    pub low_health_warning_ms: f64,

    // === Feedback ===
    /// Screen shake lost per second
    pub shake_decay: f32,
    /// Flash intensity lost per second
    pub flash_decay: f32,
    /// Player recoil lost per second
    pub recoil_decay: f32,
    pub explosion_shake: f32,
    pub explosion_flash: f32,
    pub hit_particles: usize,
    pub contact_particle_chance: f32,
    pub audible_damage_chance: f32,
    pub audible_spawn_chance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_frame_dt: MAX_FRAME_DT,

            player_radius: PLAYER_RADIUS,
            player_max_health: PLAYER_MAX_HEALTH,
            player_move_speed: PLAYER_MOVE_SPEED,
            player_sprint_multiplier: PLAYER_SPRINT_MULTIPLIER,
            player_reload_ms: PLAYER_RELOAD_MS,
            player_edge_margin: PLAYER_EDGE_MARGIN,
            player_max_spread: PLAYER_MAX_SPREAD,

            projectile_radius: PROJECTILE_RADIUS,
            projectile_speed: PROJECTILE_SPEED,
            projectile_damage: PROJECTILE_DAMAGE,
            projectile_life_secs: PROJECTILE_LIFE_SECS,
            projectile_offscreen_margin: PROJECTILE_OFFSCREEN_MARGIN,
            projectile_muzzle_offset: PROJECTILE_MUZZLE_OFFSET,

            enemy_separation_weight: ENEMY_SEPARATION_WEIGHT,
            enemy_separation_padding: ENEMY_SEPARATION_PADDING,
            enemy_edge_margin: ENEMY_EDGE_MARGIN,
            enemy_bounce: ENEMY_BOUNCE,
            max_enemies: MAX_ENEMIES,

            wave_duration_ms: WAVE_DURATION_MS,
            spawn_padding: SPAWN_PADDING,
            spawn_base_interval: SPAWN_BASE_INTERVAL,
            spawn_interval_per_wave: SPAWN_INTERVAL_PER_WAVE,
            spawn_min_interval: SPAWN_MIN_INTERVAL,
            spawn_base_cap: SPAWN_BASE_CAP,
            spawn_cap_per_wave: SPAWN_CAP_PER_WAVE,

            contact_damage_fraction: CONTACT_DAMAGE_FRACTION,
            contact_radius_tolerance: CONTACT_RADIUS_TOLERANCE,
            contact_push: CONTACT_PUSH,

            low_health_ratio: LOW_HEALTH_RATIO,
            low_health_warning_ms: LOW_HEALTH_WARNING_MS,

            shake_decay: SHAKE_DECAY,
            flash_decay: FLASH_DECAY,
            recoil_decay: RECOIL_DECAY,
            explosion_shake: EXPLOSION_SHAKE,
            explosion_flash: EXPLOSION_FLASH,
            hit_particles: HIT_PARTICLES,
            contact_particle_chance: CONTACT_PARTICLE_CHANCE,
            audible_damage_chance: AUDIBLE_DAMAGE_CHANCE,
            audible_spawn_chance: AUDIBLE_SPAWN_CHANCE,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Parse overrides, logging and falling back to defaults on bad input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring invalid tuning JSON: {}", e);
                Self::default()
            }
        }
    }

    /// Clamp values that would break simulation invariants
    pub fn sanitized(mut self) -> Self {
        self.max_frame_dt = self.max_frame_dt.clamp(0.001, 0.1);
        self.player_max_health = self.player_max_health.max(1.0);
        self.player_reload_ms = self.player_reload_ms.max(1.0);
        self.player_max_spread = self.player_max_spread.clamp(0.0, std::f32::consts::PI);
        self.projectile_life_secs = self.projectile_life_secs.max(0.0);
        self.max_enemies = self.max_enemies.min(MAX_ENEMIES);
        self.wave_duration_ms = self.wave_duration_ms.max(1.0);
        self.spawn_min_interval = self.spawn_min_interval.max(0.01);
        self.spawn_base_interval = self.spawn_base_interval.max(self.spawn_min_interval);
        self.contact_damage_fraction = self.contact_damage_fraction.max(0.0);
        self.shake_decay = self.shake_decay.max(0.0);
        self.flash_decay = self.flash_decay.max(0.0);
        self.recoil_decay = self.recoil_decay.max(0.0);
        self.hit_particles = self.hit_particles.min(64);
        self.contact_particle_chance = self.contact_particle_chance.clamp(0.0, 1.0);
        self.audible_damage_chance = self.audible_damage_chance.clamp(0.0, 1.0);
        self.audible_spawn_chance = self.audible_spawn_chance.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_reload_ms": 90.0 }"#).unwrap();
        assert_eq!(tuning.player_reload_ms, 90.0);
        assert_eq!(tuning.projectile_damage, PROJECTILE_DAMAGE);
        assert_eq!(tuning.wave_duration_ms, WAVE_DURATION_MS);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        let tuning = Tuning::from_json_or_default("{ not json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_enemy_ceiling_cannot_be_raised() {
        let tuning = Tuning::from_json(r#"{ "max_enemies": 500 }"#).unwrap();
        assert_eq!(tuning.max_enemies, MAX_ENEMIES);
    }

    #[test]
    fn test_feedback_overrides() {
        let tuning = Tuning::from_json(
            r#"{ "shake_decay": 5.0, "hit_particles": 1000, "audible_spawn_chance": 2.0 }"#,
        )
        .unwrap();
        assert_eq!(tuning.shake_decay, 5.0);
        assert_eq!(tuning.hit_particles, 64);
        assert_eq!(tuning.audible_spawn_chance, 1.0);
        assert_eq!(tuning.flash_decay, FLASH_DECAY);
    }
}
