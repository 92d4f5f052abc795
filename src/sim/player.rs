//! Player avatar: movement, auto-fire and health

use glam::Vec2;
use rand::Rng;

use super::body::Body;
use super::projectile::Projectile;
use super::tick::TickInput;
use crate::tuning::Tuning;

/// The player-controlled avatar
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub health: f32,
    pub max_health: f32,
    /// Milliseconds since the last shot
    pub time_since_shot_ms: f32,
    /// Visual kick after firing, decays to 0
    pub recoil: f32,
    /// Last known pointer position (aim target)
    pub aim: Vec2,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            body: Body::new(pos, tuning.player_radius, 1.0),
            health: tuning.player_max_health,
            max_health: tuning.player_max_health,
            time_since_shot_ms: 0.0,
            recoil: 0.0,
            aim: pos + Vec2::X,
        }
    }

    /// Health as a fraction in [0, 1]
    pub fn health_ratio(&self) -> f32 {
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// Aim jitter half-width (radians): grows linearly with lost health
    pub fn spread(&self, max_spread: f32) -> f32 {
        ((1.0 - self.health_ratio()) * max_spread).clamp(0.0, max_spread)
    }

    /// Move from held keys, clamp to the viewport and advance the fire timer.
    /// Returns true when a shot is due this frame.
    pub fn update(&mut self, input: &TickInput, viewport: Vec2, tuning: &Tuning, dt: f32) -> bool {
        let speed = if input.sprint {
            tuning.player_move_speed * tuning.player_sprint_multiplier
        } else {
            tuning.player_move_speed
        };
        // Instant start/stop, no acceleration ramp
        self.body.vel = input.move_axis().normalize_or_zero() * speed;
        self.body.integrate(dt);

        let margin = tuning.player_edge_margin;
        let max = (viewport - Vec2::splat(margin)).max(Vec2::splat(margin));
        self.body.pos = self.body.pos.clamp(Vec2::splat(margin), max);

        if let Some(pointer) = input.pointer {
            self.aim = pointer;
        }

        self.recoil = (self.recoil - dt * tuning.recoil_decay).max(0.0);

        self.time_since_shot_ms += dt * 1000.0;
        if self.time_since_shot_ms >= tuning.player_reload_ms {
            // Reset rather than subtract so frame spikes never burst-fire
            self.time_since_shot_ms = 0.0;
            true
        } else {
            false
        }
    }

    /// Fire one projectile toward the aim point with health-based jitter
    pub fn shoot<R: Rng>(&mut self, rng: &mut R, tuning: &Tuning, hue: u32) -> Projectile {
        let dir = crate::direction_to(self.body.pos, self.aim);
        let spread = self.spread(tuning.player_max_spread);
        let jitter = crate::rand_range(rng, -spread, spread);
        let angle = dir.y.atan2(dir.x) + jitter;
        let heading = Vec2::from_angle(angle);

        self.recoil = 1.0;
        Projectile::new(
            self.body.pos + heading * tuning.projectile_muzzle_offset,
            heading * tuning.projectile_speed,
            tuning,
            hue,
        )
    }

    /// Subtract damage, clamping at zero. Returns true if health is now depleted.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);
        self.health <= 0.0
    }
}
