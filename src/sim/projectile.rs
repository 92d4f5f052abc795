//! Ballistic player projectiles

use glam::Vec2;

use super::body::Body;
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct Projectile {
    pub body: Body,
    pub damage: f32,
    /// Seconds left before the projectile expires
    pub life: f32,
    /// Cosmetic hue (degrees)
    pub hue: u32,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, tuning: &Tuning, hue: u32) -> Self {
        Self {
            body: Body::new(pos, tuning.projectile_radius, 1.0).with_velocity(vel),
            damage: tuning.projectile_damage,
            life: tuning.projectile_life_secs,
            hue: hue % 360,
        }
    }

    /// Advance and expire once out of life or well past the viewport edge
    pub fn update(&mut self, dt: f32, viewport: Vec2, offscreen_margin: f32) {
        self.body.integrate(dt);
        self.life -= dt;

        let p = self.body.pos;
        let outside = p.x < -offscreen_margin
            || p.x > viewport.x + offscreen_margin
            || p.y < -offscreen_margin
            || p.y > viewport.y + offscreen_margin;
        if outside || self.life <= 0.0 {
            self.body.alive = false;
        }
    }
}
