//! Cosmetic particles (hit sparks and explosions)

use glam::Vec2;
use rand::Rng;

use super::body::Body;
use crate::rand_range;

/// Particle flavours; each has its own speed, size, life and drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Hit,
    Spark,
    Explosion,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub body: Body,
    pub kind: ParticleKind,
    /// Remaining life in seconds
    pub life: f32,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    pub hue: f32,
}

impl Particle {
    pub fn spawn<R: Rng>(rng: &mut R, pos: Vec2, kind: ParticleKind, hue: f32) -> Self {
        let (speed, life, radius, gravity, friction) = match kind {
            ParticleKind::Explosion => (300.0, (0.8, 1.5), (3.0, 8.0), 50.0, 0.95),
            ParticleKind::Spark => (400.0, (0.3, 0.7), (1.0, 3.0), 0.0, 0.98),
            ParticleKind::Hit => (120.0, (0.2, 0.5), (1.0, 2.0), 0.0, 0.93),
        };
        let vel = Vec2::new(
            rand_range(rng, -speed, speed),
            rand_range(rng, -speed, speed),
        );
        Self {
            body: Body::new(pos, rand_range(rng, radius.0, radius.1), friction).with_velocity(vel),
            kind,
            life: rand_range(rng, life.0, life.1),
            gravity,
            hue: hue.rem_euclid(360.0),
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.life -= dt;
        self.body.pos += self.body.vel * dt;
        self.body.vel.y += self.gravity * dt;
        self.body.vel *= self.body.friction;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Fade-out alpha: fully opaque until the final half second
    pub fn alpha(&self) -> f32 {
        (self.life * 2.0).clamp(0.0, 1.0)
    }
}

/// Small burst of hit particles
pub fn hit_burst<R: Rng>(particles: &mut Vec<Particle>, rng: &mut R, pos: Vec2, hue: f32, count: usize) {
    particles.extend((0..count).map(|_| Particle::spawn(rng, pos, ParticleKind::Hit, hue)));
}

/// Large explosion with a ring of bright sparks offset in hue
pub fn explosion<R: Rng>(particles: &mut Vec<Particle>, rng: &mut R, pos: Vec2, hue: f32) {
    particles.extend((0..25).map(|_| Particle::spawn(rng, pos, ParticleKind::Explosion, hue)));
    particles.extend((0..15).map(|_| Particle::spawn(rng, pos, ParticleKind::Spark, hue + 60.0)));
}
