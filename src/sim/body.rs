//! Kinematic body shared by every moving entity

use glam::Vec2;

/// A point mass with a collision radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Velocity multiplier applied after each integration step (1.0 = no damping)
    pub friction: f32,
    pub alive: bool,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32, friction: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            friction: friction.clamp(f32::EPSILON, 1.0),
            alive: true,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    /// Single explicit Euler step followed by friction damping
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.vel *= self.friction;
    }

    /// Circle overlap test against another body, with an adjustment added to
    /// the combined radius (negative values shrink the contact zone)
    #[inline]
    pub fn overlaps(&self, other: &Body, radius_adjust: f32) -> bool {
        circles_overlap(self.pos, self.radius, other.pos, other.radius + radius_adjust)
    }
}

/// Squared-distance circle overlap (touching counts as overlapping)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}
