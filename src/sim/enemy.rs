//! Enemy archetypes and steering
//!
//! Enemies chase the player while pushing away from overlapping neighbours.
//! Separation is pairwise O(n²); the spawner's population cap (at most
//! [`crate::consts::MAX_ENEMIES`]) keeps that bounded.

use glam::Vec2;
use rand::Rng;

use super::body::Body;
use crate::consts::ENEMY_FRICTION;
use crate::tuning::Tuning;

/// Enemy stat preset, rolled at spawn time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    /// Very fast, one hit point, low damage
    Runner,
    /// Moderate speed, high contact damage
    Biter,
    /// Slow, very high health, large
    Brute,
}

/// Stats for one archetype at one wave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub speed: f32,
    pub health: f32,
    pub radius: f32,
    pub touch_damage: f32,
    pub bounty: u64,
    pub hue: f32,
}

impl Archetype {
    /// Map a roll in [0, 1) to an archetype: 45% runner, 30% biter, 25% brute
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.45 {
            Archetype::Runner
        } else if roll < 0.75 {
            Archetype::Biter
        } else {
            Archetype::Brute
        }
    }

    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        Self::from_roll(rng.random::<f32>())
    }

    /// Wave-scaled stats; everything grows with the wave number
    pub fn stats(self, wave: u32) -> EnemyStats {
        let w = wave as f32;
        match self {
            Archetype::Runner => EnemyStats {
                speed: 140.0 + w * 10.0,
                health: 1.0,
                radius: 12.0,
                touch_damage: 6.0 + (wave / 3) as f32,
                bounty: 8 + (w * 1.5).floor() as u64,
                hue: 190.0,
            },
            Archetype::Biter => EnemyStats {
                speed: 85.0 + w * 7.0,
                health: 40.0 + w * 10.0,
                radius: 14.0,
                touch_damage: 22.0 + (w * 1.5).floor(),
                bounty: 14 + wave as u64 * 2,
                hue: 25.0,
            },
            Archetype::Brute => EnemyStats {
                speed: 55.0 + w * 4.0,
                health: 140.0 + w * 24.0,
                radius: (18 + wave / 6).clamp(18, 26) as f32,
                touch_damage: 14.0 + w * 2.0,
                bounty: 24 + wave as u64 * 3,
                hue: 275.0,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Body,
    pub archetype: Archetype,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub touch_damage: f32,
    pub bounty: u64,
    pub hue: f32,
}

impl Enemy {
    pub fn new(pos: Vec2, archetype: Archetype, wave: u32) -> Self {
        Self::from_stats(pos, archetype, archetype.stats(wave))
    }

    pub fn from_stats(pos: Vec2, archetype: Archetype, stats: EnemyStats) -> Self {
        Self {
            body: Body::new(pos, stats.radius, ENEMY_FRICTION),
            archetype,
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            touch_damage: stats.touch_damage,
            bounty: stats.bounty,
            hue: stats.hue,
        }
    }

    pub fn health_ratio(&self) -> f32 {
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// Apply damage; returns true exactly when this call kills the enemy.
    /// The alive flag flips here, so a dead enemy can never pay out twice.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.body.alive {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.body.alive = false;
            true
        } else {
            false
        }
    }
}

/// Push vector away from every neighbour closer than the padded combined radius
pub fn separation(enemies: &[Enemy], index: usize, padding: f32) -> Vec2 {
    let me = &enemies[index].body;
    let mut push = Vec2::ZERO;
    for (j, other) in enemies.iter().enumerate() {
        if j == index || !other.body.alive {
            continue;
        }
        let delta = me.pos - other.body.pos;
        let dist2 = delta.length_squared();
        let min_dist = me.radius + other.body.radius + padding;
        if dist2 < min_dist * min_dist && dist2 > 0.01 {
            let dist = dist2.sqrt();
            let depth = (min_dist - dist) / min_dist;
            push += delta / dist * depth;
        }
    }
    push
}

/// Steer every enemy toward the player, integrate, and bounce off the edges.
/// Enemies update in order, so later ones see earlier ones' new positions.
pub fn steer_enemies(enemies: &mut [Enemy], target: Vec2, viewport: Vec2, tuning: &Tuning, dt: f32) {
    let margin = tuning.enemy_edge_margin;
    let max = (viewport - Vec2::splat(margin)).max(Vec2::splat(margin));

    for i in 0..enemies.len() {
        if !enemies[i].body.alive {
            continue;
        }
        let avoid = separation(enemies, i, tuning.enemy_separation_padding);
        let enemy = &mut enemies[i];
        let chase = crate::direction_to(enemy.body.pos, target) * enemy.speed;
        enemy.body.vel = chase + avoid * tuning.enemy_separation_weight;
        enemy.body.integrate(dt);

        let body = &mut enemy.body;
        if body.pos.x < margin {
            body.pos.x = margin;
            body.vel.x *= tuning.enemy_bounce;
        }
        if body.pos.x > max.x {
            body.pos.x = max.x;
            body.vel.x *= tuning.enemy_bounce;
        }
        if body.pos.y < margin {
            body.pos.y = margin;
            body.vel.y *= tuning.enemy_bounce;
        }
        if body.pos.y > max.y {
            body.pos.y = max.y;
            body.vel.y *= tuning.enemy_bounce;
        }
    }
}
