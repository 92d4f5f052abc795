//! Scene assembly
//!
//! Turns a `GameState` into one triangle list in CSS-pixel space, back to
//! front: grid, player, enemies, projectiles, particles, then the flash
//! overlay (which ignores screen shake).

use glam::Vec2;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, TAU};

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::hsl_to_rgba;
use crate::settings::Settings;
use crate::sim::{Enemy, GameState, Particle, ParticleKind, Player};

const GRID_SIZE: f32 = 48.0;
const GRID_ALPHA: f32 = 0.36;
const BARREL_LENGTH: f32 = 24.0;
const BARREL_WIDTH: f32 = 4.0;
/// Enemy health ring: gap from body and thickness
const HEALTH_RING_GAP: f32 = 4.0;
const HEALTH_RING_WIDTH: f32 = 3.0;
/// Health ratio above which the ring is drawn green
const HEALTH_RING_OK: f32 = 0.34;

/// Random camera offset for the current shake intensity
pub fn shake_offset<R: Rng>(rng: &mut R, intensity: f32) -> Vec2 {
    if intensity <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * intensity
}

/// Build every vertex for one frame. `time` is seconds since page load and
/// only animates the background.
pub fn build_scene(state: &GameState, settings: &Settings, time: f32, shake: Vec2) -> Vec<Vertex> {
    let segments = settings.quality.circle_segments();
    let shake = if settings.effective_screen_shake() {
        shake
    } else {
        Vec2::ZERO
    };

    let mut vertices = Vec::new();
    if settings.quality.grid_enabled() {
        background_grid(&mut vertices, state.viewport, time, shake);
    }

    player(&mut vertices, &state.player, shake, segments);

    for enemy in &state.enemies {
        enemy_body(&mut vertices, enemy, shake, segments);
    }

    for projectile in &state.projectiles {
        let color = hsl_to_rgba(projectile.hue as f32, 0.95, 0.7, 1.0);
        let pos = projectile.body.pos + shake;
        // Soft glow under the core
        vertices.extend(shapes::circle(pos, projectile.body.radius * 2.5, with_alpha(color, 0.25), segments));
        vertices.extend(shapes::circle(pos, projectile.body.radius, color, segments));
    }

    for particle in state.particles.iter().take(settings.max_particles()) {
        particle_sprite(&mut vertices, particle, shake);
    }

    if settings.effective_flash() && state.flash > 0.0 {
        vertices.extend(shapes::rect(
            Vec2::ZERO,
            state.viewport,
            with_alpha(colors::FLASH, state.flash.clamp(0.0, 1.0)),
        ));
    }

    vertices
}

fn with_alpha(mut color: [f32; 4], alpha: f32) -> [f32; 4] {
    color[3] = alpha;
    color
}

/// Hue-cycling grid with a slight wobble
fn background_grid(out: &mut Vec<Vertex>, viewport: Vec2, time: f32, shake: Vec2) {
    let t = time * 0.5;
    let mut x = -GRID_SIZE;
    while x < viewport.x + GRID_SIZE {
        let ox = (t + x * 0.02).sin() * 2.0;
        let hue = x * 2.0 + t * 360.0;
        let color = hsl_to_rgba(hue, 0.7, 0.45, GRID_ALPHA);
        out.extend(shapes::line(
            Vec2::new(x + ox, 0.0) + shake,
            Vec2::new(x + ox, viewport.y) + shake,
            1.0,
            color,
        ));
        x += GRID_SIZE;
    }
    let mut y = -GRID_SIZE;
    while y < viewport.y + GRID_SIZE {
        let oy = (t + y * 0.02).cos() * 2.0;
        let hue = y * 2.0 + t * 360.0 + 120.0;
        let color = hsl_to_rgba(hue, 0.7, 0.4, GRID_ALPHA);
        out.extend(shapes::line(
            Vec2::new(0.0, y + oy) + shake,
            Vec2::new(viewport.x, y + oy) + shake,
            1.0,
            color,
        ));
        y += GRID_SIZE;
    }
}

/// Body kicked back along the aim by recoil, plus the barrel
fn player(out: &mut Vec<Vertex>, player: &Player, shake: Vec2, segments: u32) {
    let aim = crate::direction_to(player.body.pos, player.aim);
    let kick = player.recoil * 2.0;
    let pos = player.body.pos + aim * kick + shake;
    let radius = player.body.radius + kick;

    out.extend(shapes::shaded_circle(
        pos,
        radius,
        colors::PLAYER_CORE,
        colors::PLAYER,
        segments,
    ));
    out.extend(shapes::line(pos, pos + aim * BARREL_LENGTH, BARREL_WIDTH, colors::PLAYER_BARREL));
}

/// Shaded body and a clockwise health ring starting at 12 o'clock
fn enemy_body(out: &mut Vec<Vertex>, enemy: &Enemy, shake: Vec2, segments: u32) {
    let pos = enemy.body.pos + shake;
    let body_color = hsl_to_rgba(enemy.hue, 0.8, 0.6, 1.0);
    out.extend(shapes::shaded_circle(
        pos,
        enemy.body.radius,
        body_color,
        colors::ENEMY_SHADE,
        segments,
    ));

    let ratio = enemy.health_ratio();
    let ring_color = if ratio > HEALTH_RING_OK {
        colors::HEALTH_OK
    } else {
        colors::HEALTH_LOW
    };
    let inner = enemy.body.radius + HEALTH_RING_GAP - HEALTH_RING_WIDTH * 0.5;
    out.extend(shapes::arc_band(
        pos,
        inner,
        inner + HEALTH_RING_WIDTH,
        -FRAC_PI_2,
        TAU * ratio,
        ring_color,
        4.0,
    ));
}

fn particle_sprite(out: &mut Vec<Vertex>, particle: &Particle, shake: Vec2) {
    let (saturation, lightness, glow) = match particle.kind {
        ParticleKind::Explosion => (0.9, 0.7, 2.0),
        ParticleKind::Spark => (0.95, 0.85, 1.6),
        ParticleKind::Hit => (0.9, 0.7, 1.0),
    };
    let alpha = particle.alpha();
    let color = hsl_to_rgba(particle.hue, saturation, lightness, alpha);
    let pos = particle.body.pos + shake;
    if glow > 1.0 {
        out.extend(shapes::circle(pos, particle.body.radius * glow, with_alpha(color, alpha * 0.3), 8));
    }
    out.extend(shapes::circle(pos, particle.body.radius, color, 8));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;
    use crate::sim::{Archetype, ParticleKind};
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state() -> GameState {
        GameState::new(1, Vec2::new(800.0, 600.0), Tuning::default())
    }

    fn low() -> Settings {
        Settings::from_preset(QualityPreset::Low)
    }

    #[test]
    fn test_player_only_scene() {
        let s = state();
        let settings = low();
        let verts = build_scene(&s, &settings, 0.0, Vec2::ZERO);
        let segments = settings.quality.circle_segments() as usize;
        // Player circle plus barrel quad
        assert_eq!(verts.len(), segments * 3 + 6);
        assert_eq!(verts.len() % 3, 0);
    }

    #[test]
    fn test_every_entity_adds_geometry() {
        let settings = low();
        let mut s = state();
        let base = build_scene(&s, &settings, 0.0, Vec2::ZERO).len();
        s.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), Archetype::Biter, 1));
        let with_enemy = build_scene(&s, &settings, 0.0, Vec2::ZERO).len();
        assert!(with_enemy > base);

        let mut rng = Pcg32::seed_from_u64(1);
        s.particles
            .push(Particle::spawn(&mut rng, Vec2::new(50.0, 50.0), ParticleKind::Hit, 10.0));
        assert!(build_scene(&s, &settings, 0.0, Vec2::ZERO).len() > with_enemy);
    }

    #[test]
    fn test_particle_cap_respected() {
        let mut settings = low();
        settings.particles = false;
        let mut s = state();
        let mut rng = Pcg32::seed_from_u64(1);
        crate::sim::particle::explosion(&mut s.particles, &mut rng, Vec2::new(50.0, 50.0), 0.0);
        let with = build_scene(&s, &settings, 0.0, Vec2::ZERO).len();
        s.particles.clear();
        let without = build_scene(&s, &settings, 0.0, Vec2::ZERO).len();
        assert_eq!(with, without);
    }

    #[test]
    fn test_flash_overlay_is_last_and_unshaken() {
        let settings = Settings {
            quality: QualityPreset::Low,
            ..Settings::default()
        };
        let mut s = state();
        s.flash = 0.4;
        let verts = build_scene(&s, &settings, 0.0, Vec2::new(5.0, 5.0));
        let last = verts.last().copied().unwrap();
        assert_eq!(last.color, [1.0, 1.0, 1.0, 0.4]);
        assert_eq!(last.position, [800.0, 600.0]);
    }

    #[test]
    fn test_reduced_motion_ignores_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..low()
        };
        let s = state();
        let still = build_scene(&s, &settings, 0.0, Vec2::ZERO);
        let shaken = build_scene(&s, &settings, 0.0, Vec2::new(7.0, -3.0));
        assert_eq!(still.len(), shaken.len());
        assert!(still.iter().zip(&shaken).all(|(a, b)| a.position == b.position));
    }

    #[test]
    fn test_shake_offset_bounds() {
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(shake_offset(&mut rng, 0.0), Vec2::ZERO);
        for _ in 0..100 {
            let o = shake_offset(&mut rng, 10.0);
            assert!(o.x.abs() <= 5.0 && o.y.abs() <= 5.0);
        }
    }
}
