//! Collision and damage resolution
//!
//! Two independent passes run once per frame, after movement and before
//! cleanup:
//! 1. projectiles against enemies (single-hit projectiles, bounty on kill)
//! 2. enemies against the player (contact damage over time)

use super::particle::{self, Particle, ParticleKind};
use super::state::{GameEvent, GameState};
use crate::consts::REFERENCE_FRAME_DT;
use crate::chance;

/// Resolve projectile/enemy overlaps. Returns the number of enemies killed.
///
/// A projectile is consumed by the first enemy it touches; an enemy pays its
/// bounty only on the hit that takes it from alive to dead.
pub fn resolve_projectile_hits(state: &mut GameState) -> usize {
    let hit_particles = state.tuning.hit_particles;
    let GameState {
        projectiles,
        enemies,
        particles,
        rng,
        score,
        events,
        ..
    } = &mut *state;

    let mut kills = 0;
    let mut explosion_triggered = false;

    for projectile in projectiles.iter_mut() {
        for enemy in enemies.iter_mut() {
            if !projectile.body.alive {
                break;
            }
            if !enemy.body.alive || !projectile.body.overlaps(&enemy.body, 0.0) {
                continue;
            }

            projectile.body.alive = false;
            particle::hit_burst(particles, rng, projectile.body.pos, projectile.hue as f32, hit_particles);
            events.push(GameEvent::EnemyHit {
                pos: projectile.body.pos,
            });

            if enemy.take_damage(projectile.damage) {
                *score += enemy.bounty;
                kills += 1;
                explosion_triggered = true;
                particle::explosion(particles, rng, enemy.body.pos, enemy.hue);
                log::debug!("{:?} killed for {} points", enemy.archetype, enemy.bounty);
                events.push(GameEvent::EnemyKilled {
                    archetype: enemy.archetype,
                    pos: enemy.body.pos,
                    bounty: enemy.bounty,
                });
            }
        }
    }

    if explosion_triggered {
        state.add_screen_shake(state.tuning.explosion_shake);
        state.add_flash(state.tuning.explosion_flash);
    }
    kills
}

/// Resolve enemy/player contact. Damage is a rate: each frame of contact
/// deals `touch_damage * contact_damage_fraction`, scaled by `dt` relative
/// to a 60 Hz frame so damage per second does not depend on frame rate.
/// Overlapping enemies are nudged away to reduce sticking.
pub fn resolve_player_contacts(state: &mut GameState, dt: f32) {
    let frame_scale = dt / REFERENCE_FRAME_DT;
    let radius_adjust = -state.tuning.contact_radius_tolerance;
    let fraction = state.tuning.contact_damage_fraction;
    let push = state.tuning.contact_push;
    let spark_chance = state.tuning.contact_particle_chance;
    let audible_chance = state.tuning.audible_damage_chance;
    let mut depleted = false;

    {
        let GameState {
            enemies,
            player,
            particles,
            rng,
            events,
            projectile_hue_seed,
            ..
        } = &mut *state;

        for enemy in enemies.iter_mut() {
            if !enemy.body.alive || !enemy.body.overlaps(&player.body, radius_adjust) {
                continue;
            }

            let amount = enemy.touch_damage * fraction * frame_scale;
            depleted |= player.apply_damage(amount);

            let away = crate::direction_to(player.body.pos, enemy.body.pos);
            enemy.body.pos += away * push;

            if chance(rng, spark_chance) {
                let hue = ((*projectile_hue_seed + 120) % 360) as f32;
                particles.push(Particle::spawn(rng, player.body.pos, ParticleKind::Hit, hue));
            }
            let audible = chance(rng, audible_chance);
            events.push(GameEvent::PlayerDamaged { amount, audible });
        }
    }

    if depleted {
        state.end_game();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::{Archetype, Enemy, EnemyStats};
    use crate::sim::projectile::Projectile;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new(7, Vec2::new(800.0, 600.0), Tuning::default())
    }

    fn enemy_with(pos: Vec2, health: f32, touch_damage: f32) -> Enemy {
        Enemy::from_stats(
            pos,
            Archetype::Biter,
            EnemyStats {
                speed: 0.0,
                health,
                radius: 14.0,
                touch_damage,
                bounty: 30,
                hue: 25.0,
            },
        )
    }

    fn shot_at(state: &GameState, pos: Vec2) -> Projectile {
        Projectile::new(pos, Vec2::ZERO, &state.tuning, 0)
    }

    #[test]
    fn test_two_hits_kill_forty_hp_enemy_once() {
        let mut s = state();
        let pos = Vec2::new(100.0, 100.0);
        s.enemies.push(enemy_with(pos, 40.0, 0.0));

        s.projectiles.push(shot_at(&s, pos));
        assert_eq!(resolve_projectile_hits(&mut s), 0);
        assert_eq!(s.enemies[0].health, 15.0);
        assert!(s.enemies[0].body.alive);
        assert_eq!(s.score, 0);

        s.projectiles.clear();
        s.projectiles.push(shot_at(&s, pos));
        assert_eq!(resolve_projectile_hits(&mut s), 1);
        assert!(!s.enemies[0].body.alive);
        assert_eq!(s.score, 30);

        // Further passes cannot pay again
        s.projectiles.push(shot_at(&s, pos));
        assert_eq!(resolve_projectile_hits(&mut s), 0);
        assert_eq!(s.score, 30);

        let kills = s
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
            .count();
        assert_eq!(kills, 1);
        assert_eq!(s.screen_shake, s.tuning.explosion_shake);
    }

    #[test]
    fn test_kill_feedback_comes_from_tuning() {
        let tuning = Tuning {
            explosion_shake: 3.0,
            explosion_flash: 0.1,
            hit_particles: 0,
            ..Tuning::default()
        };
        let mut s = GameState::new(7, Vec2::new(800.0, 600.0), tuning);
        let pos = Vec2::new(200.0, 200.0);
        s.enemies.push(enemy_with(pos, 10.0, 0.0));
        s.projectiles.push(shot_at(&s, pos));

        assert_eq!(resolve_projectile_hits(&mut s), 1);
        assert_eq!(s.screen_shake, 3.0);
        assert_eq!(s.flash, 0.1);
        // Explosion burst only, no impact particles
        assert_eq!(s.particles.len(), 40);
    }

    #[test]
    fn test_projectile_hits_only_one_enemy() {
        let mut s = state();
        let pos = Vec2::new(200.0, 200.0);
        s.enemies.push(enemy_with(pos, 100.0, 0.0));
        s.enemies.push(enemy_with(pos + Vec2::new(2.0, 0.0), 100.0, 0.0));
        s.projectiles.push(shot_at(&s, pos));

        resolve_projectile_hits(&mut s);
        let damaged = s.enemies.iter().filter(|e| e.health < 100.0).count();
        assert_eq!(damaged, 1);
        assert!(!s.projectiles[0].body.alive);
    }

    #[test]
    fn test_two_projectiles_same_frame_single_bounty() {
        let mut s = state();
        let pos = Vec2::new(300.0, 300.0);
        s.enemies.push(enemy_with(pos, 20.0, 0.0));
        s.projectiles.push(shot_at(&s, pos));
        s.projectiles.push(shot_at(&s, pos));

        assert_eq!(resolve_projectile_hits(&mut s), 1);
        assert_eq!(s.score, 30);
        // The second projectile found no live target and survives
        assert!(s.projectiles[1].body.alive);
    }

    #[test]
    fn test_miss_leaves_everything_alive() {
        let mut s = state();
        s.enemies.push(enemy_with(Vec2::new(100.0, 100.0), 40.0, 0.0));
        s.projectiles.push(shot_at(&s, Vec2::new(300.0, 300.0)));
        resolve_projectile_hits(&mut s);
        assert!(s.projectiles[0].body.alive);
        assert_eq!(s.enemies[0].health, 40.0);
        assert!(s.particles.is_empty());
    }

    #[test]
    fn test_contact_damage_is_a_fraction_per_frame() {
        let mut s = state();
        let player_pos = s.player.body.pos;
        s.enemies.push(enemy_with(player_pos + Vec2::new(5.0, 0.0), 50.0, 20.0));

        resolve_player_contacts(&mut s, REFERENCE_FRAME_DT);
        assert!((s.player.health - 99.6).abs() < 1e-4);
        assert_eq!(s.phase, crate::sim::GamePhase::Running);
    }

    #[test]
    fn test_contact_damage_scales_with_dt() {
        let mut a = state();
        let mut b = state();
        let pos = a.player.body.pos + Vec2::new(5.0, 0.0);
        a.enemies.push(enemy_with(pos, 50.0, 20.0));
        b.enemies.push(enemy_with(pos, 50.0, 20.0));

        resolve_player_contacts(&mut a, REFERENCE_FRAME_DT * 2.0);
        resolve_player_contacts(&mut b, REFERENCE_FRAME_DT);
        b.enemies[0].body.pos = pos;
        resolve_player_contacts(&mut b, REFERENCE_FRAME_DT);
        assert!((a.player.health - b.player.health).abs() < 1e-4);
    }

    #[test]
    fn test_contact_tolerance_deadzone() {
        let mut s = state();
        let player = s.player.body;
        // Touching by less than the tolerance does no damage
        let offset = player.radius + 14.0 - 1.0;
        s.enemies.push(enemy_with(player.pos + Vec2::new(offset, 0.0), 50.0, 20.0));
        resolve_player_contacts(&mut s, REFERENCE_FRAME_DT);
        assert_eq!(s.player.health, s.player.max_health);
    }

    #[test]
    fn test_contact_pushes_enemy_away() {
        let mut s = state();
        let start = s.player.body.pos + Vec2::new(5.0, 0.0);
        s.enemies.push(enemy_with(start, 50.0, 20.0));
        resolve_player_contacts(&mut s, REFERENCE_FRAME_DT);
        assert!((s.enemies[0].body.pos.x - (start.x + s.tuning.contact_push)).abs() < 1e-4);
    }

    #[test]
    fn test_lethal_contact_ends_game_once() {
        let mut s = state();
        s.player.health = 0.1;
        let pos = s.player.body.pos;
        s.enemies.push(enemy_with(pos + Vec2::new(1.0, 0.0), 50.0, 20.0));
        s.enemies.push(enemy_with(pos - Vec2::new(1.0, 0.0), 50.0, 20.0));

        resolve_player_contacts(&mut s, REFERENCE_FRAME_DT);
        assert_eq!(s.player.health, 0.0);
        assert_eq!(s.phase, crate::sim::GamePhase::Ended);

        resolve_player_contacts(&mut s, REFERENCE_FRAME_DT);
        let overs = s
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }
}
