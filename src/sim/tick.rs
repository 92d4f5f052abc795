//! Per-frame simulation tick
//!
//! Advances a running session by one variable-length frame. Phases run in a
//! fixed order; each one reads the results of the phase before it.

use glam::Vec2;

use super::collision::{resolve_player_contacts, resolve_projectile_hits};
use super::enemy::steer_enemies;
use super::spawner::{update_spawning, update_wave};
use super::state::{GameEvent, GameState};
use crate::consts::PROJECTILE_HUE_STEP;

/// Input commands for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Sprint modifier (shift)
    pub sprint: bool,
    /// Pointer position in viewport coordinates, if known
    pub pointer: Option<Vec2>,
}

impl TickInput {
    /// Raw (unnormalized) movement axis; screen y grows downward
    pub fn move_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.up {
            axis.y -= 1.0;
        }
        if self.down {
            axis.y += 1.0;
        }
        if self.left {
            axis.x -= 1.0;
        }
        if self.right {
            axis.x += 1.0;
        }
        axis
    }
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if !state.is_running() {
        return;
    }
    let dt = dt.clamp(0.0, state.tuning.max_frame_dt);

    state.elapsed_ms += dt as f64 * 1000.0;

    update_wave(state);
    update_spawning(state, dt);

    // Player movement and auto-fire
    let viewport = state.viewport;
    if state.player.update(input, viewport, &state.tuning, dt) {
        state.projectile_hue_seed = (state.projectile_hue_seed + PROJECTILE_HUE_STEP) % 360;
        let hue = state.projectile_hue_seed;
        let projectile = state.player.shoot(&mut state.rng, &state.tuning, hue);
        state.events.push(GameEvent::ShotFired {
            pos: projectile.body.pos,
            hue,
        });
        state.projectiles.push(projectile);
    }

    let margin = state.tuning.projectile_offscreen_margin;
    for projectile in &mut state.projectiles {
        projectile.update(dt, viewport, margin);
    }

    let target = state.player.body.pos;
    steer_enemies(&mut state.enemies, target, viewport, &state.tuning, dt);

    for particle in &mut state.particles {
        particle.update(dt);
    }

    resolve_projectile_hits(state);
    resolve_player_contacts(state, dt);

    // Effect decay
    state.screen_shake = (state.screen_shake - state.tuning.shake_decay * dt).max(0.0);
    state.flash = (state.flash - state.tuning.flash_decay * dt).max(0.0);

    // Cleanup
    state.projectiles.retain(|p| p.body.alive);
    state.enemies.retain(|e| e.body.alive);
    state.particles.retain(|p| p.is_alive());

    check_low_health(state);
}

/// Emit a low-health warning at most once per warning interval while the
/// player is hurt but not dead
fn check_low_health(state: &mut GameState) {
    if !state.is_running() {
        return;
    }
    let ratio = state.player.health_ratio();
    if ratio <= 0.0 || ratio >= state.tuning.low_health_ratio {
        return;
    }
    if state.elapsed_ms - state.last_low_health_warning_ms > state.tuning.low_health_warning_ms {
        state.last_low_health_warning_ms = state.elapsed_ms;
        state.events.push(GameEvent::LowHealthWarning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::{Archetype, Enemy};
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;

    const FRAME: f32 = 1.0 / 60.0;

    fn state() -> GameState {
        GameState::new(12345, Vec2::new(800.0, 600.0), Tuning::default())
    }

    fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
        events.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn test_move_axis() {
        let input = TickInput {
            up: true,
            left: true,
            ..Default::default()
        };
        assert_eq!(input.move_axis(), Vec2::new(-1.0, -1.0));
        let opposed = TickInput {
            up: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(opposed.move_axis(), Vec2::ZERO);
    }

    #[test]
    fn test_tick_advances_time_and_clamps_dt() {
        let mut s = state();
        tick(&mut s, &TickInput::default(), 0.5);
        assert!((s.elapsed_ms - 33.0).abs() < 1e-3);
        tick(&mut s, &TickInput::default(), -1.0);
        assert!((s.elapsed_ms - 33.0).abs() < 1e-3);
    }

    #[test]
    fn test_tick_is_noop_unless_running() {
        let mut s = state();
        s.phase = GamePhase::Home;
        tick(&mut s, &TickInput::default(), FRAME);
        assert_eq!(s.elapsed_ms, 0.0);
        s.phase = GamePhase::Ended;
        tick(&mut s, &TickInput::default(), FRAME);
        assert_eq!(s.elapsed_ms, 0.0);
    }

    #[test]
    fn test_auto_fire_cadence() {
        let mut s = state();
        s.player.aim = s.player.body.pos + Vec2::new(100.0, 0.0);
        // One simulated second at 60 Hz
        for _ in 0..60 {
            tick(&mut s, &TickInput::default(), FRAME);
        }
        let shots = count(&s.drain_events(), |e| matches!(e, GameEvent::ShotFired { .. }));
        // 140 ms reload, reset-to-zero timer: one shot every 9 frames
        assert_eq!(shots, 6);
    }

    #[test]
    fn test_hue_seed_rotates() {
        let mut s = state();
        for _ in 0..20 {
            tick(&mut s, &TickInput::default(), FRAME);
        }
        let hues: Vec<u32> = s
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::ShotFired { hue, .. } => Some(hue),
                _ => None,
            })
            .collect();
        assert_eq!(hues, vec![37, 74]);
    }

    #[test]
    fn test_wave_two_after_fifteen_seconds() {
        let mut s = state();
        s.elapsed_ms = 14_990.0;
        tick(&mut s, &TickInput::default(), 0.011);
        assert_eq!(s.wave, 2);
        let advances = count(&s.drain_events(), |e| matches!(e, GameEvent::WaveAdvanced { .. }));
        assert_eq!(advances, 1);
        tick(&mut s, &TickInput::default(), FRAME);
        let advances = count(&s.drain_events(), |e| matches!(e, GameEvent::WaveAdvanced { .. }));
        assert_eq!(advances, 0);
    }

    #[test]
    fn test_dead_entities_removed_by_cleanup() {
        let mut s = state();
        let mut enemy = Enemy::new(Vec2::new(50.0, 50.0), Archetype::Runner, 1);
        enemy.body.alive = false;
        s.enemies.push(enemy);
        s.enemies.push(Enemy::new(Vec2::new(60.0, 500.0), Archetype::Runner, 1));
        tick(&mut s, &TickInput::default(), FRAME);
        assert!(s.enemies.iter().all(|e| e.body.alive));
        assert!(s.projectiles.iter().all(|p| p.body.alive));
        assert!(s.particles.iter().all(|p| p.is_alive()));
    }

    #[test]
    fn test_effects_decay_to_zero() {
        let mut s = state();
        s.screen_shake = 15.0;
        s.flash = 0.4;
        for _ in 0..60 {
            tick(&mut s, &TickInput::default(), FRAME);
        }
        assert_eq!(s.screen_shake, 0.0);
        assert_eq!(s.flash, 0.0);
    }

    #[test]
    fn test_decay_rates_come_from_tuning() {
        let tuning = Tuning {
            shake_decay: 6.0,
            flash_decay: 0.0,
            ..Tuning::default()
        };
        let mut s = GameState::new(12345, Vec2::new(800.0, 600.0), tuning);
        s.screen_shake = 15.0;
        s.flash = 0.4;
        for _ in 0..60 {
            tick(&mut s, &TickInput::default(), FRAME);
        }
        assert!((s.screen_shake - 9.0).abs() < 1e-3);
        assert_eq!(s.flash, 0.4);
    }

    #[test]
    fn test_low_health_warning_interval() {
        let mut s = state();
        s.player.health = 20.0;
        s.elapsed_ms = 5000.0;
        tick(&mut s, &TickInput::default(), FRAME);
        // Ticks until just under two seconds later stay quiet
        for _ in 0..100 {
            tick(&mut s, &TickInput::default(), FRAME);
        }
        let events = s.drain_events();
        assert_eq!(count(&events, |e| *e == GameEvent::LowHealthWarning), 1);

        for _ in 0..30 {
            tick(&mut s, &TickInput::default(), FRAME);
        }
        let events = s.drain_events();
        assert_eq!(count(&events, |e| *e == GameEvent::LowHealthWarning), 1);
    }

    #[test]
    fn test_no_warning_at_healthy_ratio() {
        let mut s = state();
        s.player.health = 50.0;
        s.elapsed_ms = 5000.0;
        tick(&mut s, &TickInput::default(), FRAME);
        assert_eq!(count(&s.drain_events(), |e| *e == GameEvent::LowHealthWarning), 0);
    }

    #[test]
    fn test_player_death_stops_the_session() {
        let mut s = state();
        s.player.health = 0.01;
        let pos = s.player.body.pos;
        s.enemies.push(Enemy::new(pos, Archetype::Biter, 1));
        tick(&mut s, &TickInput::default(), FRAME);
        assert_eq!(s.phase, GamePhase::Ended);
        let elapsed = s.elapsed_ms;
        tick(&mut s, &TickInput::default(), FRAME);
        assert_eq!(s.elapsed_ms, elapsed);
        assert_eq!(count(&s.drain_events(), |e| matches!(e, GameEvent::GameOver { .. })), 1);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let mut a = state();
        let mut b = state();
        let input = TickInput {
            right: true,
            pointer: Some(Vec2::new(700.0, 100.0)),
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut a, &input, FRAME);
            tick(&mut b, &input, FRAME);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.player.health, b.player.health);
    }
}
