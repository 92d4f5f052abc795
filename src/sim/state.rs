//! Game state and core simulation types
//!
//! One `GameState` is one session: it is created when a run starts and
//! replaced wholesale on restart.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::enemy::{Archetype, Enemy};
use super::particle::Particle;
use super::player::Player;
use super::projectile::Projectile;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Home,
    /// Active gameplay
    Running,
    /// Player health reached zero
    Ended,
}

/// Discrete things that happened during a tick, consumed by audio, HUD and logging
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ShotFired { pos: Vec2, hue: u32 },
    EnemySpawned { archetype: Archetype, audible: bool },
    EnemyHit { pos: Vec2 },
    EnemyKilled { archetype: Archetype, pos: Vec2, bounty: u64 },
    PlayerDamaged { amount: f32, audible: bool },
    LowHealthWarning,
    WaveAdvanced { wave: u32 },
    GameOver { score: u64, wave: u32 },
    Restarted,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the session RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Playfield size in logical (CSS) pixels
    pub viewport: Vec2,
    pub phase: GamePhase,
    pub score: u64,
    /// Difficulty tier, derived from `elapsed_ms`
    pub wave: u32,
    /// Simulated time since the session started
    pub elapsed_ms: f64,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Seconds accumulated toward the next spawn
    pub spawn_accumulator: f32,
    /// Screen shake intensity in pixels
    pub screen_shake: f32,
    /// White flash overlay alpha
    pub flash: f32,
    pub last_low_health_warning_ms: f64,
    /// Rotating hue for projectiles and their hit sparks
    pub projectile_hue_seed: u32,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a running session with the player centered in the viewport
    pub fn new(seed: u64, viewport: Vec2, tuning: Tuning) -> Self {
        let player = Player::new(viewport * 0.5, &tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            viewport,
            phase: GamePhase::Running,
            score: 0,
            wave: 1,
            elapsed_ms: 0.0,
            player,
            projectiles: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            spawn_accumulator: 0.0,
            screen_shake: 0.0,
            flash: 0.0,
            last_low_health_warning_ms: 0.0,
            projectile_hue_seed: 0,
            events: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Update the playfield size (window resize)
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport.max(Vec2::ONE);
    }

    pub fn add_screen_shake(&mut self, intensity: f32) {
        self.screen_shake = self.screen_shake.max(intensity);
    }

    pub fn add_flash(&mut self, intensity: f32) {
        self.flash = self.flash.max(intensity);
    }

    /// Transition to `Ended` the first time it is called while running
    pub fn end_game(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.phase = GamePhase::Ended;
        log::info!(
            "Game over: score {} at wave {} after {:.1}s",
            self.score,
            self.wave,
            self.elapsed_ms / 1000.0
        );
        self.events.push(GameEvent::GameOver {
            score: self.score,
            wave: self.wave,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let state = GameState::new(1, Vec2::new(800.0, 600.0), Tuning::default());
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.wave, 1);
        assert_eq!(state.player.body.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.player.health, state.player.max_health);
        assert!(state.enemies.is_empty() && state.projectiles.is_empty());
    }

    #[test]
    fn test_end_game_only_once() {
        let mut state = GameState::new(1, Vec2::new(800.0, 600.0), Tuning::default());
        state.end_game();
        state.end_game();
        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        assert_eq!(state.phase, GamePhase::Ended);
    }

    #[test]
    fn test_effects_take_max() {
        let mut state = GameState::new(1, Vec2::new(800.0, 600.0), Tuning::default());
        state.add_screen_shake(15.0);
        state.add_screen_shake(5.0);
        assert_eq!(state.screen_shake, 15.0);
        state.add_flash(0.4);
        state.add_flash(0.1);
        assert_eq!(state.flash, 0.4);
    }
}
