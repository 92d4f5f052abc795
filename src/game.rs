//! Session lifecycle around the simulation
//!
//! `Game` owns the current `GameState`, the frame clock and the tuning a new
//! session is built from. The host calls [`Game::frame`] once per animation
//! frame and stops scheduling frames when it returns false.

use glam::Vec2;

use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Converts host timestamps (milliseconds) into clamped frame deltas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    last_ts: Option<f64>,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ts: None,
            max_dt: max_dt.max(0.0),
        }
    }

    /// Anchor the clock so the next step measures from `ts`
    pub fn reset(&mut self, ts: f64) {
        self.last_ts = Some(ts);
    }

    /// Seconds since the previous timestamp, clamped to `[0, max_dt]`.
    /// The very first step after construction yields 0.
    pub fn step(&mut self, ts: f64) -> f32 {
        let dt = match self.last_ts {
            Some(last) => ((ts - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ts = Some(ts);
        dt.clamp(0.0, self.max_dt)
    }
}

/// Top-level game: one session at a time plus its frame clock
#[derive(Debug, Clone)]
pub struct Game {
    pub state: GameState,
    pub clock: FrameClock,
    tuning: Tuning,
}

impl Game {
    /// Create a game sitting on the title screen
    pub fn new(seed: u64, viewport: Vec2, tuning: Tuning) -> Self {
        let mut state = GameState::new(seed, viewport, tuning.clone());
        state.phase = GamePhase::Home;
        Self {
            state,
            clock: FrameClock::new(tuning.max_frame_dt),
            tuning,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Leave the title screen and begin a session. Returns false if a session
    /// is already running.
    pub fn start(&mut self, seed: u64, ts: f64) -> bool {
        if self.is_running() {
            return false;
        }
        self.restart(seed, ts);
        true
    }

    /// Replace the session with a fresh one, whatever the current phase
    pub fn restart(&mut self, seed: u64, ts: f64) {
        let viewport = self.state.viewport;
        self.state = GameState::new(seed, viewport, self.tuning.clone());
        self.state.events.push(GameEvent::Restarted);
        self.clock.reset(ts);
        log::info!("Session started (seed {})", seed);
    }

    /// Stop the session and return to the title screen
    pub fn go_home(&mut self) {
        self.state.phase = GamePhase::Home;
        self.state.screen_shake = 0.0;
        self.state.flash = 0.0;
        log::info!("Returned to title screen");
    }

    /// `r` restarts only when no session is running
    pub fn handle_restart_key(&mut self, seed: u64, ts: f64) -> bool {
        if self.is_running() {
            return false;
        }
        self.restart(seed, ts);
        true
    }

    /// Advance one animation frame. Returns whether the host should schedule
    /// another frame.
    pub fn frame(&mut self, ts: f64, input: &TickInput) -> bool {
        if !self.is_running() {
            return false;
        }
        let dt = self.clock.step(ts);
        tick(&mut self.state, input, dt);
        self.is_running()
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.state.resize(viewport);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}
