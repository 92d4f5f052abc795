//! HUD model
//!
//! Text and sizes for the DOM overlay, derived from the simulation each
//! frame. The host only writes to the DOM when a value actually changes.

use crate::sim::{GamePhase, GameState};

/// Which top-level page is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Game,
}

/// Everything the HUD displays
#[derive(Debug, Clone, PartialEq)]
pub struct HudState {
    pub page: Page,
    pub score_text: String,
    pub wave_text: String,
    /// Health bar width in percent, 0-100
    pub health_percent: f32,
    pub overlay_visible: bool,
    pub final_score_text: String,
}

impl HudState {
    pub fn from_state(state: &GameState) -> Self {
        let page = match state.phase {
            GamePhase::Home => Page::Home,
            GamePhase::Running | GamePhase::Ended => Page::Game,
        };
        Self {
            page,
            score_text: format!("Score: {}", state.score),
            wave_text: format!("Wave {}", state.wave),
            health_percent: state.player.health_ratio() * 100.0,
            overlay_visible: state.phase == GamePhase::Ended,
            final_score_text: format!("Score: {}", state.score),
        }
    }

    /// CSS width value for the health bar
    pub fn health_width_css(&self) -> String {
        format!("{:.1}%", self.health_percent)
    }
}

/// Fields that differ between two HUD snapshots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudChanges {
    pub page: bool,
    pub score: bool,
    pub wave: bool,
    pub health: bool,
    pub overlay: bool,
}

impl HudChanges {
    pub fn any(&self) -> bool {
        self.page || self.score || self.wave || self.health || self.overlay
    }
}

/// Remembers the last HUD written so unchanged fields are skipped
#[derive(Debug, Clone, Default)]
pub struct HudTracker {
    last: Option<HudState>,
}

impl HudTracker {
    /// Record `next` and report which fields changed. The first call reports
    /// everything as changed.
    pub fn update(&mut self, next: &HudState) -> HudChanges {
        let changes = match &self.last {
            None => HudChanges {
                page: true,
                score: true,
                wave: true,
                health: true,
                overlay: true,
            },
            Some(prev) => HudChanges {
                page: prev.page != next.page,
                score: prev.score_text != next.score_text,
                wave: prev.wave_text != next.wave_text,
                health: (prev.health_percent - next.health_percent).abs() >= 0.1,
                overlay: prev.overlay_visible != next.overlay_visible
                    || prev.final_score_text != next.final_score_text,
            },
        };
        if changes.any() {
            self.last = Some(next.clone());
        }
        changes
    }

    /// Forget the last snapshot so the next update rewrites everything
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new(3, Vec2::new(800.0, 600.0), Tuning::default())
    }

    #[test]
    fn test_hud_text() {
        let mut s = state();
        s.score = 120;
        s.wave = 3;
        s.player.health = 45.0;
        let hud = HudState::from_state(&s);
        assert_eq!(hud.score_text, "Score: 120");
        assert_eq!(hud.wave_text, "Wave 3");
        assert_eq!(hud.health_width_css(), "45.0%");
        assert_eq!(hud.page, Page::Game);
        assert!(!hud.overlay_visible);
    }

    #[test]
    fn test_overlay_on_game_over() {
        let mut s = state();
        s.score = 77;
        s.end_game();
        let hud = HudState::from_state(&s);
        assert!(hud.overlay_visible);
        assert_eq!(hud.final_score_text, "Score: 77");
    }

    #[test]
    fn test_home_page() {
        let mut s = state();
        s.phase = GamePhase::Home;
        assert_eq!(HudState::from_state(&s).page, Page::Home);
    }

    #[test]
    fn test_tracker_reports_only_changes() {
        let mut s = state();
        let mut tracker = HudTracker::default();
        assert!(tracker.update(&HudState::from_state(&s)).any());
        assert!(!tracker.update(&HudState::from_state(&s)).any());

        s.score = 10;
        let changes = tracker.update(&HudState::from_state(&s));
        assert!(changes.score && !changes.wave && !changes.health);

        tracker.invalidate();
        assert!(tracker.update(&HudState::from_state(&s)).wave);
    }

    #[test]
    fn test_tiny_health_drift_ignored() {
        let mut s = state();
        let mut tracker = HudTracker::default();
        tracker.update(&HudState::from_state(&s));
        s.player.health -= 0.04;
        assert!(!tracker.update(&HudState::from_state(&s)).health);
        s.player.health -= 0.2;
        assert!(tracker.update(&HudState::from_state(&s)).health);
    }
}
