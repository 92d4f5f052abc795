//! Held-key and pointer tracking

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Shift,
    R,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value, case-insensitively
    pub fn from_dom(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "w" => Some(Key::W),
            "a" => Some(Key::A),
            "s" => Some(Key::S),
            "d" => Some(Key::D),
            "shift" => Some(Key::Shift),
            "r" => Some(Key::R),
            _ => None,
        }
    }
}

/// Live input state, mutated by event handlers and sampled once per frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    /// Pointer position relative to the canvas, in CSS pixels
    pub pointer: Option<Vec2>,
    pub pointer_down: bool,
}

impl InputState {
    pub fn key_down(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn set_pointer(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
    }

    /// CSS class for the crosshair element
    pub fn crosshair_class(&self) -> &'static str {
        if self.pointer_down { "pressed" } else { "" }
    }

    /// Drop every held key (window lost focus)
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pointer_down = false;
    }

    /// Snapshot for the next simulation tick
    pub fn to_tick_input(&self) -> TickInput {
        TickInput {
            up: self.is_held(Key::W),
            down: self.is_held(Key::S),
            left: self.is_held(Key::A),
            right: self.is_held(Key::D),
            sprint: self.is_held(Key::Shift),
            pointer: self.pointer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_keys() {
        assert_eq!(Key::from_dom("W"), Some(Key::W));
        assert_eq!(Key::from_dom("d"), Some(Key::D));
        assert_eq!(Key::from_dom("Shift"), Some(Key::Shift));
        assert_eq!(Key::from_dom("R"), Some(Key::R));
        assert_eq!(Key::from_dom("ArrowUp"), None);
    }

    #[test]
    fn test_held_keys_map_to_tick_input() {
        let mut input = InputState::default();
        input.key_down(Key::W);
        input.key_down(Key::D);
        input.key_down(Key::Shift);
        input.set_pointer(Vec2::new(10.0, 20.0));

        let tick = input.to_tick_input();
        assert!(tick.up && tick.right && tick.sprint);
        assert!(!tick.down && !tick.left);
        assert_eq!(tick.pointer, Some(Vec2::new(10.0, 20.0)));

        input.key_up(Key::W);
        assert!(!input.to_tick_input().up);
    }

    #[test]
    fn test_release_all() {
        let mut input = InputState::default();
        input.key_down(Key::A);
        input.pointer_down = true;
        input.release_all();
        assert_eq!(input.to_tick_input().move_axis(), Vec2::ZERO);
        assert!(!input.pointer_down);
        assert_eq!(input.crosshair_class(), "");
    }

    #[test]
    fn test_crosshair_follows_pointer_button() {
        let mut input = InputState::default();
        assert_eq!(input.crosshair_class(), "");
        input.pointer_down = true;
        assert_eq!(input.crosshair_class(), "pressed");
    }
}
