//! Platform abstraction layer
//!
//! Turns raw browser input into the per-frame commands the simulation reads.

pub mod input;

pub use input::{InputState, Key};
