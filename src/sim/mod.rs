//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform dependencies:
//! - Variable timestep, clamped by the caller's tuning
//! - Seeded RNG only
//! - Flat entity lists, updated in insertion order
//! - Side effects reported as `GameEvent`s

pub mod body;
pub mod collision;
pub mod enemy;
pub mod particle;
pub mod player;
pub mod projectile;
pub mod spawner;
pub mod state;
pub mod tick;

pub use body::{Body, circles_overlap};
pub use collision::{resolve_player_contacts, resolve_projectile_hits};
pub use enemy::{Archetype, Enemy, EnemyStats, separation, steer_enemies};
pub use particle::{Particle, ParticleKind};
pub use player::Player;
pub use projectile::Projectile;
pub use spawner::{population_cap, spawn_interval, wave_for_elapsed};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
