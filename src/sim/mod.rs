//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - One `tick` per frame, no hidden clocks
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Edge, boundary_contact, circles_overlap, rect_overlaps_square};
pub use state::{
    Ball, Brick, GameEvent, GameOverCause, GamePhase, GameState, PowerUp, PowerUpKind, Snapshot,
};
pub use tick::{TickInput, tick};
