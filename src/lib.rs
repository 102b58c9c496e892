//! Tap Ball - dodge falling bricks, collect power-ups
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `platform`: Input decoding for the presentation layer
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use error::{TransitionError, TuningError};
pub use tuning::Tuning;

/// RGBA color, components in [0, 1]
pub type Rgba = [f32; 4];

/// Game configuration constants
///
/// Screen space has its origin at the bottom-left corner; y grows toward the top edge.
pub mod consts {
    use super::Rgba;

    /// Nominal frame rate the per-frame constants are expressed in
    pub const FRAME_RATE: f32 = 60.0;
    /// Fixed frame delta for the 60 Hz driver
    pub const FRAME_DT: f32 = 1.0 / FRAME_RATE;

    /// Fraction of normal speed while slow motion is active
    pub const SLOWMO_FACTOR: f32 = 0.3;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 400.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Ball defaults (per-frame units)
    pub const BALL_RADIUS: f32 = 15.0;
    pub const BALL_START_X: f32 = 200.0;
    pub const BALL_START_Y: f32 = 300.0;
    pub const BALL_GRAVITY: f32 = 0.4;
    pub const BALL_JUMP_IMPULSE: f32 = -12.0;
    pub const BALL_MOVE_SPEED: f32 = 6.0;
    /// Horizontal velocity kept each frame
    pub const BALL_FRICTION: f32 = 0.85;
    /// Render alpha while invisible
    pub const INVISIBLE_ALPHA: f32 = 0.3;

    /// Brick defaults
    pub const BRICK_WIDTH: f32 = 60.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_COLOR: Rgba = [0.55, 0.27, 0.07, 1.0];

    /// Power-up defaults
    pub const POWERUP_RADIUS: f32 = 10.0;
    pub const POWERUP_SPEED: f32 = 2.0;
    /// Horizontal inset of the power-up spawn range
    pub const POWERUP_SPAWN_MARGIN: f32 = 20.0;

    /// Entities enter just above the top edge
    pub const SPAWN_Y: f32 = 620.0;

    pub const BALL_PALETTE: [Rgba; 7] = [
        [1.0, 0.0, 0.0, 1.0],
        [0.0, 1.0, 0.0, 1.0],
        [0.0, 0.0, 1.0, 1.0],
        [1.0, 1.0, 0.0, 1.0],
        [1.0, 0.0, 1.0, 1.0],
        [1.0, 0.5, 0.0, 1.0],
        [0.0, 1.0, 1.0, 1.0],
    ];

    pub const BACKGROUND_PALETTE: [Rgba; 5] = [
        [0.53, 0.81, 0.92, 1.0],
        [1.0, 0.71, 0.76, 1.0],
        [0.6, 0.98, 0.6, 1.0],
        [1.0, 0.85, 0.73, 1.0],
        [0.87, 0.63, 0.87, 1.0],
    ];
}

/// Scale factor applied to per-frame quantities while slow motion is active
#[inline]
pub fn time_scale(slowmo: bool) -> f32 {
    if slowmo { consts::SLOWMO_FACTOR } else { 1.0 }
}
