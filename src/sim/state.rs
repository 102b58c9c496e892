//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`GameState`]; the presentation layer
//! only ever reads it through [`GameState::snapshot`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{circles_overlap, rect_overlaps_square};
use crate::Rgba;
use crate::consts::*;
use crate::error::{TransitionError, TuningError};
use crate::time_scale;
use crate::tuning::Tuning;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// A visible ball touched a brick
    Brick,
    /// The ball touched a screen edge
    Boundary,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulates
    Start,
    /// Active gameplay
    Playing,
    /// Run ended; frozen until restart
    GameOver(GameOverCause),
}

/// Something that happened during the last tick (for sound/effects)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    BrickSpawned { id: u32 },
    PowerUpSpawned { id: u32, kind: PowerUpKind },
    /// Brick fell past the despawn line and scored
    BrickCleared { id: u32 },
    PowerUpCollected { id: u32, kind: PowerUpKind },
    LevelUp { level: u32 },
    GameOver { cause: GameOverCause },
}

/// The player's ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Per-frame velocity
    pub vel: Vec2,
    pub radius: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub move_speed: f32,
    pub color: Rgba,
    pub invisible: bool,
    /// Remaining invisibility in 60 Hz frames
    pub invisible_timer: f32,
}

impl Ball {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            gravity: BALL_GRAVITY,
            jump_impulse: BALL_JUMP_IMPULSE,
            move_speed: BALL_MOVE_SPEED,
            color: BALL_PALETTE[0],
            invisible: false,
            invisible_timer: 0.0,
        }
    }

    /// Advance one frame.
    ///
    /// Velocities are per nominal frame, so only the invisibility countdown
    /// depends on `dt`. Slow motion scales both gravity and displacement.
    pub fn update(&mut self, dt: f32, slowmo: bool) {
        let scale = time_scale(slowmo);

        self.vel.y += self.gravity * scale;
        self.pos += self.vel * scale;

        self.vel.x *= BALL_FRICTION;

        if self.invisible_timer > 0.0 {
            self.invisible_timer -= FRAME_RATE * dt;
            if self.invisible_timer <= 0.0 {
                self.invisible = false;
            }
        }

        if self.pos.x < self.radius {
            self.pos.x = self.radius;
            self.vel.x = 0.0;
        } else if self.pos.x > SCREEN_WIDTH - self.radius {
            self.pos.x = SCREEN_WIDTH - self.radius;
            self.vel.x = 0.0;
        }

        // Top edge only clamps; velocity away from it is kept
        if self.pos.y > SCREEN_HEIGHT - self.radius {
            self.pos.y = SCREEN_HEIGHT - self.radius;
            self.vel.y = self.vel.y.min(0.0);
        }
    }

    pub fn jump(&mut self) {
        self.vel.y = self.jump_impulse;
    }

    pub fn move_left(&mut self) {
        self.vel.x = -self.move_speed;
    }

    pub fn move_right(&mut self) {
        self.vel.x = self.move_speed;
    }

    pub fn move_down(&mut self) {
        self.vel.y = self.move_speed;
    }

    /// Pick a new color from the ball palette
    pub fn change_color<R: Rng>(&mut self, rng: &mut R) {
        self.color = BALL_PALETTE[rng.random_range(0..BALL_PALETTE.len())];
    }

    /// Become invisible for `duration` 60 Hz frames
    pub fn make_invisible(&mut self, duration: f32) {
        self.invisible = true;
        self.invisible_timer = duration;
    }

    /// Render alpha (faded while invisible)
    pub fn alpha(&self) -> f32 {
        if self.invisible { INVISIBLE_ALPHA } else { 1.0 }
    }
}

/// A falling brick. `pos` is the bottom-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Fall speed in units per 60 Hz frame
    pub speed: f32,
    pub color: Rgba,
}

impl Brick {
    pub fn new(id: u32, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos,
            size: Vec2::new(BRICK_WIDTH, BRICK_HEIGHT),
            speed,
            color: BRICK_COLOR,
        }
    }

    pub fn update(&mut self, dt: f32, slowmo: bool) {
        self.pos.y -= self.speed * time_scale(slowmo) * FRAME_RATE * dt;
    }

    /// Lethal contact test; an invisible ball passes through
    pub fn collides_with(&self, ball: &Ball) -> bool {
        if ball.invisible {
            return false;
        }
        rect_overlaps_square(self.pos, self.size, ball.pos, ball.radius)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Invisible,
    SlowMo,
}

impl PowerUpKind {
    pub fn color(self) -> Rgba {
        match self {
            PowerUpKind::Invisible => [0.5, 0.0, 0.5, 1.0],
            PowerUpKind::SlowMo => [0.0, 1.0, 1.0, 1.0],
        }
    }

    /// Either kind with equal probability
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            PowerUpKind::Invisible
        } else {
            PowerUpKind::SlowMo
        }
    }
}

/// A falling collectible. `pos` is the center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
}

impl PowerUp {
    pub fn new(id: u32, kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            radius: POWERUP_RADIUS,
            speed: POWERUP_SPEED,
        }
    }

    pub fn color(&self) -> Rgba {
        self.kind.color()
    }

    pub fn update(&mut self, dt: f32, slowmo: bool) {
        self.pos.y -= self.speed * time_scale(slowmo) * FRAME_RATE * dt;
    }

    /// Pickup test; works regardless of invisibility
    pub fn collides_with(&self, ball: &Ball) -> bool {
        circles_overlap(self.pos, self.radius, ball.pos, ball.radius)
    }
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub level: u32,
    pub status: String,
    pub invisible: bool,
    pub slowmo: bool,
    pub background: Rgba,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    pub powerups: Vec<PowerUp>,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Balance knobs, kept across restarts. Validated on entry; see [`GameState::with_rng`]
    pub tuning: Tuning,
    /// Random source for spawns and colors
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    pub powerups: Vec<PowerUp>,
    pub score: u32,
    /// Always `tuning.level_for_score(score)` after a tick
    pub level: u32,
    /// Seconds since the last brick spawn
    pub brick_spawn_timer: f32,
    /// Seconds since the last power-up roll
    pub powerup_spawn_timer: f32,
    /// Remaining slow motion in 60 Hz frames
    pub slowmo_timer: f32,
    /// Background color hint, changes on level up
    pub background: Rgba,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a session on the start screen with a seeded RNG
    pub fn new(seed: u64) -> Self {
        Self::from_parts(Pcg32::seed_from_u64(seed), Tuning::default())
    }

    /// Create a session with an injected RNG and tuning.
    ///
    /// The tuning is validated here since it is the only way one enters a session.
    pub fn with_rng(rng: Pcg32, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::from_parts(rng, tuning))
    }

    fn from_parts(rng: Pcg32, tuning: Tuning) -> Self {
        Self {
            level: tuning.level_for_score(0),
            tuning,
            rng,
            phase: GamePhase::Start,
            ball: Ball::new(Vec2::new(BALL_START_X, BALL_START_Y)),
            bricks: Vec::new(),
            powerups: Vec::new(),
            score: 0,
            brick_spawn_timer: 0.0,
            powerup_spawn_timer: 0.0,
            slowmo_timer: 0.0,
            background: BACKGROUND_PALETTE[0],
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Reset every session field to its default. Tuning and RNG stream carry over.
    fn reset(&mut self) {
        self.ball = Ball::new(Vec2::new(BALL_START_X, BALL_START_Y));
        self.bricks.clear();
        self.powerups.clear();
        self.score = 0;
        self.level = self.tuning.level_for_score(0);
        self.brick_spawn_timer = 0.0;
        self.powerup_spawn_timer = 0.0;
        self.slowmo_timer = 0.0;
        self.background = BACKGROUND_PALETTE[0];
        self.events.clear();
        self.next_id = 1;
    }

    /// Leave the start screen and begin a fresh run
    pub fn start(&mut self) -> Result<(), TransitionError> {
        if self.phase != GamePhase::Start {
            return Err(TransitionError {
                from: self.phase,
                action: "start",
            });
        }
        self.reset();
        self.phase = GamePhase::Playing;
        log::info!("Game started");
        Ok(())
    }

    /// Begin a fresh run after game over
    pub fn restart(&mut self) -> Result<(), TransitionError> {
        if !matches!(self.phase, GamePhase::GameOver(_)) {
            return Err(TransitionError {
                from: self.phase,
                action: "restart",
            });
        }
        self.reset();
        self.phase = GamePhase::Playing;
        log::info!("Game restarted");
        Ok(())
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn slowmo_active(&self) -> bool {
        self.slowmo_timer > 0.0
    }

    /// HUD status line for active effects
    pub fn status_text(&self) -> String {
        let mut status = String::new();
        if self.ball.invisible {
            status.push_str("INVISIBLE! ");
        }
        if self.slowmo_active() {
            status.push_str("SLOW MOTION! ");
        }
        status
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            level: self.level,
            status: self.status_text(),
            invisible: self.ball.invisible,
            slowmo: self.slowmo_active(),
            background: self.background,
            ball: self.ball.clone(),
            bricks: self.bricks.clone(),
            powerups: self.powerups.clone(),
        }
    }
}
