//! Data-driven game balance
//!
//! Every knob that shapes difficulty lives here. Geometry stays in
//! [`crate::consts`]. Missing keys in a JSON document fall back to
//! [`Tuning::default`], so a file can override just the values being tuned.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Brick spawning ===
    /// Seconds between bricks at score 0
    pub brick_interval_base: f32,
    /// Interval reduction per `brick_interval_score_step` points
    pub brick_interval_step: f32,
    pub brick_interval_score_step: u32,
    /// Hard mode floor for the spawn interval (seconds)
    pub brick_interval_min: f32,

    // === Brick speed (units per 60 Hz frame) ===
    pub brick_speed_base: f32,
    /// Added per difficulty level
    pub brick_speed_step: f32,

    // === Hard mode ===
    /// Score at which spawn interval halves and brick speed is multiplied
    pub hard_mode_score: u32,
    pub hard_mode_speed_factor: f32,

    // === Power-ups ===
    /// Seconds between spawn rolls
    pub powerup_interval: f32,
    /// Chance that a roll spawns a power-up
    pub powerup_chance: f64,
    /// Effect length in 60 Hz frames
    pub effect_duration: f32,

    // === Scoring ===
    /// Points per brick that falls past the despawn line
    pub brick_score: u32,
    /// Points per difficulty level
    pub level_score_step: u32,

    /// Entities below this y are removed
    pub despawn_y: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            brick_interval_base: 1.0,
            brick_interval_step: 0.1,
            brick_interval_score_step: 50,
            brick_interval_min: 0.2,

            brick_speed_base: 2.0,
            brick_speed_step: 0.5,

            hard_mode_score: 200,
            hard_mode_speed_factor: 1.5,

            powerup_interval: 5.0,
            powerup_chance: 0.3,
            effect_duration: 300.0,

            brick_score: 10,
            level_score_step: 100,

            despawn_y: -50.0,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a JSON tuning document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }

        fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be zero or greater",
                })
            }
        }

        positive("brick_interval_base", self.brick_interval_base)?;
        positive("brick_interval_min", self.brick_interval_min)?;
        positive("brick_speed_base", self.brick_speed_base)?;
        positive("powerup_interval", self.powerup_interval)?;
        positive("effect_duration", self.effect_duration)?;

        // Bricks must never get slower or rarer as the score climbs
        non_negative("brick_interval_step", self.brick_interval_step)?;
        non_negative("brick_speed_step", self.brick_speed_step)?;
        if !(self.hard_mode_speed_factor.is_finite() && self.hard_mode_speed_factor >= 1.0) {
            return Err(TuningError::Invalid {
                field: "hard_mode_speed_factor",
                reason: "must be at least 1",
            });
        }

        if self.brick_interval_score_step == 0 {
            return Err(TuningError::Invalid {
                field: "brick_interval_score_step",
                reason: "must be non-zero",
            });
        }
        if self.level_score_step == 0 {
            return Err(TuningError::Invalid {
                field: "level_score_step",
                reason: "must be non-zero",
            });
        }
        if !(0.0..=1.0).contains(&self.powerup_chance) {
            return Err(TuningError::Invalid {
                field: "powerup_chance",
                reason: "must be within [0, 1]",
            });
        }
        Ok(())
    }

    /// Difficulty level for a score, starting at 1
    pub fn level_for_score(&self, score: u32) -> u32 {
        1 + score / self.level_score_step
    }

    fn hard_mode(&self, score: u32) -> bool {
        score >= self.hard_mode_score
    }

    /// Seconds between brick spawns at the given score
    pub fn brick_spawn_interval(&self, score: u32) -> f32 {
        let steps = (score / self.brick_interval_score_step) as f32;
        let interval = self.brick_interval_base - steps * self.brick_interval_step;
        if self.hard_mode(score) {
            (interval / 2.0).max(self.brick_interval_min)
        } else {
            interval
        }
    }

    /// Fall speed of a brick spawned at the given score
    pub fn brick_speed(&self, score: u32) -> f32 {
        let levels = (score / self.level_score_step) as f32;
        let speed = self.brick_speed_base + levels * self.brick_speed_step;
        if self.hard_mode(score) {
            speed * self.hard_mode_speed_factor
        } else {
            speed
        }
    }
}
