//! Physics tuning
//!
//! All constants are per simulation step (pixels per step, pixels per step²).
//! The core never measures time; a host that wants a different feel ships a
//! tuning JSON instead of changing code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::TILE_SIZE;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Physics and camera constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Grid ===
    pub tile_size: f32,
    /// Far-edge inset used when mapping a box edge to a cell
    pub edge_epsilon: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Horizontal speed added per step while a direction is held
    pub acceleration: f32,
    /// Horizontal velocity multiplier applied every step
    pub friction: f32,
    pub max_speed: f32,
    /// Horizontal speeds below this snap to zero
    pub velocity_dead_zone: f32,
    /// Upward speed set by a jump (positive, applied as -y)
    pub jump_impulse: f32,
    pub gravity: f32,
    /// Cap on downward speed; kept under one tile so floors cannot be skipped
    pub max_fall_speed: f32,

    // === Enemies ===
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_speed: f32,
    pub corpse_fall_speed: f32,

    // === Interactions ===
    pub coin_size: f32,
    /// Upward speed given to the player after a stomp
    pub stomp_bounce: f32,
    /// Steps of immunity to side contact after a stomp
    pub stomp_grace_steps: u32,

    // === Camera ===
    /// Distance from the left edge of the view to the player
    pub viewport_offset: f32,
    pub camera_smoothing: f32,
    pub viewport_width: f32,
    /// Stop the camera at the level's right edge
    pub clamp_camera_right: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            edge_epsilon: 0.1,

            player_width: TILE_SIZE - 8.0,
            player_height: TILE_SIZE - 4.0,
            acceleration: 0.5,
            friction: 0.8,
            max_speed: 5.0,
            velocity_dead_zone: 0.1,
            jump_impulse: 10.0,
            gravity: 0.5,
            max_fall_speed: 20.0,

            enemy_width: TILE_SIZE,
            enemy_height: TILE_SIZE,
            enemy_speed: 1.5,
            corpse_fall_speed: 4.0,

            coin_size: TILE_SIZE,
            stomp_bounce: 5.0,
            stomp_grace_steps: 8,

            viewport_offset: 300.0,
            camera_smoothing: 0.1,
            viewport_width: 800.0,
            clamp_camera_right: false,
        }
    }
}

impl Tuning {
    /// Parse a tuning file. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break collision or integration
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("tile_size", self.tile_size),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
            ("coin_size", self.coin_size),
            ("max_fall_speed", self.max_fall_speed),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("edge_epsilon", self.edge_epsilon),
            ("acceleration", self.acceleration),
            ("max_speed", self.max_speed),
            ("velocity_dead_zone", self.velocity_dead_zone),
            ("jump_impulse", self.jump_impulse),
            ("gravity", self.gravity),
            ("enemy_speed", self.enemy_speed),
            ("corpse_fall_speed", self.corpse_fall_speed),
            ("stomp_bounce", self.stomp_bounce),
            ("viewport_offset", self.viewport_offset),
            ("viewport_width", self.viewport_width),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::Invalid(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(TuningError::Invalid(format!(
                "friction must be in (0, 1], got {}",
                self.friction
            )));
        }
        if !(self.camera_smoothing > 0.0 && self.camera_smoothing <= 1.0) {
            return Err(TuningError::Invalid(format!(
                "camera_smoothing must be in (0, 1], got {}",
                self.camera_smoothing
            )));
        }
        // The resolvers only look one cell past the leading edge
        let per_step = [
            ("max_fall_speed", self.max_fall_speed),
            ("max_speed", self.max_speed),
            ("enemy_speed", self.enemy_speed),
            ("jump_impulse", self.jump_impulse),
            ("stomp_bounce", self.stomp_bounce),
        ];
        for (name, value) in per_step {
            if value >= self.tile_size {
                return Err(TuningError::Invalid(format!(
                    "{name} ({value}) must stay below tile_size ({})",
                    self.tile_size
                )));
            }
        }
        if self.edge_epsilon >= self.player_width.min(self.enemy_width) {
            return Err(TuningError::Invalid(
                "edge_epsilon must be smaller than every actor".to_string(),
            ));
        }
        Ok(())
    }
}
