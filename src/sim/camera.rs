//! Horizontal follow camera

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Horizontal scroll offset in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
}

impl Camera {
    /// Ease toward keeping the player `viewport_offset` pixels from the left edge.
    ///
    /// Clamps run after the eased update: never below 0, and optionally never past
    /// the point where the level's right edge meets the viewport's.
    pub fn follow(&mut self, player_x: f32, level_width: f32, tuning: &Tuning) {
        let target = player_x - tuning.viewport_offset;
        self.x += (target - self.x) * tuning.camera_smoothing;
        if tuning.clamp_camera_right {
            self.x = self.x.min(level_width - tuning.viewport_width);
        }
        self.x = self.x.max(0.0);
    }
}
