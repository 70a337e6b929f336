//! Smoothed follow camera

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Top-left corner of the viewport in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
}

impl Camera {
    /// Camera already centered on `target`
    pub fn centered_on(target: Vec2, viewport: Vec2) -> Self {
        Self {
            pos: target - viewport / 2.0,
        }
    }

    /// Ease toward centering `target` in the viewport
    pub fn follow(&mut self, target: Vec2, viewport: Vec2, smoothing: f32) {
        let goal = target - viewport / 2.0;
        self.pos += (goal - self.pos) * smoothing;
    }
}
