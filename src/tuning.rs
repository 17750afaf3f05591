//! Gameplay tuning
//!
//! Every constant the simulation and frame driver read. Loaded from JSON
//! (missing keys fall back to [`crate::consts`]) and validated once up front
//! so the per-frame code never has to.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Tuning load/validation failures
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Data-driven gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between the paddle's top edge and the bottom of the field
    pub paddle_bottom_margin: f32,
    /// Horizontal speed (pixels/second)
    pub paddle_speed: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Velocity given to the ball whenever it is (re)attached to the paddle
    pub ball_launch_velocity: [f32; 2],
    /// x-velocity after a hit on the paddle's outermost edge
    pub steering_speed: f32,

    // === Bricks ===
    pub brick_rows: u32,
    pub brick_cols: u32,
    pub brick_height: f32,
    /// y of the first brick row
    pub brick_top: f32,
    /// Space left between neighbouring bricks
    pub brick_gap: f32,

    // === Frame driver ===
    /// Largest dt handed to the simulation (frame hitches are clamped to this)
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_bottom_margin: PADDLE_BOTTOM_MARGIN,
            paddle_speed: PADDLE_SPEED,

            ball_radius: BALL_RADIUS,
            ball_launch_velocity: [BALL_LAUNCH_VX, BALL_LAUNCH_VY],
            steering_speed: STEERING_SPEED,

            brick_rows: BRICK_ROWS,
            brick_cols: BRICK_COLS,
            brick_height: BRICK_HEIGHT,
            brick_top: BRICK_TOP,
            brick_gap: BRICK_GAP,

            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a template file)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive finite number",
                })
            }
        }

        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        positive("paddle_width", self.paddle_width)?;
        positive("paddle_height", self.paddle_height)?;
        positive("paddle_speed", self.paddle_speed)?;
        positive("ball_radius", self.ball_radius)?;
        positive("steering_speed", self.steering_speed)?;
        positive("brick_height", self.brick_height)?;
        positive("max_frame_dt", self.max_frame_dt)?;

        if self.paddle_width > self.field_width {
            return Err(TuningError::Invalid {
                field: "paddle_width",
                reason: "paddle is wider than the play field",
            });
        }
        if !(self.paddle_bottom_margin >= self.paddle_height
            && self.paddle_bottom_margin < self.field_height)
        {
            return Err(TuningError::Invalid {
                field: "paddle_bottom_margin",
                reason: "paddle must sit fully inside the play field",
            });
        }
        if !(self.brick_gap >= 0.0 && self.brick_gap < self.brick_height) {
            return Err(TuningError::Invalid {
                field: "brick_gap",
                reason: "gap must be non-negative and smaller than the brick height",
            });
        }
        if self.brick_rows == 0 {
            return Err(TuningError::Invalid {
                field: "brick_rows",
                reason: "default grid needs at least one row",
            });
        }
        if self.brick_cols == 0 {
            return Err(TuningError::Invalid {
                field: "brick_cols",
                reason: "default grid needs at least one column",
            });
        }
        if self.ball_launch_velocity.iter().any(|v| !v.is_finite()) {
            return Err(TuningError::Invalid {
                field: "ball_launch_velocity",
                reason: "must be finite",
            });
        }

        Ok(())
    }

    #[inline]
    pub fn field_size(&self) -> Vec2 {
        Vec2::new(self.field_width, self.field_height)
    }

    #[inline]
    pub fn paddle_size(&self) -> Vec2 {
        Vec2::new(self.paddle_width, self.paddle_height)
    }

    #[inline]
    pub fn launch_velocity(&self) -> Vec2 {
        Vec2::from_array(self.ball_launch_velocity)
    }

    /// Paddle position at level start: centered, `paddle_bottom_margin` above the floor
    pub fn paddle_start(&self) -> Vec2 {
        Vec2::new(
            (self.field_width - self.paddle_width) / 2.0,
            self.field_height - self.paddle_bottom_margin,
        )
    }
}
