//! Mini Breakout - paddle, ball and a grid of bricks
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, entity state)
//! - `game`: Platform-independent frame driver (dt clamping, resets, autopilot)
//! - `renderer`: WebGPU rendering of the entity state
//! - `tuning`: Data-driven gameplay constants

pub mod game;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use game::{Autopilot, FrameReport, FrameStatus, Game};
pub use tuning::{Tuning, TuningError};

/// Default gameplay constants (pixels, seconds)
pub mod consts {
    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Distance from the paddle's top edge to the bottom of the field
    pub const PADDLE_BOTTOM_MARGIN: f32 = 40.0;
    pub const PADDLE_SPEED: f32 = 500.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_LAUNCH_VX: f32 = 250.0;
    pub const BALL_LAUNCH_VY: f32 = -250.0;
    /// Horizontal speed given to a ball hitting the paddle's outermost edge
    pub const STEERING_SPEED: f32 = 300.0;

    /// Brick grid defaults
    pub const BRICK_ROWS: u32 = 5;
    pub const BRICK_COLS: u32 = 10;
    pub const BRICK_HEIGHT: f32 = 25.0;
    pub const BRICK_TOP: f32 = 50.0;
    pub const BRICK_GAP: f32 = 4.0;

    /// Longest frame the driver will simulate in one step
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Frame time used by the headless driver
    pub const HEADLESS_DT: f32 = 1.0 / 60.0;
}
