//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - No randomness and no global state
//! - Stable iteration order (bricks scanned in storage order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{Aabb, aabb_circle_overlap, aabb_overlap};
pub use input::{Key, KeyInput, KeyState};
pub use level::{Cell, LevelError, LevelLayout};
pub use state::{Ball, Body, GameState};
pub use tick::{TickReport, tick};
