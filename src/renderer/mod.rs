//! WebGPU rendering module
//!
//! Reads the game state and draws every visible entity as a flat-colored
//! rectangle. Nothing here mutates simulation state.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use shapes::{QuadBatch, RectSink, draw_scene};
pub use vertex::{Rgb, Vertex};
