//! Vertex layout and palette for flat-colored quads

use bytemuck::{Pod, Zeroable};

/// Linear RGB color
pub type Rgb = [f32; 3];

/// Play-field pixel position (top-left origin, y down) with an RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub const fn opaque(x: f32, y: f32, color: Rgb) -> Self {
        Self {
            position: [x, y],
            color: [color[0], color[1], color[2], 1.0],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for game elements
pub mod colors {
    use super::Rgb;

    pub const PADDLE: Rgb = [0.2, 0.6, 1.0];
    pub const BALL: Rgb = [1.0, 0.8, 0.2];
    pub const BRICK: Rgb = [0.3, 0.9, 0.4];
    pub const BRICK_SOLID: Rgb = [0.55, 0.55, 0.6];
    pub const BACKGROUND: wgpu::Color = wgpu::Color {
        r: 0.1,
        g: 0.1,
        b: 0.15,
        a: 1.0,
    };
}
