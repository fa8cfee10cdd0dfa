//! Vertex types for the flattened scene

use bytemuck::{Pod, Zeroable};

/// Screen-space vertex (NDC position) with color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Fixed colors for decorations the scene graph does not carry
pub mod colors {
    pub const GLYPH: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
    /// Multiplier for faces turned away from the light
    pub const SHADE: f32 = 0.7;
    pub const MODEL_EYES: [f32; 4] = [0.1, 0.9, 1.0, 1.0];
}
