//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
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

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.043, 0.059, 0.078, 1.0];
    pub const PLAYER: [f32; 4] = [0.9, 0.91, 0.92, 1.0];
    pub const PLAYER_CORE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const PLAYER_BARREL: [f32; 4] = [0.82, 0.84, 0.86, 1.0];
    pub const ENEMY_SHADE: [f32; 4] = [0.067, 0.094, 0.153, 1.0];
    pub const HEALTH_OK: [f32; 4] = [0.2, 0.83, 0.6, 1.0];
    pub const HEALTH_LOW: [f32; 4] = [0.97, 0.44, 0.44, 1.0];
    pub const FLASH: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}
