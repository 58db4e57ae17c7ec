//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
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
}

/// Raw bytes for a vertex buffer upload
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Colors for game elements
pub mod colors {
    const fn hex(rgb: u32) -> [f32; 4] {
        [
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    pub const BACKGROUND: [f32; 4] = hex(0x111111);
    pub const PLATFORM: [f32; 4] = hex(0x555555);
    pub const MOVING_PLATFORM: [f32; 4] = hex(0x777777);
    pub const SPIKE: [f32; 4] = hex(0xff0000);
    pub const SAW: [f32; 4] = hex(0xff0000);
    pub const SAW_TEETH: [f32; 4] = hex(0x000000);
    pub const PLAYER: [f32; 4] = hex(0xff0000);
    /// Player drawn on the death screen
    pub const PLAYER_DEAD: [f32; 4] = [0.4, 0.0, 0.0, 1.0];
}
