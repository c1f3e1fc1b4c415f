//! Core type definitions used throughout the codebase

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Position on the tile grid (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Top-left pixel of this cell for the given cell size
    pub fn to_pixels(self, cell_size: u32) -> Vec2 {
        let cell = cell_size as f32;
        Vec2::new(self.x as f32 * cell, self.y as f32 * cell)
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// RGBA color, 8 bits per channel
pub type Rgba8 = [u8; 4];
