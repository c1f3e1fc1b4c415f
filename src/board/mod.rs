//! Tile grid of a level and the background image composed from it.

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::core::error::{ReplayError, Result};
use crate::core::types::Rgba8;

/// Level layout: rows of single-character cell codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    rows: Vec<Vec<char>>,
}

impl TileGrid {
    /// Build a grid from rows. Rows may be ragged; the board is as wide as the longest.
    pub fn from_rows(rows: Vec<Vec<char>>) -> Result<Self> {
        if rows.is_empty() || rows.iter().all(Vec::is_empty) {
            return Err(ReplayError::InvalidLevel("level has no cells".into()));
        }
        Ok(Self { rows })
    }

    /// Parse level text, one row per line. Trailing blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.trim_end_matches('\r').chars().collect())
            .collect();
        while rows.last().is_some_and(Vec::is_empty) {
            rows.pop();
        }
        Self::from_rows(rows)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Width in cells.
    pub fn width(&self) -> u32 {
        self.rows.iter().map(Vec::len).max().unwrap_or(0) as u32
    }

    /// Height in cells.
    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Cell code at (x, y); short rows read as `None` past their end.
    pub fn cell(&self, x: u32, y: u32) -> Option<char> {
        self.rows
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    /// Board size in pixels for the given cell size.
    pub fn pixel_size(&self, cell_size: u32) -> (u32, u32) {
        (self.width() * cell_size, self.height() * cell_size)
    }
}

/// Produces the composed board image a renderer caches for its lifetime.
pub trait BackgroundGenerator {
    fn generate(
        &self,
        grid: &TileGrid,
        cell_size: u32,
    ) -> impl Future<Output = Result<RgbaImage>> + Send;
}

/// Flat-color tiles with a light checker shade.
#[derive(Debug, Clone)]
pub struct TileBackground {
    pub palette: HashMap<char, Rgba8>,
    /// Color for codes missing from the palette and for cells past a short row.
    pub fallback: Rgba8,
}

impl Default for TileBackground {
    fn default() -> Self {
        let palette = HashMap::from([
            ('#', [70, 70, 78, 255]),
            ('.', [120, 110, 90, 255]),
            (' ', [120, 110, 90, 255]),
            ('~', [50, 90, 150, 255]),
            ('"', [80, 130, 60, 255]),
        ]);
        Self {
            palette,
            fallback: [100, 95, 80, 255],
        }
    }
}

impl TileBackground {
    /// Compose the board synchronously.
    pub fn compose(&self, grid: &TileGrid, cell_size: u32) -> RgbaImage {
        let (width, height) = grid.pixel_size(cell_size);
        let mut image = RgbaImage::new(width, height);

        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let (cx, cy) = (x / cell_size, y / cell_size);
            let base = grid
                .cell(cx, cy)
                .and_then(|code| self.palette.get(&code).copied())
                .unwrap_or(self.fallback);
            let color = if (cx + cy) % 2 == 0 {
                base
            } else {
                shade(base, 0.9)
            };
            *pixel = Rgba(color);
        }

        image
    }
}

impl BackgroundGenerator for TileBackground {
    fn generate(
        &self,
        grid: &TileGrid,
        cell_size: u32,
    ) -> impl Future<Output = Result<RgbaImage>> + Send {
        let generator = self.clone();
        let grid = grid.clone();
        async move {
            tokio::task::spawn_blocking(move || generator.compose(&grid, cell_size))
                .await
                .map_err(|e| ReplayError::Background(e.to_string()))
        }
    }
}

fn shade(color: Rgba8, factor: f32) -> Rgba8 {
    let scale = |v: u8| (v as f32 * factor).round().clamp(0.0, 255.0) as u8;
    [scale(color[0]), scale(color[1]), scale(color[2]), color[3]]
}
