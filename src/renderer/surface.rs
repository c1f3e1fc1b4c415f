//! Raster drawing surface the renderer paints on.

use std::path::Path;

use glam::Vec2;
use image::{Rgba, RgbaImage};

use super::font;
use crate::core::error::Result;
use crate::core::types::Rgba8;

/// RGBA raster with a global alpha applied to every fill and blit.
pub struct Surface {
    image: RgbaImage,
    global_alpha: f32,
}

/// Pixel span `[start, end)` of an edge pair, snapped to whole pixels.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: i64,
    end: i64,
}

impl Span {
    fn new(origin: f32, length: f32) -> Self {
        Self {
            start: origin.round() as i64,
            end: (origin + length).round() as i64,
        }
    }

    fn len(&self) -> i64 {
        self.end - self.start
    }

    fn clipped(&self, limit: u32) -> std::ops::Range<i64> {
        self.start.max(0)..self.end.min(limit as i64)
    }
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_image(RgbaImage::new(width, height))
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            image,
            global_alpha: 1.0,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }

    /// Pixel at (x, y); transparent outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| p.0)
            .unwrap_or([0, 0, 0, 0])
    }

    pub fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    pub fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    pub fn fill_rect(&mut self, position: Vec2, width: f32, height: f32, color: Rgba8) {
        let xs = Span::new(position.x, width);
        let ys = Span::new(position.y, height);
        for y in ys.clipped(self.height()) {
            for x in xs.clipped(self.width()) {
                self.blend(x as u32, y as u32, color);
            }
        }
    }

    /// Blit `source` scaled to `width` x `height` at `position` (nearest neighbour).
    pub fn draw_image(&mut self, source: &RgbaImage, position: Vec2, width: f32, height: f32) {
        let xs = Span::new(position.x, width);
        let ys = Span::new(position.y, height);
        if xs.len() <= 0 || ys.len() <= 0 || source.width() == 0 || source.height() == 0 {
            return;
        }

        for y in ys.clipped(self.height()) {
            let sy = ((y - ys.start) * source.height() as i64 / ys.len()) as u32;
            for x in xs.clipped(self.width()) {
                let sx = ((x - xs.start) * source.width() as i64 / xs.len()) as u32;
                let color = source.get_pixel(sx, sy).0;
                self.blend(x as u32, y as u32, color);
            }
        }
    }

    /// Draw `text` centred on `center_x` with its baseline row at `bottom`.
    ///
    /// A one pixel dark shadow keeps labels readable over any sprite.
    pub fn draw_text(&mut self, text: &str, center_x: f32, bottom: f32, color: Rgba8, scale: u32) {
        let width = font::text_width(text, scale) as f32;
        let left = (center_x - width / 2.0).round();
        let top = bottom - (font::GLYPH_HEIGHT * scale) as f32;
        let shadow = [0, 0, 0, color[3]];

        for (offset, tint) in [(1.0, shadow), (0.0, color)] {
            for (index, c) in text.chars().enumerate() {
                let glyph_left = left + (index as u32 * font::GLYPH_ADVANCE * scale) as f32;
                for gy in 0..font::GLYPH_HEIGHT {
                    for gx in 0..font::GLYPH_WIDTH {
                        if !font::covers(c, gx, gy) {
                            continue;
                        }
                        let cell = Vec2::new(
                            glyph_left + (gx * scale) as f32 + offset,
                            top + (gy * scale) as f32 + offset,
                        );
                        self.fill_rect(cell, scale as f32, scale as f32, tint);
                    }
                }
            }
        }
    }

    /// Source-over blend of one pixel, scaled by the global alpha.
    fn blend(&mut self, x: u32, y: u32, color: Rgba8) {
        let src_a = color[3] as f32 / 255.0 * self.global_alpha;
        if src_a <= 0.0 {
            return;
        }

        let dst = self.image.get_pixel_mut(x, y);
        let dst_a = dst.0[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        let mut out = [0u8; 4];
        for channel in 0..3 {
            let value = (color[channel] as f32 * src_a
                + dst.0[channel] as f32 * dst_a * (1.0 - src_a))
                / out_a;
            out[channel] = value.round().clamp(0.0, 255.0) as u8;
        }
        out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        *dst = Rgba(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba8 = [255, 0, 0, 255];
    const BLUE: Rgba8 = [0, 0, 255, 255];

    #[test]
    fn test_fill_rect_clips() {
        let mut surface = Surface::new(4, 4);
        surface.fill_rect(Vec2::new(2.0, 2.0), 10.0, 10.0, RED);

        assert_eq!(surface.pixel(3, 3), RED);
        assert_eq!(surface.pixel(1, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn test_global_alpha_blends() {
        let mut surface = Surface::new(1, 1);
        surface.fill_rect(Vec2::ZERO, 1.0, 1.0, BLUE);
        surface.set_global_alpha(0.5);
        surface.fill_rect(Vec2::ZERO, 1.0, 1.0, RED);

        let [r, g, b, a] = surface.pixel(0, 0);
        assert!((127..=128).contains(&r));
        assert_eq!(g, 0);
        assert!((127..=128).contains(&b));
        assert_eq!(a, 255);
    }

    #[test]
    fn test_draw_image_scales() {
        let mut source = RgbaImage::new(2, 1);
        source.put_pixel(0, 0, Rgba(RED));
        source.put_pixel(1, 0, Rgba(BLUE));

        let mut surface = Surface::new(4, 2);
        surface.draw_image(&source, Vec2::ZERO, 4.0, 2.0);

        assert_eq!(surface.pixel(0, 0), RED);
        assert_eq!(surface.pixel(1, 1), RED);
        assert_eq!(surface.pixel(2, 0), BLUE);
        assert_eq!(surface.pixel(3, 1), BLUE);
    }

    #[test]
    fn test_transparent_source_leaves_destination() {
        let source = RgbaImage::new(1, 1);
        let mut surface = Surface::new(1, 1);
        surface.fill_rect(Vec2::ZERO, 1.0, 1.0, BLUE);
        surface.draw_image(&source, Vec2::ZERO, 1.0, 1.0);
        assert_eq!(surface.pixel(0, 0), BLUE);
    }

    #[test]
    fn test_clear() {
        let mut surface = Surface::new(2, 2);
        surface.fill_rect(Vec2::ZERO, 2.0, 2.0, RED);
        surface.clear();
        assert_eq!(surface.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_draw_text_above_baseline() {
        let mut surface = Surface::new(16, 16);
        surface.draw_text("I", 8.0, 10.0, [255, 255, 255, 255], 1);

        // Top bar of 'I' is three pixels wide on the first glyph row.
        let top_row: Vec<_> = (0..16).filter(|x| surface.pixel(*x, 5) == [255, 255, 255, 255]).collect();
        assert_eq!(top_row.len(), 3);
        // Nothing is drawn at or below the baseline except the shadow.
        assert_eq!(surface.pixel(8, 11), [0, 0, 0, 0]);
    }
}
