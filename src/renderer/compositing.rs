//! Off-screen scratch buffer for per-item image transforms.
//!
//! One buffer, one cell in size, reused by every item of every pass. Its
//! contents are only meaningful until the current item has been painted.

use image::{imageops, Rgba, RgbaImage};

pub struct Scratch {
    buffer: RgbaImage,
}

impl Scratch {
    pub fn new(size: u32) -> Self {
        Self {
            buffer: RgbaImage::new(size, size),
        }
    }

    pub fn size(&self) -> u32 {
        self.buffer.width()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Replace the contents with `source` resampled to the buffer size.
    pub fn load(&mut self, source: &RgbaImage) {
        let size = self.size();
        if source.width() == 0 || source.height() == 0 {
            for pixel in self.buffer.pixels_mut() {
                *pixel = Rgba([0, 0, 0, 0]);
            }
            return;
        }

        for (x, y, pixel) in self.buffer.enumerate_pixels_mut() {
            let sx = x * source.width() / size;
            let sy = y * source.height() / size;
            *pixel = *source.get_pixel(sx, sy);
        }
    }

    /// Replace the contents with `source` mirrored left to right.
    pub fn load_mirrored(&mut self, source: &RgbaImage) {
        self.load(source);
        imageops::flip_horizontal_in_place(&mut self.buffer);
    }

    /// Rotate the hue of the current contents, then intersect with their prior alpha.
    ///
    /// Colors follow the CSS `hue-rotate()` matrix. The filter keeps alpha, and
    /// the destination-in step multiplies it by the unfiltered alpha, so fully
    /// transparent padding stays transparent.
    pub fn hue_rotate(&mut self, degrees: f32) {
        let matrix = hue_matrix(degrees);
        for pixel in self.buffer.pixels_mut() {
            let [r, g, b, a] = pixel.0;
            if a == 0 {
                continue;
            }
            let (r, g, b) = (r as f32, g as f32, b as f32);
            let channel = |row: [f32; 3]| -> u8 {
                (row[0] * r + row[1] * g + row[2] * b).round().clamp(0.0, 255.0) as u8
            };
            let filtered_alpha = a as u16;
            let masked = (filtered_alpha * a as u16 + 127) / 255;
            *pixel = Rgba([
                channel(matrix[0]),
                channel(matrix[1]),
                channel(matrix[2]),
                masked as u8,
            ]);
        }
    }
}

fn hue_matrix(degrees: f32) -> [[f32; 3]; 3] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}
