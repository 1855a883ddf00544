//! Pixel buffer and scanline rasterizer
//!
//! All drawing funnels through `draw_horizontal_line`: triangles are split
//! into spans, single logical pixels become `scale`-sized blocks of spans.

use std::collections::TryReserveError;
use std::fmt;
use std::path::Path;
use super::types::{Color, ScreenTriangle};

/// Error type for framebuffer construction and export
#[derive(Debug)]
pub enum FramebufferError {
    Allocation(TryReserveError),
    InvalidSize { width: usize, height: usize, scale: usize },
    Image(image::ImageError),
}

impl From<TryReserveError> for FramebufferError {
    fn from(e: TryReserveError) -> Self {
        FramebufferError::Allocation(e)
    }
}

impl From<image::ImageError> for FramebufferError {
    fn from(e: image::ImageError) -> Self {
        FramebufferError::Image(e)
    }
}

impl fmt::Display for FramebufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramebufferError::Allocation(e) => write!(f, "Pixel buffer allocation failed: {}", e),
            FramebufferError::InvalidSize { width, height, scale } => {
                write!(f, "Invalid pixel buffer size {}x{} at scale {}", width, height, scale)
            }
            FramebufferError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for FramebufferError {}

/// Largest physical dimension we will allocate
const MAX_DIMENSION: usize = 8192;

/// Framebuffer for software rendering
pub struct Framebuffer {
    pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    /// One physical row of opaque black, copied by the fast clear
    black_row: Vec<u8>,
    pub width: usize,
    pub height: usize,
    /// Logical -> physical pixel scale
    pub scale: usize,
}

impl Framebuffer {
    /// Create a buffer of `logical_width x logical_height` logical pixels,
    /// each covering `scale x scale` physical pixels
    pub fn new(logical_width: usize, logical_height: usize, scale: usize) -> Result<Self, FramebufferError> {
        let invalid = FramebufferError::InvalidSize {
            width: logical_width,
            height: logical_height,
            scale,
        };
        if logical_width == 0 || logical_height == 0 || scale == 0 {
            return Err(invalid);
        }
        let width = logical_width.checked_mul(scale).filter(|w| *w <= MAX_DIMENSION);
        let height = logical_height.checked_mul(scale).filter(|h| *h <= MAX_DIMENSION);
        let (width, height) = match (width, height) {
            (Some(w), Some(h)) => (w, h),
            _ => return Err(invalid),
        };

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(width * height * 4)?;
        pixels.resize(width * height * 4, 0);

        let mut black_row = Vec::new();
        black_row.try_reserve_exact(width * 4)?;
        for _ in 0..width {
            black_row.extend_from_slice(&Color::BLACK.to_bytes());
        }

        log::debug!("Allocated {}x{} pixel buffer (scale {})", width, height, scale);

        Ok(Self {
            pixels,
            black_row,
            width,
            height,
            scale,
        })
    }

    pub fn logical_width(&self) -> usize {
        self.width / self.scale
    }

    pub fn logical_height(&self) -> usize {
        self.height / self.scale
    }

    /// Raw RGBA bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn clear(&mut self, color: Color) {
        if color == Color::BLACK {
            // Fast path: straight memory copies of a prebuilt row
            for row in self.pixels.chunks_exact_mut(self.black_row.len()) {
                row.copy_from_slice(&self.black_row);
            }
        } else {
            let bytes = color.to_bytes();
            for px in self.pixels.chunks_exact_mut(4) {
                px.copy_from_slice(&bytes);
            }
        }
    }

    /// Color of a physical pixel, None when out of bounds
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let p = &self.pixels[idx..idx + 4];
        Some(Color::with_alpha(p[0], p[1], p[2], p[3]))
    }

    /// Fill physical pixels x1..=x2 on row y, clipped to the buffer
    pub fn draw_horizontal_line(&mut self, x1: i32, x2: i32, y: i32, color: Color) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (left, right) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        if right < 0 || left >= self.width as i32 {
            return;
        }
        let left = left.max(0) as usize;
        let right = right.min(self.width as i32 - 1) as usize;

        let row = y as usize * self.width * 4;
        let bytes = color.to_bytes();
        for px in self.pixels[row + left * 4..row + (right + 1) * 4].chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Plot a logical pixel, covering its `scale x scale` physical block
    pub fn plot_pixel(&mut self, x: i32, y: i32, color: Color) {
        let s = self.scale as i32;
        let (px, py) = (x.saturating_mul(s), y.saturating_mul(s));
        for row in 0..s {
            self.draw_horizontal_line(px, px.saturating_add(s - 1), py.saturating_add(row), color);
        }
    }

    /// Scanline-fill a triangle given in physical pixel coordinates
    pub fn draw_triangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        // Sort vertices by ascending Y
        let mut v = [(x0, y0), (x1, y1), (x2, y2)];
        v.sort_by_key(|p| p.1);
        let [(x0, y0), (x1, y1), (x2, y2)] = v;

        if y2 < 0 || y0 >= self.height as i32 {
            return;
        }

        // Zero height: a single span
        if y0 == y2 {
            let min_x = x0.min(x1).min(x2);
            let max_x = x0.max(x1).max(x2);
            self.draw_horizontal_line(min_x, max_x, y0, color);
            return;
        }

        let long = edge_slope(x0, y0, x2, y2);

        // Upper half: v0 -> v1 against v0 -> v2, both start at x0
        if y1 > y0 {
            let short = edge_slope(x0, y0, x1, y1);
            let (left, right) = if short < long { (short, long) } else { (long, short) };
            // A flat bottom has no lower half, so this half owns the last row
            let last = if y1 == y2 { y2 } else { y1 - 1 };
            let start = to_16_16(x0);
            self.fill_span_rows(y0, last, start, left, start, right, color);
        }

        // Lower half: v1 -> v2 against the rest of v0 -> v2, converging on x2
        if y2 > y1 {
            let short = edge_slope(x1, y1, x2, y2);
            let long_x = to_16_16(x0).saturating_add(long.saturating_mul(y1 as i64 - y0 as i64));
            let short_x = to_16_16(x1);
            // The edge that must travel further right to meet x2 is on the left
            let ((lx, left), (rx, right)) = if short > long {
                ((short_x, short), (long_x, long))
            } else {
                ((long_x, long), (short_x, short))
            };
            self.fill_span_rows(y1, y2, lx, left, rx, right, color);
        }
    }

    /// Draw spans for rows first..=last, stepping both edges by their slopes
    fn fill_span_rows(
        &mut self,
        first: i32,
        last: i32,
        mut left_x: i64,
        left_slope: i64,
        mut right_x: i64,
        right_slope: i64,
        color: Color,
    ) {
        if last < 0 {
            return;
        }
        let mut y = first;
        // Skip rows above the buffer in one step. Edges far off-screen
        // saturate, which still clips to the same spans.
        if y < 0 {
            let skip = -(y as i64);
            left_x = left_x.saturating_add(left_slope.saturating_mul(skip));
            right_x = right_x.saturating_add(right_slope.saturating_mul(skip));
            y = 0;
        }
        let last = last.min(self.height as i32 - 1);
        while y <= last {
            self.draw_horizontal_line(from_16_16(left_x), from_16_16(right_x), y, color);
            left_x = left_x.saturating_add(left_slope);
            right_x = right_x.saturating_add(right_slope);
            y += 1;
        }
    }

    pub fn draw_screen_triangle(&mut self, tri: &ScreenTriangle) {
        let [(x0, y0), (x1, y1), (x2, y2)] = tri.points;
        self.draw_triangle(x0, y0, x1, y1, x2, y2, tri.color);
    }

    /// Copy the buffer into an RGBA image
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let idx = (y as usize * self.width + x as usize) * 4;
            image::Rgba([
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            ])
        })
    }

    /// Save the current frame as a PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), FramebufferError> {
        let path = path.as_ref();
        self.to_image().save_with_format(path, image::ImageFormat::Png)?;
        log::info!("Saved frame to {}", path.display());
        Ok(())
    }
}

/// Inverse slope dx/dy in 16.16; callers guarantee y1 > y0
fn edge_slope(x0: i32, y0: i32, x1: i32, y1: i32) -> i64 {
    let dy = y1 as i64 - y0 as i64;
    if dy == 0 {
        return 0;
    }
    ((x1 as i64 - x0 as i64) << 16) / dy
}

/// Pixel coordinate to 16.16, biased by half a pixel so truncation rounds
fn to_16_16(x: i32) -> i64 {
    ((x as i64) << 16) + 0x8000
}

fn from_16_16(x: i64) -> i32 {
    (x >> 16).clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
