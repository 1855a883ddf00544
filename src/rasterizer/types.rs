//! Core types for the rasterizer

use serde::{Serialize, Deserialize};
use crate::math::Fixed;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Multiply by a fixed-point intensity (clamped to 0..=1)
    pub fn shade(self, intensity: Fixed) -> Self {
        let i = intensity.clamp(Fixed::ZERO, Fixed::ONE).raw() as u32;
        let channel = |c: u8| ((c as u32 * i) >> 24) as u8;
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a,
        }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A triangle already projected to physical screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenTriangle {
    pub points: [(i32, i32); 3],
    pub color: Color,
}

impl ScreenTriangle {
    pub fn new(p0: (i32, i32), p1: (i32, i32), p2: (i32, i32), color: Color) -> Self {
        Self { points: [p0, p1, p2], color }
    }
}
