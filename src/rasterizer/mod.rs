//! Fixed-point software rasterizer
//!
//! Features:
//! - Integer-only projection (8.24 fixed point, no floats)
//! - Scanline triangle fill with 16.16 edge stepping
//! - Flat-shaded solid triangles
//! - Painter's algorithm via depth-ordered triangle buckets (no Z-buffer)

mod camera;
mod framebuffer;
mod triangle_buffer;
mod types;

pub use camera::*;
pub use framebuffer::*;
pub use triangle_buffer::*;
pub use types::*;

/// Logical screen dimensions
pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 256;
