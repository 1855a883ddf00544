//! Lander Engine: fixed-point software renderer for a retro landing game
//!
//! Renders a procedural sine-wave landscape and flat-shaded objects with:
//! - 8.24 fixed-point arithmetic end to end (no floats in the pipeline)
//! - Scanline triangle fill into an RGBA pixel buffer with a display scale
//! - Painter's algorithm through depth-ordered triangle buckets
//! - Smooth landscape edge clipping
//! - PNG frame export

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod math;
pub mod rasterizer;
pub mod renderer;
pub mod world;
