//! Deterministic integer math
//!
//! Everything downstream of this module works in 8.24 fixed point:
//! - `Fixed` scalars with 64-bit widening multiply/divide
//! - Sine/cosine from a compile-time lookup table
//! - `Vec3` and `Mat3` built on top of both

mod fixed;
mod trig;
mod vector;

pub use fixed::*;
pub use trig::*;
pub use vector::*;
