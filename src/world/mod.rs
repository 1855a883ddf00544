//! World module - procedural landscape and the objects placed on it
//!
//! - Height field built from summed sine waves (pure, no instance state)
//! - Landscape scale context passed explicitly to whoever needs it
//! - Closed object catalog with destroyed-state mapping

mod objects;
mod terrain;

pub use objects::*;
pub use terrain::*;
