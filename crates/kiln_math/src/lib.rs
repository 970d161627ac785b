//! Kiln math primitives.
//!
//! Vector types come straight from `glam`; this crate adds the ray and
//! parameter-range types shared by the tracer.

// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;

pub use interval::Interval;
pub use ray::Ray;
