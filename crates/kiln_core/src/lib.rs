//! Kiln Core - renderer-agnostic data for the Kiln ray tracer.
//!
//! This crate provides:
//!
//! - **Output**: `ColorBuffer`, the RGBA8 frame handed to a presentation layer
//! - **Images**: `ImageData` and `ImageCache`, decoded pixels backing texture samplers
//! - **Scene descriptions**: serde-tagged geometry/material/sampler descriptors
//!   and the validation errors raised before a trace starts
//!
//! # Example
//!
//! ```ignore
//! use kiln_core::SceneDesc;
//!
//! let desc = SceneDesc::load("scenes/demo.json")?;
//! desc.validate()?;
//! println!("{} objects, {} samplers", desc.objects.len(), desc.samplers.len());
//! ```

pub mod buffer;
pub mod error;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use buffer::{ColorBuffer, Rgba, BYTES_PER_PIXEL};
pub use error::{SceneError, SceneResult};
pub use scene::{
    CameraDesc, GeometryDesc, MaterialDesc, NamedSampler, ObjectDesc, RenderSettings,
    SamplerDesc, SamplerRef, SceneDesc,
};
pub use texture::{ImageCache, ImageData, ImageError, ImageResult};
