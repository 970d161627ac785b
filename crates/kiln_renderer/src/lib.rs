//! Kiln Renderer - CPU ray tracing core
//!
//! A Monte Carlo ray tracer over spheres and planes with diffuse, metal,
//! glass and emissive materials. Materials read their colors through
//! samplers (constant, 3D checker, image texture), so surface color can vary
//! across an object.
//!
//! Tracing splits the frame into buckets rendered in parallel, each with its
//! own seeded random stream; the result lands in a [`kiln_core::ColorBuffer`].

mod bucket;
mod builder;
mod camera;
mod error;
mod hittable;
mod material;
mod plane;
pub mod random;
mod renderer;
mod sampler;
mod scene;
mod sphere;

pub use bucket::{
    bucket_seed, generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use builder::{build_render, build_scene, RenderJob};
pub use camera::{Camera, CameraConfig};
pub use error::{CancelToken, RenderError};
pub use hittable::{HitRecord, Hittable};
pub use material::{Color, Dielectric, Emissive, Lambertian, Material, Metal, ScatterResult};
pub use plane::{Plane, PARALLEL_EPSILON};
pub use renderer::{
    color_to_rgba, linear_to_gamma, ray_color, render_pixel, sky_gradient, trace,
    trace_with_cancel, RenderConfig,
};
pub use sampler::{CheckerSampler, ColorSampler, Sampler, TextureSampler};
pub use scene::Scene;
pub use sphere::{Sphere, DISCRIMINANT_EPSILON};

/// Re-export the math types used throughout the public API
pub use kiln_math::{Interval, Ray, Vec2, Vec3};
