//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Box-filter anti-aliasing via jittered multi-sampling
//! - Gamma correction
//! - Parallel center-out bucket scheduling

use std::time::Instant;

use kiln_core::{ColorBuffer, RenderSettings};
use kiln_math::Interval;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::bucket::{bucket_seed, generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::random::sample_square;
use crate::{Camera, CancelToken, Color, Hittable, Ray, RenderError};

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Background color when ray doesn't hit anything
    pub background: Color,
    /// Whether to use sky gradient instead of solid background
    pub use_sky_gradient: bool,
    /// Minimum hit distance, suppresses self-intersection at scatter origins
    pub t_min: f32,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Base seed; `None` draws a fresh one per trace
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Color::ZERO,
            use_sky_gradient: false,
            t_min: 0.001,
            bucket_size: DEFAULT_BUCKET_SIZE,
            seed: None,
        }
    }
}

impl RenderConfig {
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self {
            samples_per_pixel: settings.samples_per_pixel,
            max_depth: settings.max_depth,
            background: settings.background,
            use_sky_gradient: settings.sky_gradient,
            seed: settings.seed,
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(), RenderError> {
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples per pixel must be at least 1".to_string(),
            ));
        }
        if self.bucket_size == 0 {
            return Err(RenderError::InvalidConfig(
                "bucket size must be at least 1".to_string(),
            ));
        }
        if !(self.t_min >= 0.0 && self.t_min.is_finite()) {
            return Err(RenderError::InvalidConfig(format!(
                "t_min must be finite and non-negative, got {}",
                self.t_min
            )));
        }
        Ok(())
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating color. `depth` is the
/// number of bounces left; at zero the ray carries no light.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(config.t_min, f32::INFINITY)) else {
        if config.use_sky_gradient {
            return sky_gradient(ray);
        }
        return config.background;
    };

    let emission = rec.material.emitted(rec.uv_or_zero(), rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, config, rng);
            emission + result.attenuation * scattered_color
        }
        // Absorbed
        None => emission,
    }
}

/// Compute sky gradient background.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * Interval::UNIT.clamp(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * Interval::UNIT.clamp(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * Interval::UNIT.clamp(linear_to_gamma(color.z))) as u8;
    [r, g, b, 255]
}

/// Render a single pixel with jittered multi-sampling.
///
/// Pixel `(0, 0)` is the top-left corner of the image.
#[allow(clippy::too_many_arguments)]
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let (dx, dy) = sample_square(rng);
        let s = (x as f32 + dx) / width as f32;
        let t = 1.0 - (y as f32 + dy) / height as f32;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, config, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}

/// Trace the whole image into `buffer`.
///
/// Blocks until every bucket is done. The buffer's size defines the output
/// resolution; the camera's aspect ratio should match it.
pub fn trace(
    buffer: &mut ColorBuffer,
    world: &dyn Hittable,
    camera: &Camera,
    config: &RenderConfig,
) -> Result<(), RenderError> {
    trace_with_cancel(buffer, world, camera, config, &CancelToken::new())
}

/// Like [`trace`], but stops at the next bucket boundary once `cancel` fires.
///
/// A cancelled trace returns [`RenderError::Cancelled`] and leaves the buffer
/// untouched.
pub fn trace_with_cancel(
    buffer: &mut ColorBuffer,
    world: &dyn Hittable,
    camera: &Camera,
    config: &RenderConfig,
    cancel: &CancelToken,
) -> Result<(), RenderError> {
    config.validate()?;

    let (width, height) = (buffer.width(), buffer.height());
    let buckets = generate_buckets(width, height, config.bucket_size);
    let base_seed = config.seed.unwrap_or_else(rand::random);

    info!(
        "Tracing {}x{} at {} spp, depth {}, {} buckets",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth,
        buckets.len()
    );
    let start = Instant::now();

    let results: Option<Vec<BucketResult>> = buckets
        .par_iter()
        .map(|bucket| {
            if cancel.is_cancelled() {
                return None;
            }
            let mut rng = StdRng::seed_from_u64(bucket_seed(base_seed, bucket.index));
            let pixels = render_bucket(bucket, camera, world, width, height, config, &mut rng);
            debug!(
                "Bucket {} done ({}x{} at {},{})",
                bucket.index, bucket.width, bucket.height, bucket.x, bucket.y
            );
            Some(BucketResult::new(*bucket, pixels))
        })
        .collect();

    let Some(results) = results else {
        warn!("Trace cancelled after {:.2?}", start.elapsed());
        return Err(RenderError::Cancelled);
    };

    for result in &results {
        let bucket = result.bucket;
        buffer.write_block(
            bucket.x as i64,
            bucket.y as i64,
            bucket.width,
            &result.to_rgba(),
        );
    }

    info!("Trace finished in {:.2?}", start.elapsed());
    Ok(())
}
