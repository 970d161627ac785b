//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently,
//! each with its own random stream, and in parallel using rayon.

use kiln_core::Rgba;
use rand::RngCore;

use crate::renderer::{color_to_rgba, render_pixel};
use crate::{Camera, Color, Hittable, RenderConfig};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted from the center outward.
///
/// Indices are assigned after sorting, so a bucket's index depends only on
/// the image and bucket sizes.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    if bucket_size == 0 {
        return buckets;
    }

    // Generate grid of buckets
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center. The sort is stable, so
/// equidistant buckets keep row-major order.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| {
        distance(a)
            .partial_cmp(&distance(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Seed for a bucket's private generator.
pub fn bucket_seed(base_seed: u64, index: usize) -> u64 {
    base_seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Render a single bucket of an `image_width` x `image_height` frame.
///
/// Returns linear colors in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    image_width: u32,
    image_height: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Vec<Color> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            pixels.push(render_pixel(
                camera,
                world,
                global_x,
                global_y,
                image_width,
                image_height,
                config,
                rng,
            ));
        }
    }

    pixels
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }

    /// Tone-mapped pixels ready for the output buffer.
    pub fn to_rgba(&self) -> Vec<Rgba> {
        self.pixels.iter().copied().map(color_to_rgba).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CameraConfig, Scene};
    use kiln_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        // Total pixels should equal image size
        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 100, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid with partial buckets

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 100);
    }

    #[test]
    fn test_buckets_cover_each_pixel_once() {
        let (width, height) = (70, 45);
        let buckets = generate_buckets(width, height, 16);

        let mut seen = HashSet::new();
        for bucket in &buckets {
            for y in bucket.y..bucket.y + bucket.height {
                for x in bucket.x..bucket.x + bucket.width {
                    assert!(x < width && y < height);
                    assert!(seen.insert((x, y)));
                }
            }
        }
        assert_eq!(seen.len(), (width * height) as usize);
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9); // 3x3 grid

        // First bucket should be the center one
        let first = &buckets[0];
        assert_eq!(first.x, 64);
        assert_eq!(first.y, 64);

        for (i, bucket) in buckets.iter().enumerate() {
            assert_eq!(bucket.index, i);
        }
    }

    #[test]
    fn test_zero_bucket_size_yields_nothing() {
        assert!(generate_buckets(64, 64, 0).is_empty());
    }

    #[test]
    fn test_bucket_seeds_differ() {
        let seeds: HashSet<u64> = (0..64).map(|i| bucket_seed(42, i)).collect();
        assert_eq!(seeds.len(), 64);
        assert_ne!(bucket_seed(0, 0), 0);
    }

    #[test]
    fn test_render_bucket_fills_background() {
        let camera = CameraConfig::new()
            .with_resolution(8, 8)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .build()
            .unwrap();
        let config = RenderConfig {
            samples_per_pixel: 2,
            background: Color::splat(0.25),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let bucket = Bucket::new(2, 2, 4, 3, 0);

        let result = BucketResult::new(
            bucket,
            render_bucket(&bucket, &camera, &Scene::new(), 8, 8, &config, &mut rng),
        );
        assert_eq!(result.pixels.len(), 12);
        assert!(result.to_rgba().iter().all(|p| *p == [127, 127, 127, 255]));
    }
}
