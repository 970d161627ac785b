//! Samplers map a surface coordinate and/or world point to a color.
//!
//! Samplers are immutable and shared between materials through
//! `Arc<dyn Sampler>`.

use std::sync::Arc;

use kiln_core::ImageData;
use kiln_math::{Vec2, Vec3};

use crate::Color;

/// Color lookup by surface UV and world-space point.
pub trait Sampler: Send + Sync {
    fn value(&self, uv: Vec2, p: Vec3) -> Color;
}

/// Constant color.
#[derive(Debug, Clone, Copy)]
pub struct ColorSampler {
    color: Color,
}

impl ColorSampler {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Sampler for ColorSampler {
    fn value(&self, _uv: Vec2, _p: Vec3) -> Color {
        self.color
    }
}

/// World-space 3D checkerboard alternating two samplers.
///
/// Cells are `scale` units wide. The pattern uses the hit point rather than
/// UV, so it stays continuous whatever the surface parametrization.
pub struct CheckerSampler {
    even: Arc<dyn Sampler>,
    odd: Arc<dyn Sampler>,
    scale: f32,
}

impl CheckerSampler {
    /// Checker over two existing samplers.
    pub fn new(even: Arc<dyn Sampler>, odd: Arc<dyn Sampler>, scale: f32) -> Self {
        Self { even, odd, scale }
    }

    /// Checker over two constant colors.
    pub fn from_colors(even: Color, odd: Color, scale: f32) -> Self {
        Self::new(
            Arc::new(ColorSampler::new(even)),
            Arc::new(ColorSampler::new(odd)),
            scale,
        )
    }

    fn is_even(&self, p: Vec3) -> bool {
        let cell = (p / self.scale).floor();
        let sum = cell.x as i64 + cell.y as i64 + cell.z as i64;
        sum.rem_euclid(2) == 0
    }
}

impl Sampler for CheckerSampler {
    fn value(&self, uv: Vec2, p: Vec3) -> Color {
        if self.is_even(p) {
            self.even.value(uv, p)
        } else {
            self.odd.value(uv, p)
        }
    }
}

/// Image lookup by UV.
///
/// UV is multiplied by `scale` (tiling) and wrapped into [0, 1] when it falls
/// outside. `v = 0` is the bottom row of the image.
pub struct TextureSampler {
    image: Arc<ImageData>,
    scale: f32,
}

impl TextureSampler {
    pub fn new(image: Arc<ImageData>, scale: f32) -> Self {
        Self { image, scale }
    }

    fn wrap(x: f32) -> f32 {
        if (0.0..=1.0).contains(&x) {
            x
        } else {
            x.rem_euclid(1.0)
        }
    }
}

impl Sampler for TextureSampler {
    fn value(&self, uv: Vec2, _p: Vec3) -> Color {
        let u = Self::wrap(uv.x * self.scale);
        let v = Self::wrap(uv.y * self.scale);

        let max_x = (self.image.width() - 1) as f32;
        let max_y = (self.image.height() - 1) as f32;
        let x = (u * max_x).floor().clamp(0.0, max_x) as u32;
        let y = ((1.0 - v) * max_y).floor().clamp(0.0, max_y) as u32;

        let [r, g, b, _] = self.image.pixel(x, y);
        Color::new(r as f32, g as f32, b as f32) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_white_checker(scale: f32) -> CheckerSampler {
        CheckerSampler::from_colors(Color::ZERO, Color::ONE, scale)
    }

    #[test]
    fn test_color_sampler_ignores_inputs() {
        let sampler = ColorSampler::new(Color::new(0.2, 0.4, 0.6));
        assert_eq!(
            sampler.value(Vec2::new(0.3, 0.9), Vec3::new(5.0, -1.0, 2.0)),
            Color::new(0.2, 0.4, 0.6)
        );
    }

    #[test]
    fn test_checker_origin_cell_is_even() {
        let checker = black_white_checker(1.0);
        assert_eq!(checker.value(Vec2::ZERO, Vec3::new(0.5, 0.5, 0.5)), Color::ZERO);
    }

    #[test]
    fn test_checker_flips_each_cell() {
        let scale = 2.5;
        let checker = black_white_checker(scale);
        let points = [
            Vec3::new(0.3, 0.1, 0.7),
            Vec3::new(-4.2, 1.9, 3.3),
            Vec3::new(12.0, -7.5, -0.2),
        ];

        for p in points {
            let a = checker.value(Vec2::ZERO, p);
            let b = checker.value(Vec2::ZERO, p + Vec3::new(scale, 0.0, 0.0));
            let c = checker.value(Vec2::ZERO, p + Vec3::new(0.0, 0.0, scale));
            assert_ne!(a, b, "x step at {:?}", p);
            assert_ne!(a, c, "z step at {:?}", p);
        }
    }

    #[test]
    fn test_checker_negative_coordinates() {
        let checker = black_white_checker(1.0);
        // floor(-0.5) = -1, odd
        assert_eq!(checker.value(Vec2::ZERO, Vec3::new(-0.5, 0.5, 0.5)), Color::ONE);
        // -1 + -1 = -2, even
        assert_eq!(checker.value(Vec2::ZERO, Vec3::new(-0.5, -0.5, 0.5)), Color::ZERO);
    }

    #[test]
    fn test_checker_nests_samplers() {
        let inner: Arc<dyn Sampler> = Arc::new(black_white_checker(0.5));
        let red: Arc<dyn Sampler> = Arc::new(ColorSampler::new(Color::X));
        let outer = CheckerSampler::new(inner, red, 2.0);

        assert_eq!(outer.value(Vec2::ZERO, Vec3::new(0.25, 0.25, 0.25)), Color::ZERO);
        assert_eq!(outer.value(Vec2::ZERO, Vec3::new(2.5, 0.25, 0.25)), Color::X);
    }

    fn gradient_image() -> Arc<ImageData> {
        // 2x2 RGB: top row red, green; bottom row blue, white
        let pixels = vec![
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 255, 255, 255,
        ];
        Arc::new(ImageData::new(2, 2, 3, pixels).unwrap())
    }

    #[test]
    fn test_texture_corners() {
        let sampler = TextureSampler::new(gradient_image(), 1.0);

        // v = 0 is the bottom row
        assert_eq!(sampler.value(Vec2::new(0.0, 0.0), Vec3::ZERO), Color::Z);
        assert_eq!(sampler.value(Vec2::new(1.0, 0.0), Vec3::ZERO), Color::ONE);
        assert_eq!(sampler.value(Vec2::new(0.0, 1.0), Vec3::ZERO), Color::X);
        assert_eq!(sampler.value(Vec2::new(1.0, 1.0), Vec3::ZERO), Color::Y);
    }

    #[test]
    fn test_texture_wraps_out_of_range_uv() {
        let sampler = TextureSampler::new(gradient_image(), 1.0);
        assert_eq!(
            sampler.value(Vec2::new(-1.0, 2.0), Vec3::ZERO),
            sampler.value(Vec2::new(0.0, 0.0), Vec3::ZERO)
        );
    }

    #[test]
    fn test_texture_scale_tiles() {
        // 4x1 RGB strip: red, green, blue, white
        let strip = ImageData::new(
            4,
            1,
            3,
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
        )
        .unwrap();
        let image = Arc::new(strip);
        let tiled = TextureSampler::new(image.clone(), 2.0);
        let single = TextureSampler::new(image, 1.0);
        let at = |s: &TextureSampler, u: f32| s.value(Vec2::new(u, 0.5), Vec3::ZERO);

        // 0.25 and 0.75 both land on u = 0.5 of a tile
        assert_eq!(at(&tiled, 0.25), Color::Y);
        assert_eq!(at(&tiled, 0.75), at(&tiled, 0.25));
        // Without tiling they are different texels
        assert_eq!(at(&single, 0.25), Color::X);
        assert_eq!(at(&single, 0.75), Color::Y);
    }

    #[test]
    fn test_texture_values_normalized() {
        let image = ImageData::new(1, 1, 4, vec![51, 102, 255, 0]).unwrap();
        let sampler = TextureSampler::new(Arc::new(image), 1.0);
        let c = sampler.value(Vec2::new(0.5, 0.5), Vec3::ZERO);
        assert!((c - Color::new(0.2, 0.4, 1.0)).length() < 1e-6);
    }
}
