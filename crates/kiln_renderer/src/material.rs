//! Material trait for surface scattering.

use std::sync::Arc;

use kiln_math::{Vec2, Vec3};
use rand::RngCore;

use crate::random::{gen_f32, random_in_unit_sphere};
use crate::sampler::{ColorSampler, Sampler};
use crate::{hittable::HitRecord, Ray};

/// Color type alias (RGB, linear, unbounded before tone mapping)
pub type Color = Vec3;

/// Outcome of a scatter event.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel attenuation applied to the light carried back along `scattered`
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore)
        -> Option<ScatterResult>;

    /// Light emitted at the given surface coordinate and point.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _uv: Vec2, _p: Vec3) -> Color {
        Color::ZERO
    }
}

fn solid(color: Color) -> Arc<dyn Sampler> {
    Arc::new(ColorSampler::new(color))
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Sampler>,
}

impl Lambertian {
    /// Create a new Lambertian material with a constant albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::with_sampler(solid(albedo))
    }

    pub fn with_sampler(albedo: Arc<dyn Sampler>) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let normal = rec.facing_normal();
        let mut scatter_direction = normal + random_in_unit_sphere(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo.value(rec.uv_or_zero(), rec.p),
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Clone)]
pub struct Metal {
    albedo: Arc<dyn Sampler>,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough (clamped)
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self::with_sampler(solid(albedo), fuzz)
    }

    pub fn with_sampler(albedo: Arc<dyn Sampler>, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let normal = rec.facing_normal();
        let reflected = reflect(ray_in.direction().normalize(), normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzzed below the surface: absorbed
        if scattered_dir.dot(normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo.value(rec.uv_or_zero(), rec.p),
                scattered: Ray::new(rec.p, scattered_dir),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Clone)]
pub struct Dielectric {
    albedo: Arc<dyn Sampler>,
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new clear Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self::with_sampler(solid(Color::ONE), ior)
    }

    /// Tinted glass.
    pub fn with_sampler(albedo: Arc<dyn Sampler>, ior: f32) -> Self {
        Self { albedo, ior }
    }

    /// Schlick's approximation for reflectance.
    fn reflectance(cosine: f32, ratio: f32) -> f32 {
        // Index-matched boundary: nothing to reflect from
        if (ratio - 1.0).abs() < f32::EPSILON {
            return 0.0;
        }
        let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let unit_direction = ray_in.direction().normalize();

        // Leaving the medium when travelling along the outward normal
        let (normal, ratio) = if unit_direction.dot(rec.normal) > 0.0 {
            (-rec.normal, self.ior)
        } else {
            (rec.normal, 1.0 / self.ior)
        };

        let cos_theta = (-unit_direction).dot(normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        // Check for total internal reflection
        let cannot_refract = ratio * sin_theta > 1.0;

        let direction =
            if cannot_refract || Self::reflectance(cos_theta, ratio) > gen_f32(rng) {
                reflect(unit_direction, normal)
            } else {
                refract(unit_direction, normal, ratio)
            };

        Some(ScatterResult {
            attenuation: self.albedo.value(rec.uv_or_zero(), rec.p),
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// Light emitter. Never scatters.
#[derive(Clone)]
pub struct Emissive {
    emission: Arc<dyn Sampler>,
}

impl Emissive {
    /// Create a new emitter with a constant emission color.
    pub fn new(emit: Color) -> Self {
        Self::with_sampler(solid(emit))
    }

    pub fn with_sampler(emission: Arc<dyn Sampler>) -> Self {
        Self { emission }
    }
}

impl Material for Emissive {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, uv: Vec2, p: Vec3) -> Color {
        self.emission.value(uv, p)
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub(crate) fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
pub(crate) fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
