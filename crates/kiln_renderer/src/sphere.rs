//! Sphere primitive for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use kiln_math::{Interval, Vec2, Vec3};

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};

/// Discriminants below this are treated as a miss (tangent or grazing rays).
pub const DISCRIMINANT_EPSILON: f32 = f32::EPSILON;

/// A sphere primitive.
///
/// `radius` must be positive; a zero radius is a construction error the
/// sphere does not check.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    epsilon: f32,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius,
            material,
            epsilon: DISCRIMINANT_EPSILON,
        }
    }

    /// Override the grazing-ray tolerance.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> Vec2 {
        // theta: angle down from +Y
        // phi: angle around Y axis from -X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        Vec2::new(phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < self.epsilon {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.contains(root) {
            root = (h + sqrtd) / a;
            if !ray_t.contains(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            Some(Self::get_sphere_uv(outward_normal)),
            self.material.as_ref(),
        ))
    }
}
