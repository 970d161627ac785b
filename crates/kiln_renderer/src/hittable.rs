//! Hittable trait and HitRecord for ray-object intersection.

use kiln_math::{Interval, Vec2, Vec3};

use crate::{Material, Ray};

/// Record of a ray-object intersection.
///
/// Lives only for the duration of one shading step and borrows the material
/// of the object that was hit.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Geometric outward surface normal, unit length
    pub normal: Vec3,
    /// Whether the ray arrived from the side the normal points to
    pub front_face: bool,
    /// Surface coordinates, when the primitive defines them
    pub uv: Option<Vec2>,
    /// Material at the intersection point
    pub material: &'a dyn Material,
}

impl<'a> HitRecord<'a> {
    /// Build a record from an outward normal.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        uv: Option<Vec2>,
        material: &'a dyn Material,
    ) -> Self {
        Self {
            t,
            p: ray.at(t),
            normal: outward_normal,
            front_face: ray.direction().dot(outward_normal) < 0.0,
            uv,
            material,
        }
    }

    /// The normal flipped to face the incoming ray.
    pub fn facing_normal(&self) -> Vec3 {
        if self.front_face {
            self.normal
        } else {
            -self.normal
        }
    }

    /// UV for sampler lookups; primitives without a parametrization read as (0, 0).
    pub fn uv_or_zero(&self) -> Vec2 {
        self.uv.unwrap_or(Vec2::ZERO)
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `t` inside `ray_t` (inclusive), if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}
