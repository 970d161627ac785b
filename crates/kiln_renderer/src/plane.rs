//! Infinite plane primitive.

use std::sync::Arc;

use kiln_math::{Interval, Vec3};

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};

/// Rays with `|dot(direction, normal)|` below this are treated as parallel.
pub const PARALLEL_EPSILON: f32 = f32::EPSILON;

/// An infinite plane through `point` with unit `normal`.
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    material: Arc<dyn Material>,
    epsilon: f32,
}

impl Plane {
    /// Create a new plane. `normal` is normalized and must not be zero.
    pub fn new(point: Vec3, normal: Vec3, material: Arc<dyn Material>) -> Self {
        Self {
            point,
            normal: normal.normalize(),
            material,
            epsilon: PARALLEL_EPSILON,
        }
    }

    /// Override the parallel-ray tolerance.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let denominator = ray.direction().dot(self.normal);
        if denominator.abs() < self.epsilon {
            return None;
        }

        let t = (self.point - ray.origin()).dot(self.normal) / denominator;
        if t < 0.0 || !ray_t.contains(t) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            self.normal,
            None,
            self.material.as_ref(),
        ))
    }
}
