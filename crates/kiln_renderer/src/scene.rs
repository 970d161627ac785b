//! The scene: an unordered collection of hittable objects.

use kiln_math::Interval;

use crate::{HitRecord, Hittable, Ray};

/// A list of hittable objects answering nearest-hit queries.
///
/// Object order only matters for ties: when two objects are hit at exactly
/// the same `t`, the one added first wins.
pub struct Scene {
    objects: Vec<Box<dyn Hittable>>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the scene.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                // Strictly nearer only, so equal-t ties keep the earlier object
                if closest.is_none() || rec.t < closest_so_far {
                    closest_so_far = rec.t;
                    closest = Some(rec);
                }
            }
        }

        closest
    }
}
