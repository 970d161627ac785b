//! Sampling helpers over an injectable random source.
//!
//! Everything takes `&mut dyn RngCore` so tests can pass a seeded `StdRng`
//! and each render bucket can own its own generator.

use kiln_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform f32 in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform f32 in [min, max).
#[inline]
pub fn gen_f32_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Random point inside the unit sphere (rejection sampling).
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f32_range(rng, -1.0, 1.0),
            gen_f32_range(rng, -1.0, 1.0),
            gen_f32_range(rng, -1.0, 1.0),
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Random point inside the unit disk in the XY plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f32_range(rng, -1.0, 1.0),
            gen_f32_range(rng, -1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Random offset in the unit square [0, 1) x [0, 1), used as pixel jitter.
pub fn sample_square(rng: &mut dyn RngCore) -> (f32, f32) {
    (gen_f32(rng), gen_f32(rng))
}
