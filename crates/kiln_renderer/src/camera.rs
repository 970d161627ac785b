//! Camera for ray generation.

use kiln_core::scene::validate_camera;
use kiln_core::{CameraDesc, SceneError, SceneResult};
use kiln_math::Vec3;
use rand::RngCore;

use crate::random::random_in_unit_disk;
use crate::Ray;

/// Camera placement and lens settings, turned into a [`Camera`] by [`build`].
///
/// [`build`]: CameraConfig::build
#[derive(Debug, Clone)]
pub struct CameraConfig {
    // Camera positioning
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,

    // Lens settings
    pub vfov: f32,         // Vertical field of view in degrees
    pub aspect_ratio: f32, // Image width over height
    pub aperture: f32,     // Lens diameter, 0 for a pinhole
    pub focus_dist: f32,   // Distance from camera to plane of perfect focus
}

impl CameraConfig {
    /// Create a camera config with default settings.
    pub fn new() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
        }
    }

    /// Camera settings from a scene description and output size.
    pub fn from_desc(desc: &CameraDesc, width: u32, height: u32) -> Self {
        Self::new()
            .with_position(desc.eye, desc.look_at, desc.up)
            .with_lens(desc.vfov, desc.aperture, desc.focus_distance())
            .with_resolution(width, height)
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the aspect ratio from an image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.aspect_ratio = width as f32 / height as f32;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Validate the settings and derive the camera basis.
    pub fn build(&self) -> SceneResult<Camera> {
        validate_camera(
            self.look_from,
            self.look_at,
            self.vup,
            self.vfov,
            self.aperture,
            self.focus_dist,
        )?;
        if !(self.aspect_ratio > 0.0 && self.aspect_ratio.is_finite()) {
            return Err(SceneError::InvalidCamera(format!(
                "aspect ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }

        // Calculate viewport dimensions on the focus plane
        let theta = self.vfov.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = self.aspect_ratio * half_height;

        // Calculate camera basis vectors
        let w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        let origin = self.look_from;
        let focus = self.focus_dist;
        let lower_left_corner =
            origin - half_width * focus * u - half_height * focus * v - focus * w;

        Ok(Camera {
            origin,
            lower_left_corner,
            horizontal: 2.0 * half_width * focus * u,
            vertical: 2.0 * half_height * focus * v,
            u,
            v,
            w,
            lens_radius: self.aperture / 2.0,
        })
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Thin-lens camera. Immutable once built.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Generate a ray through normalized image-plane coordinates.
    ///
    /// `s` runs left to right and `t` bottom to top, both in [0, 1]. Pixel
    /// mapping and jitter are the caller's job. With a finite aperture the
    /// origin is offset across the lens disk while still passing through the
    /// same point on the focus plane.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        let origin = self.origin + offset;
        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(origin, target - origin)
    }

    /// Camera position.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit vector pointing backwards out of the lens.
    pub fn w(&self) -> Vec3 {
        self.w
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pinhole() -> Camera {
        CameraConfig::new()
            .with_resolution(100, 100)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_camera_basis() {
        let camera = pinhole();
        assert_eq!(camera.origin(), Vec3::ZERO);
        assert!((camera.w() - Vec3::Z).length() < 0.001);
        assert_eq!(camera.lens_radius(), 0.0);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = pinhole();
        let mut rng = StdRng::seed_from_u64(42);

        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert!((ray.direction().normalize() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_field_of_view_corners() {
        // 90 degree vertical FOV, square image: corners at 45 degrees on each axis
        let camera = pinhole();
        let mut rng = StdRng::seed_from_u64(42);

        let top_right = camera.get_ray(1.0, 1.0, &mut rng).direction();
        assert!((top_right - Vec3::new(1.0, 1.0, -1.0)).length() < 1e-5);

        let bottom_left = camera.get_ray(0.0, 0.0, &mut rng).direction();
        assert!((bottom_left - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_aspect_ratio_widens_viewport() {
        let camera = CameraConfig::new()
            .with_resolution(200, 100)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let right = camera.get_ray(1.0, 0.5, &mut rng).direction();
        assert!((right - Vec3::new(2.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_aperture_keeps_focus_plane_sharp() {
        let focus_dist = 4.0;
        let camera = CameraConfig::new()
            .with_resolution(100, 100)
            .with_position(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 2.0, -10.0), Vec3::Y)
            .with_lens(60.0, 0.5, focus_dist)
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let focus_point = Vec3::new(1.0, 2.0, 3.0 - focus_dist);

        let mut origins_differ = false;
        let first = camera.get_ray(0.5, 0.5, &mut rng).origin();
        for _ in 0..100 {
            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            // Origin stays on the lens disk
            assert!((ray.origin() - camera.origin()).length() <= 0.25 + 1e-5);
            assert!((ray.origin() - camera.origin()).dot(camera.w()).abs() < 1e-5);
            // Every ray passes through the same focus-plane point at t = 1
            assert!((ray.at(1.0) - focus_point).length() < 1e-4);
            origins_differ |= (ray.origin() - first).length() > 1e-4;
        }
        assert!(origins_differ);
    }

    #[test]
    fn test_build_rejects_degenerate_settings() {
        let base = CameraConfig::new().with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);

        let same_point = base.clone().with_position(Vec3::ONE, Vec3::ONE, Vec3::Y);
        assert!(same_point.build().is_err());

        let parallel_up = base.clone().with_position(Vec3::ZERO, Vec3::NEG_Y, Vec3::Y);
        assert!(parallel_up.build().is_err());

        assert!(base.clone().with_lens(0.0, 0.0, 1.0).build().is_err());
        assert!(base.clone().with_lens(90.0, -1.0, 1.0).build().is_err());
        assert!(base.clone().with_lens(90.0, 0.0, 0.0).build().is_err());
        assert!(base.clone().with_aspect_ratio(0.0).build().is_err());
        assert!(base.build().is_ok());
    }

    #[test]
    fn test_from_desc_uses_look_distance_for_focus() {
        let desc = CameraDesc {
            eye: Vec3::new(0.0, 0.0, 5.0),
            look_at: Vec3::ZERO,
            aperture: 1.0,
            ..Default::default()
        };
        let config = CameraConfig::from_desc(&desc, 640, 480);
        assert_eq!(config.focus_dist, 5.0);
        assert!((config.aspect_ratio - 4.0 / 3.0).abs() < 1e-6);
    }
}
