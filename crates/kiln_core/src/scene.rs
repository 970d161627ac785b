//! Scene description types for Kiln.
//!
//! A scene is described as plain data: named samplers, an ordered list of
//! (geometry, material) pairs, a camera and render settings. The renderer
//! turns a validated `SceneDesc` into traceable objects.
//!
//! Descriptions round-trip through JSON:
//!
//! ```json
//! {
//!   "samplers": [
//!     { "name": "floor", "type": "checker", "even": [0, 0, 0], "odd": [1, 1, 1] }
//!   ],
//!   "objects": [
//!     { "geometry": { "type": "plane", "point": [0, -2, 0], "normal": [0, 1, 0] },
//!       "material": { "type": "lambertian", "albedo": "floor" } }
//!   ],
//!   "camera": { "eye": [5, 1, 2], "look_at": [0, 2, -10], "vfov": 90, "aperture": 0.2 }
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use kiln_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};

fn default_scale() -> f32 {
    1.0
}

fn default_white() -> SamplerRef {
    SamplerRef::Color(Vec3::ONE)
}

fn default_up() -> Vec3 {
    Vec3::Y
}

fn default_vfov() -> f32 {
    90.0
}

/// A color slot: either a literal RGB triple or the name of a declared sampler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SamplerRef {
    Color(Vec3),
    Named(String),
}

impl From<Vec3> for SamplerRef {
    fn from(color: Vec3) -> Self {
        SamplerRef::Color(color)
    }
}

impl From<&str> for SamplerRef {
    fn from(name: &str) -> Self {
        SamplerRef::Named(name.to_string())
    }
}

/// Sampler variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SamplerDesc {
    /// Constant color
    Color { color: Vec3 },

    /// 3D checkerboard alternating two samplers
    Checker {
        even: SamplerRef,
        odd: SamplerRef,
        #[serde(default = "default_scale")]
        scale: f32,
    },

    /// Image lookup by surface UV
    Texture {
        path: String,
        #[serde(default = "default_scale")]
        scale: f32,
    },
}

/// A sampler declared under a name so materials and checkers can share it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedSampler {
    pub name: String,
    #[serde(flatten)]
    pub sampler: SamplerDesc,
}

/// Geometry variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometryDesc {
    Sphere { center: Vec3, radius: f32 },
    Plane { point: Vec3, normal: Vec3 },
}

/// Material variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    Lambertian {
        albedo: SamplerRef,
    },
    Metal {
        albedo: SamplerRef,
        #[serde(default)]
        fuzz: f32,
    },
    Dielectric {
        #[serde(default = "default_white")]
        albedo: SamplerRef,
        refraction_index: f32,
    },
    Emissive {
        emission: SamplerRef,
    },
}

impl MaterialDesc {
    /// The sampler slot feeding this material's albedo or emission.
    pub fn sampler_ref(&self) -> &SamplerRef {
        match self {
            MaterialDesc::Lambertian { albedo }
            | MaterialDesc::Metal { albedo, .. }
            | MaterialDesc::Dielectric { albedo, .. } => albedo,
            MaterialDesc::Emissive { emission } => emission,
        }
    }
}

/// One scene object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectDesc {
    pub geometry: GeometryDesc,
    pub material: MaterialDesc,
}

/// Camera placement and lens.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraDesc {
    pub eye: Vec3,
    pub look_at: Vec3,
    #[serde(default = "default_up")]
    pub up: Vec3,
    /// Vertical field of view in degrees
    #[serde(default = "default_vfov")]
    pub vfov: f32,
    /// Lens diameter; 0 gives a pinhole camera
    #[serde(default)]
    pub aperture: f32,
    /// Distance to the plane of perfect focus; defaults to `|eye - look_at|`
    #[serde(default)]
    pub focus_distance: Option<f32>,
}

impl CameraDesc {
    /// Focus distance, falling back to the eye/look-at distance.
    pub fn focus_distance(&self) -> f32 {
        self.focus_distance
            .unwrap_or_else(|| (self.eye - self.look_at).length())
    }

    pub fn validate(&self) -> SceneResult<()> {
        validate_camera(
            self.eye,
            self.look_at,
            self.up,
            self.vfov,
            self.aperture,
            self.focus_distance(),
        )
    }
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            up: Vec3::Y,
            vfov: 90.0,
            aperture: 0.0,
            focus_distance: None,
        }
    }
}

/// Check a camera setup for a degenerate basis or lens.
pub fn validate_camera(
    eye: Vec3,
    look_at: Vec3,
    up: Vec3,
    vfov: f32,
    aperture: f32,
    focus_distance: f32,
) -> SceneResult<()> {
    if !(eye.is_finite() && look_at.is_finite() && up.is_finite()) {
        return Err(SceneError::InvalidCamera(
            "eye, look_at and up must be finite".to_string(),
        ));
    }
    let forward = eye - look_at;
    if forward.length_squared() < 1e-12 {
        return Err(SceneError::InvalidCamera(
            "eye and look_at must be distinct".to_string(),
        ));
    }
    if up.cross(forward).length_squared() < 1e-12 {
        return Err(SceneError::InvalidCamera(
            "up vector must not be zero or parallel to the view direction".to_string(),
        ));
    }
    if !(vfov > 0.0 && vfov < 180.0) {
        return Err(SceneError::InvalidCamera(format!(
            "vertical field of view must be in (0, 180) degrees, got {}",
            vfov
        )));
    }
    if !(aperture >= 0.0 && aperture.is_finite()) {
        return Err(SceneError::InvalidCamera(format!(
            "aperture must be non-negative, got {}",
            aperture
        )));
    }
    if !(focus_distance > 0.0 && focus_distance.is_finite()) {
        return Err(SceneError::InvalidCamera(format!(
            "focus distance must be positive, got {}",
            focus_distance
        )));
    }
    Ok(())
}

/// Output size and sampling quality.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    /// Color returned by rays that escape the scene
    pub background: Vec3,
    /// Use a white-to-blue sky gradient instead of `background`
    pub sky_gradient: bool,
    /// Fixed seed for reproducible renders
    pub seed: Option<u64>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            samples_per_pixel: 100,
            max_depth: 50,
            background: Vec3::ZERO,
            sky_gradient: false,
            seed: None,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> SceneResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::InvalidSettings(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(SceneError::InvalidSettings(
                "samples per pixel must be at least 1".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(SceneError::InvalidSettings(
                "max depth must be at least 1".to_string(),
            ));
        }
        if !self.background.is_finite() {
            return Err(SceneError::InvalidSettings(
                "background color must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// A complete scene description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDesc {
    #[serde(default)]
    pub samplers: Vec<NamedSampler>,
    pub objects: Vec<ObjectDesc>,
    #[serde(default)]
    pub camera: CameraDesc,
    #[serde(default)]
    pub render: RenderSettings,
}

impl SceneDesc {
    /// Parse a scene from JSON text.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON scene file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the whole description. Samplers may only reference samplers
    /// declared before them; materials may reference any declared sampler.
    pub fn validate(&self) -> SceneResult<()> {
        let mut known: HashSet<&str> = HashSet::new();

        for named in &self.samplers {
            match &named.sampler {
                SamplerDesc::Color { color } => {
                    if !color.is_finite() {
                        return Err(SceneError::InvalidSettings(format!(
                            "sampler '{}': color must be finite",
                            named.name
                        )));
                    }
                }
                SamplerDesc::Checker { even, odd, scale } => {
                    check_scale(&named.name, *scale)?;
                    check_ref(even, &known)?;
                    check_ref(odd, &known)?;
                }
                SamplerDesc::Texture { scale, .. } => check_scale(&named.name, *scale)?,
            }
            if !known.insert(named.name.as_str()) {
                return Err(SceneError::DuplicateSampler(named.name.clone()));
            }
        }

        for (index, object) in self.objects.iter().enumerate() {
            validate_geometry(index, &object.geometry)?;
            validate_material(index, &object.material)?;
            check_ref(object.material.sampler_ref(), &known)?;
        }

        self.camera.validate()?;
        self.render.validate()
    }
}

fn check_scale(name: &str, scale: f32) -> SceneResult<()> {
    if scale > 0.0 && scale.is_finite() {
        Ok(())
    } else {
        Err(SceneError::InvalidSamplerScale {
            name: name.to_string(),
            scale,
        })
    }
}

fn check_ref(slot: &SamplerRef, known: &HashSet<&str>) -> SceneResult<()> {
    match slot {
        SamplerRef::Color(color) if !color.is_finite() => Err(SceneError::InvalidSettings(
            "literal colors must be finite".to_string(),
        )),
        SamplerRef::Color(_) => Ok(()),
        SamplerRef::Named(name) if known.contains(name.as_str()) => Ok(()),
        SamplerRef::Named(name) => Err(SceneError::UnknownSampler(name.clone())),
    }
}

fn validate_geometry(index: usize, geometry: &GeometryDesc) -> SceneResult<()> {
    match geometry {
        GeometryDesc::Sphere { center, radius } => {
            if !center.is_finite() {
                return Err(SceneError::NonFinite { index, field: "center" });
            }
            if !(*radius > 0.0 && radius.is_finite()) {
                return Err(SceneError::InvalidRadius { index, radius: *radius });
            }
        }
        GeometryDesc::Plane { point, normal } => {
            if !point.is_finite() {
                return Err(SceneError::NonFinite { index, field: "point" });
            }
            if !normal.is_finite() {
                return Err(SceneError::NonFinite { index, field: "normal" });
            }
            if normal.length_squared() < 1e-12 {
                return Err(SceneError::ZeroNormal { index });
            }
        }
    }
    Ok(())
}

fn validate_material(index: usize, material: &MaterialDesc) -> SceneResult<()> {
    match material {
        MaterialDesc::Metal { fuzz, .. } if !(*fuzz >= 0.0 && fuzz.is_finite()) => {
            Err(SceneError::InvalidFuzz { index, value: *fuzz })
        }
        MaterialDesc::Dielectric {
            refraction_index, ..
        } if !(*refraction_index >= 1.0 && refraction_index.is_finite()) => {
            Err(SceneError::InvalidRefractionIndex {
                index,
                value: *refraction_index,
            })
        }
        _ => Ok(()),
    }
}
