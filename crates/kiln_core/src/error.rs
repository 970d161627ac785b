//! Scene validation and loading errors.
//!
//! Everything here is raised before tracing starts; a trace over a scene
//! that passed validation cannot fail on its inputs.

use thiserror::Error;

use crate::texture::ImageError;

/// Errors raised while loading, validating or building a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("object {index}: sphere radius must be positive, got {radius}")]
    InvalidRadius { index: usize, radius: f32 },

    #[error("object {index}: plane normal must be non-zero")]
    ZeroNormal { index: usize },

    #[error("object {index}: {field} must be finite")]
    NonFinite { index: usize, field: &'static str },

    #[error("object {index}: refraction index must be at least 1.0, got {value}")]
    InvalidRefractionIndex { index: usize, value: f32 },

    #[error("object {index}: metal fuzz must be finite and non-negative, got {value}")]
    InvalidFuzz { index: usize, value: f32 },

    #[error("unknown sampler '{0}'")]
    UnknownSampler(String),

    #[error("sampler '{0}' is declared more than once")]
    DuplicateSampler(String),

    #[error("sampler '{name}': scale must be positive, got {scale}")]
    InvalidSamplerScale { name: String, scale: f32 },

    #[error("invalid camera: {0}")]
    InvalidCamera(String),

    #[error("invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scene: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] ImageError),
}

pub type SceneResult<T> = Result<T, SceneError>;
