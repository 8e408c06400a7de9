//! Error types for camera setup, scene loading and image output.
//!
//! Misses and absorbed rays are not errors; intersection and scattering
//! report them through `bool` and `Option`.

use thiserror::Error;

/// Errors raised while constructing a camera.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid camera parameters: {0}")]
    InvalidParams(String),

    #[error("Failed to start render workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Errors raised while writing a rendered frame.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Frame buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Unsupported image format: {0:?} (expected .ppm or .png)")]
    UnsupportedFormat(String),
}

/// Errors raised while loading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid sphere {index}: {message}")]
    InvalidSphere { index: usize, message: String },
}

/// Result type for camera operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type for image output.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type for scene loading.
pub type SceneResult<T> = Result<T, SceneError>;
