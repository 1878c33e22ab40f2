//! Error types for image loading, configuration and classification.
//!
//! Errors carry string payloads so they are `Clone` and can travel inside
//! iced messages back to the UI thread.

use std::path::PathBuf;
use thiserror::Error;

/// Anything that can go wrong between "model file on disk" and "top label".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    #[error("model file not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("failed to load model {}: {message}", .path.display())]
    ModelLoad { path: PathBuf, message: String },

    #[error("failed to read labels {}: {message}", .path.display())]
    Labels { path: PathBuf, message: String },

    #[error("classification model is not loaded")]
    ModelUnavailable,

    #[error("image could not be converted to a {width}x{height} pixel buffer")]
    Conversion { width: u32, height: u32 },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model output is malformed: {0}")]
    MalformedOutput(String),

    #[error("model returned no classifications")]
    EmptyResult,
}

impl From<ort::Error> for ClassifyError {
    fn from(e: ort::Error) -> Self {
        ClassifyError::Inference(e.to_string())
    }
}

/// Failure to turn a picked file into a bitmap.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImageLoadError {
    #[error("failed to open {}: {message}", .path.display())]
    Open { path: PathBuf, message: String },

    #[error("failed to decode {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    #[error("background task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
