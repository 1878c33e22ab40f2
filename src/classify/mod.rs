//! Image classification
//!
//! - `preprocess.rs` - pixel buffer to normalized NCHW tensor
//! - `postprocess.rs` - raw scores to sorted, labelled classifications
//! - `onnx.rs` - ONNX Runtime backed classifier
//!
//! The rest of the app only sees the `Classifier` trait, so tests can swap
//! in a canned implementation.

pub mod onnx;
pub mod postprocess;
pub mod preprocess;

pub use onnx::OnnxClassifier;

use image::DynamicImage;
use std::fmt;
use std::sync::Arc;

use crate::error::ClassifyError;

/// One label/confidence pair produced by a model
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Class identifier as listed in the labels file
    pub label: String,
    /// Confidence in [0, 1]
    pub confidence: f32,
}

impl Classification {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// Confidence as a two-decimal percentage, e.g. `87.34%`
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}%", self.confidence * 100.0)
    }
}

/// Renders as `<label> <confidence>%`, the text shown under the image
impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label, self.confidence_percent())
    }
}

/// Highest-confidence entry, ignoring entries with a NaN confidence
pub fn top_result(results: &[Classification]) -> Option<&Classification> {
    results
        .iter()
        .filter(|c| !c.confidence.is_nan())
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
}

/// Something that turns a bitmap into ranked classifications.
///
/// Implementations block; callers run them off the UI thread.
pub trait Classifier: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Classify `image`, returning results sorted by descending confidence
    fn classify(&self, image: &DynamicImage) -> Result<Vec<Classification>, ClassifyError>;
}

/// Shared handle to a loaded classifier that can travel in UI messages
#[derive(Clone)]
pub struct ModelHandle(Arc<dyn Classifier>);

impl ModelHandle {
    pub fn new(classifier: impl Classifier + 'static) -> Self {
        Self(Arc::new(classifier))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn classify(&self, image: &DynamicImage) -> Result<Vec<Classification>, ClassifyError> {
        self.0.classify(image)
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelHandle").field(&self.name()).finish()
    }
}
