//! ONNX Runtime classifier
//!
//! Loads an image classification model plus its labels file and runs a
//! single-image forward pass per call.

use image::DynamicImage;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use super::postprocess;
use super::preprocess::{self, Normalization};
use super::{Classification, Classifier};
use crate::config::{Config, OutputScale};
use crate::error::ClassifyError;
use crate::pixel_buffer::PixelBuffer;

pub struct OnnxClassifier {
    name: String,
    session: Mutex<Session>,
    output_name: String,
    labels: Vec<String>,
    input_width: u32,
    input_height: u32,
    norm: Normalization,
    scale: OutputScale,
}

impl OnnxClassifier {
    /// Load the model and labels named by `config`
    pub fn load(config: &Config) -> Result<Self, ClassifyError> {
        let path = &config.model_path;
        log::info!("Loading ONNX model from: {}", path.display());

        if !path.exists() {
            return Err(ClassifyError::ModelNotFound(path.clone()));
        }

        let labels = read_labels(&config.labels_path)?;

        let model_load = |e: ort::Error| ClassifyError::ModelLoad {
            path: path.clone(),
            message: e.to_string(),
        };
        let session = Session::builder()
            .map_err(model_load)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(model_load)?
            .with_intra_threads(config.intra_threads.max(1))
            .map_err(model_load)?
            .commit_from_file(path)
            .map_err(model_load)?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| ClassifyError::ModelLoad {
                path: path.clone(),
                message: "model declares no outputs".to_string(),
            })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "model".to_string());

        log::info!("✅ Model '{}' loaded with {} labels", name, labels.len());

        Ok(Self {
            name,
            session: Mutex::new(session),
            output_name,
            labels,
            input_width: config.input_width,
            input_height: config.input_height,
            norm: Normalization {
                mean: config.mean,
                std: config.std,
            },
            scale: config.output,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn classify(&self, image: &DynamicImage) -> Result<Vec<Classification>, ClassifyError> {
        let start = Instant::now();

        let buffer = PixelBuffer::from_image(image, self.input_width, self.input_height).ok_or(
            ClassifyError::Conversion {
                width: self.input_width,
                height: self.input_height,
            },
        )?;
        let input = Tensor::from_array(preprocess::to_nchw(&buffer, &self.norm))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ClassifyError::Inference("session lock poisoned".to_string()))?;
        let outputs = session.run(ort::inputs![input])?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| ClassifyError::MalformedOutput(format!("missing output '{}'", self.output_name)))?;
        let (shape, scores) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifyError::MalformedOutput(e.to_string()))?;
        let shape: Vec<i64> = shape.iter().copied().collect();

        let results = postprocess::classifications(&shape, scores, &self.labels, self.scale)?;

        log::debug!(
            "Model '{}' classified {}x{} image in {:?}",
            self.name,
            image.width(),
            image.height(),
            start.elapsed()
        );

        Ok(results)
    }
}

/// Read a labels file: one label per line, surrounding whitespace trimmed,
/// blank lines skipped.
pub fn read_labels(path: &Path) -> Result<Vec<String>, ClassifyError> {
    let labels_error = |message: String| ClassifyError::Labels {
        path: PathBuf::from(path),
        message,
    };

    let text = fs::read_to_string(path).map_err(|e| labels_error(e.to_string()))?;
    let labels = parse_labels(&text);

    if labels.is_empty() {
        return Err(labels_error("file contains no labels".to_string()));
    }

    Ok(labels)
}

fn parse_labels(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_labels_skips_blank_lines() {
        let labels = parse_labels("Tomato___healthy\n\n  Tomato___Leaf_Mold  \r\nTomato___Target_Spot\n");
        assert_eq!(
            labels,
            ["Tomato___healthy", "Tomato___Leaf_Mold", "Tomato___Target_Spot"]
        );
    }

    #[test]
    fn test_read_labels_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "healthy\nsick").unwrap();

        assert_eq!(read_labels(file.path()).unwrap(), ["healthy", "sick"]);
    }

    #[test]
    fn test_empty_labels_file_is_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = read_labels(file.path()).unwrap_err();
        assert!(matches!(err, ClassifyError::Labels { .. }));
    }

    #[test]
    fn test_missing_model_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            model_path: dir.path().join("missing.onnx"),
            ..Config::default()
        };

        let err = OnnxClassifier::load(&config).err().unwrap();
        assert_eq!(err, ClassifyError::ModelNotFound(config.model_path.clone()));
    }
}
