/// Classification pipeline
///
/// Both entry points run their blocking work on the tokio blocking pool and
/// resolve back on whatever executor polls them (the iced runtime, which
/// delivers the output to `update` on the UI thread).
use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;
use tokio::task;

use crate::classify::{top_result, Classification, ModelHandle, OnnxClassifier};
use crate::config::Config;
use crate::error::ClassifyError;

/// Load the ONNX model described by `config` in the background
pub async fn load_model(config: Config) -> Result<ModelHandle, ClassifyError> {
    task::spawn_blocking(move || OnnxClassifier::load(&config).map(ModelHandle::new))
        .await
        .map_err(|e| ClassifyError::Inference(format!("task join error: {}", e)))?
}

/// Classify `bitmap` and return its top result.
///
/// An empty result list is `ClassifyError::EmptyResult`.
pub async fn classify_image(
    model: ModelHandle,
    bitmap: Arc<DynamicImage>,
) -> Result<Classification, ClassifyError> {
    task::spawn_blocking(move || {
        let start = Instant::now();
        let results = model.classify(&bitmap)?;
        let top = top_result(&results).cloned().ok_or(ClassifyError::EmptyResult)?;

        log::info!(
            "🔍 {} → {} ({} classes, {:?})",
            model.name(),
            top,
            results.len(),
            start.elapsed()
        );
        Ok(top)
    })
    .await
    .map_err(|e| ClassifyError::Inference(format!("task join error: {}", e)))?
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[tokio::test]
    async fn test_returns_top_result() {
        let model = canned(Ok(vec![
            Classification::new("Tomato___healthy", 0.1),
            Classification::new("Tomato___Leaf_Mold", 0.8734),
        ]));

        let top = classify_image(model, blank_bitmap()).await.unwrap();

        assert_eq!(top.label, "Tomato___Leaf_Mold");
        assert!(top.to_string().ends_with("87.34%"));
    }

    #[tokio::test]
    async fn test_empty_results_are_an_error() {
        let result = classify_image(canned(Ok(vec![])), blank_bitmap()).await;
        assert_eq!(result, Err(ClassifyError::EmptyResult));
    }

    #[tokio::test]
    async fn test_classifier_errors_pass_through() {
        let model = canned(Err(ClassifyError::MalformedOutput("bad".to_string())));
        let result = classify_image(model, blank_bitmap()).await;
        assert_eq!(result, Err(ClassifyError::MalformedOutput("bad".to_string())));
    }

    #[tokio::test]
    async fn test_missing_model_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            model_path: dir.path().join("classifier.onnx"),
            ..Config::default()
        };

        let result = load_model(config).await;
        assert!(matches!(result, Err(ClassifyError::ModelNotFound(_))));
    }
}
