/// Turning raw model scores into ranked classifications
use crate::config::OutputScale;
use crate::error::ClassifyError;

use super::Classification;

/// Numerically stable softmax
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Pair `scores` with `labels` and sort by descending confidence.
///
/// `shape` is the output tensor shape; it must hold exactly one score per
/// label (`[N]` or `[1, N]`).
pub fn classifications(
    shape: &[i64],
    scores: &[f32],
    labels: &[String],
    scale: OutputScale,
) -> Result<Vec<Classification>, ClassifyError> {
    let batch = match shape {
        [_] => 1,
        [batch, _] => *batch,
        _ => {
            return Err(ClassifyError::MalformedOutput(format!(
                "expected a [N] or [1, N] tensor, got {:?}",
                shape
            )))
        }
    };
    if batch != 1 {
        return Err(ClassifyError::MalformedOutput(format!(
            "expected a batch of 1, got {}",
            batch
        )));
    }

    if scores.is_empty() {
        return Err(ClassifyError::EmptyResult);
    }
    if scores.len() != labels.len() {
        return Err(ClassifyError::MalformedOutput(format!(
            "model produced {} scores for {} labels",
            scores.len(),
            labels.len()
        )));
    }
    if let Some(i) = scores.iter().position(|s| !s.is_finite()) {
        return Err(ClassifyError::MalformedOutput(format!(
            "non-finite score for '{}'",
            labels[i]
        )));
    }

    let confidences = match scale {
        OutputScale::Probabilities => scores.to_vec(),
        OutputScale::Logits => softmax(scores),
    };

    let mut results: Vec<Classification> = labels
        .iter()
        .zip(confidences)
        .map(|(label, confidence)| Classification::new(label.clone(), confidence.clamp(0.0, 1.0)))
        .collect();
    results.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_softmax_sums_to_one_and_keeps_order() {
        let probs = softmax(&[1.0, 3.0, 2.0]);

        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[1] > probs[2] && probs[2] > probs[0]);
    }

    #[test]
    fn test_softmax_large_logits_stay_finite() {
        let probs = softmax(&[1000.0, 1000.0]);
        assert!((probs[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sorted_descending() {
        let results = classifications(
            &[1, 3],
            &[0.1, 0.6, 0.3],
            &labels(&["bacterial_spot", "early_blight", "healthy"]),
            OutputScale::Probabilities,
        )
        .unwrap();

        let order: Vec<&str> = results.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(order, ["early_blight", "healthy", "bacterial_spot"]);
        assert_eq!(results[0].confidence, 0.6);
    }

    #[test]
    fn test_logits_go_through_softmax() {
        let results = classifications(&[2], &[0.0, 0.0], &labels(&["a", "b"]), OutputScale::Logits)
            .unwrap();
        assert!((results[0].confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_label_count_mismatch_is_malformed() {
        let err = classifications(&[1, 2], &[0.5, 0.5], &labels(&["a"]), OutputScale::Probabilities)
            .unwrap_err();
        assert!(matches!(err, ClassifyError::MalformedOutput(_)));
    }

    #[test]
    fn test_no_scores_is_empty() {
        let err = classifications(&[1, 0], &[], &[], OutputScale::Probabilities).unwrap_err();
        assert_eq!(err, ClassifyError::EmptyResult);
    }

    #[test]
    fn test_bad_shapes_are_malformed() {
        let names = labels(&["a", "b"]);
        assert!(classifications(&[2, 1], &[0.5, 0.5], &names, OutputScale::Probabilities).is_err());
        assert!(classifications(&[1, 1, 2], &[0.5, 0.5], &names, OutputScale::Probabilities).is_err());
    }

    #[test]
    fn test_nan_score_is_malformed() {
        let err = classifications(&[2], &[f32::NAN, 0.5], &labels(&["a", "b"]), OutputScale::Probabilities)
            .unwrap_err();
        assert!(matches!(err, ClassifyError::MalformedOutput(_)));
    }
}
