use rand::Rng;
use shared::{AnalysisResult, Label};

use crate::normalize::normalize_confidence;

/// Stand-in for the remote classifier: a coin-flip verdict with a random
/// confidence. Lets the front-end be exercised before the backend is
/// reachable.
pub fn mock_result(original_image_url: &str) -> AnalysisResult {
    let mut rng = rand::rng();
    let label = if rng.random_bool(0.5) {
        Label::Fake
    } else {
        Label::Real
    };
    AnalysisResult {
        label,
        confidence: normalize_confidence(rng.random_range(0.0..100.0)),
        processed_image_url: Some(original_image_url.to_string()),
    }
}
