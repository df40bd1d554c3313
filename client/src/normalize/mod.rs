mod media;
mod rules;

use serde_json::{Map, Value};
use shared::{AnalysisResult, Label};

use crate::error::AnalysisError;

pub use media::resolve_media_url;

/// Confidence attached when a response carries an annotated image but no
/// recognizable label field.
const UNKNOWN_CONFIDENCE: f64 = 50.0;

/// Turns whatever the classification backend answered into a uniform
/// [`AnalysisResult`]. The backend contract is unversioned and has shipped in
/// several shapes; the cascade here is the union of all of them, evaluated
/// first-match-wins. Pure function of its inputs.
#[derive(Clone, Debug)]
pub struct Normalizer {
    base_url: String,
    default_confidence: f64,
}

impl Normalizer {
    pub fn new(base_url: String, default_confidence: f64) -> Self {
        Self {
            base_url,
            default_confidence,
        }
    }

    /// `raw_body` is tried as JSON first and as plain text if that fails.
    /// `original_image_url` is the locally-held image, the ultimate fallback
    /// for the processed-image slot.
    pub fn normalize(
        &self,
        raw_body: &str,
        original_image_url: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        match serde_json::from_str::<Value>(raw_body) {
            Ok(Value::Object(body)) => self.normalize_json(&body, original_image_url),
            // A bare JSON scalar has no fields for the cascade to read.
            Ok(_) => Err(AnalysisError::UnparseableResponse),
            Err(_) => self.normalize_text(raw_body, original_image_url),
        }
    }

    fn normalize_json(
        &self,
        body: &Map<String, Value>,
        original_image_url: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let processed_url = media::processed_image_path(body).map(|path| {
            if media::is_media_path(path) {
                media::resolve_media_url(path, &self.base_url)
            } else {
                path.to_string()
            }
        });

        for rule in rules::LABEL_RULES {
            if let Some(verdict) = rule.evaluate(body) {
                log::debug!("label settled by field '{}'", rule.field);
                return Ok(AnalysisResult {
                    label: verdict.label,
                    confidence: normalize_confidence(
                        verdict.confidence.unwrap_or(self.default_confidence),
                    ),
                    processed_image_url: Some(
                        processed_url.unwrap_or_else(|| original_image_url.to_string()),
                    ),
                });
            }
        }

        // No label field, but the server did hand back an annotated image.
        if processed_url.is_some() {
            return Ok(AnalysisResult {
                label: Label::Unknown,
                confidence: normalize_confidence(UNKNOWN_CONFIDENCE),
                processed_image_url: processed_url,
            });
        }

        Err(AnalysisError::UnparseableResponse)
    }

    fn normalize_text(
        &self,
        text: &str,
        original_image_url: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        if let Some(path) = media::find_media_path(text) {
            let label = if text.to_lowercase().contains("fake") {
                Label::Fake
            } else {
                Label::Real
            };
            return Ok(AnalysisResult {
                label,
                confidence: normalize_confidence(self.default_confidence),
                processed_image_url: Some(media::resolve_media_url(path, &self.base_url)),
            });
        }

        if let Some(label) = Label::from_text(text) {
            return Ok(AnalysisResult {
                label,
                confidence: normalize_confidence(self.default_confidence),
                processed_image_url: Some(original_image_url.to_string()),
            });
        }

        Err(AnalysisError::UnparseableResponse)
    }
}

/// Fractions strictly between 0 and 1 are read as ratios and scaled to
/// percent; everything is then ceil-rounded and clamped into 0..=100.
pub fn normalize_confidence(raw: f64) -> u8 {
    let mut value = if raw.is_finite() { raw } else { 0.0 };
    if value > 0.0 && value < 1.0 {
        value *= 100.0;
    }
    value.ceil().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new("https://api.example.com".to_string(), 95.0)
    }

    const ORIGINAL: &str = "file:///tmp/picked.jpg";

    #[test]
    fn fractional_confidence_scales_and_rounds_up() {
        assert_eq!(normalize_confidence(0.8732), 88);
        assert_eq!(normalize_confidence(0.5), 50);
        assert_eq!(normalize_confidence(87.32), 88);
        assert_eq!(normalize_confidence(100.0), 100);
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(normalize_confidence(250.0), 100);
        assert_eq!(normalize_confidence(-3.0), 0);
        assert_eq!(normalize_confidence(f64::NAN), 0);
    }

    #[test]
    fn capitalized_prediction_with_fraction() {
        let result = normalizer()
            .normalize(r#"{"Prediction": "Fake", "confidence": 0.8732}"#, ORIGINAL)
            .expect("normalizes");
        assert_eq!(result.label, Label::Fake);
        assert_eq!(result.confidence, 88);
        assert_eq!(result.processed_image_url.as_deref(), Some(ORIGINAL));
    }

    #[test]
    fn is_fake_without_confidence_uses_default() {
        let result = normalizer()
            .normalize(r#"{"is_fake": true}"#, ORIGINAL)
            .expect("normalizes");
        assert_eq!(result.label, Label::Fake);
        assert_eq!(result.confidence, 95);
    }

    #[test]
    fn image_only_response_is_unknown_at_fifty() {
        let result = normalizer()
            .normalize(r#"{"file_path": "/media/out/123.jpg"}"#, ORIGINAL)
            .expect("normalizes");
        assert_eq!(result.label, Label::Unknown);
        assert_eq!(result.confidence, 50);
        assert_eq!(
            result.processed_image_url.as_deref(),
            Some("https://api.example.com/media/out/123.jpg")
        );
    }

    #[test]
    fn text_body_with_keyword_falls_back_to_original_image() {
        let result = normalizer()
            .normalize("The result is FAKE", ORIGINAL)
            .expect("normalizes");
        assert_eq!(result.label, Label::Fake);
        assert_eq!(result.confidence, 95);
        assert_eq!(result.processed_image_url.as_deref(), Some(ORIGINAL));
    }

    #[test]
    fn text_body_with_media_path_resolves_it() {
        let result = normalizer()
            .normalize("fake, saved to /media/out/9.png", ORIGINAL)
            .expect("normalizes");
        assert_eq!(result.label, Label::Fake);
        assert_eq!(
            result.processed_image_url.as_deref(),
            Some("https://api.example.com/media/out/9.png")
        );
    }

    #[test]
    fn unrecognizable_text_fails() {
        let err = normalizer().normalize("banana", ORIGINAL).unwrap_err();
        assert!(matches!(err, AnalysisError::UnparseableResponse));
    }

    #[test]
    fn json_scalar_fails() {
        let err = normalizer().normalize(r#""fake""#, ORIGINAL).unwrap_err();
        assert!(matches!(err, AnalysisError::UnparseableResponse));
    }

    #[test]
    fn capitalized_prediction_beats_lowercase() {
        let result = normalizer()
            .normalize(
                r#"{"Prediction": "Real", "prediction": "fake", "is_fake": true}"#,
                ORIGINAL,
            )
            .expect("normalizes");
        assert_eq!(result.label, Label::Real);
    }

    #[test]
    fn falsy_capitalized_prediction_yields_to_lowercase() {
        let result = normalizer()
            .normalize(r#"{"Prediction": "", "prediction": "fake"}"#, ORIGINAL)
            .expect("normalizes");
        assert_eq!(result.label, Label::Fake);
    }

    #[test]
    fn result_field_with_score() {
        let result = normalizer()
            .normalize(r#"{"result": true, "score": 0.61}"#, ORIGINAL)
            .expect("normalizes");
        assert_eq!(result.label, Label::Fake);
        assert_eq!(result.confidence, 61);
    }

    #[test]
    fn processed_image_cascade_applies_to_label_branches_too() {
        let result = normalizer()
            .normalize(
                r#"{"is_fake": false, "processed_image_url": "media/out/4.jpg"}"#,
                ORIGINAL,
            )
            .expect("normalizes");
        assert_eq!(result.label, Label::Real);
        assert_eq!(
            result.processed_image_url.as_deref(),
            Some("https://api.example.com/media/out/4.jpg")
        );
    }

    #[test]
    fn non_media_paths_are_used_verbatim() {
        let result = normalizer()
            .normalize(
                r#"{"is_fake": true, "file_path": "https://cdn.example.com/out.jpg"}"#,
                ORIGINAL,
            )
            .expect("normalizes");
        assert_eq!(
            result.processed_image_url.as_deref(),
            Some("https://cdn.example.com/out.jpg")
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let normalizer = normalizer();
        let body = r#"{"prediction": "fake", "confidence": 0.42}"#;
        let first = normalizer.normalize(body, ORIGINAL).expect("normalizes");
        let second = normalizer.normalize(body, ORIGINAL).expect("normalizes");
        assert_eq!(first, second);
    }

    #[test]
    fn default_confidence_is_configurable() {
        let normalizer = Normalizer::new("https://api.example.com".to_string(), 80.0);
        let result = normalizer
            .normalize(r#"{"is_fake": true}"#, ORIGINAL)
            .expect("normalizes");
        assert_eq!(result.confidence, 80);
    }
}
