use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{info, warn};
use reqwest::multipart::{Form, Part};
use serde_json::json;
use shared::{AnalysisRequest, AnalysisResult};

use crate::config::ApiConfig;
use crate::error::AnalysisError;
use crate::mock;
use crate::normalize::Normalizer;

/// Client-side submission service: one multipart POST, one JSON fallback,
/// then normalization. Stateless across calls.
#[derive(Clone)]
pub struct Analyzer {
    http: reqwest::Client,
    config: ApiConfig,
    normalizer: Normalizer,
}

impl Analyzer {
    pub fn new(config: ApiConfig) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        let normalizer = Normalizer::new(config.base_url.clone(), config.default_confidence);
        Ok(Self {
            http,
            config,
            normalizer,
        })
    }

    /// Submits one image and returns its normalized verdict.
    ///
    /// The multipart upload is tried first. Only a transport-level failure
    /// triggers the JSON fallback; an HTTP error status is already an answer
    /// from the server and is surfaced as [`AnalysisError::Server`] without a
    /// second attempt. There is no retry loop beyond that single fallback.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
        original_image_url: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        if self.config.mock {
            info!("Mock mode enabled, skipping upload");
            return Ok(mock::mock_result(original_image_url));
        }

        let response = match self.post_multipart(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!("Multipart upload failed ({}), retrying as JSON", err);
                self.post_json(request).await?
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Server(status.as_u16()));
        }

        let body = response.text().await?;
        self.normalizer.normalize(&body, original_image_url)
    }

    async fn post_multipart(
        &self,
        request: &AnalysisRequest,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let part = Part::bytes(request.bytes.clone())
            .file_name(request.file_name.clone())
            .mime_str(&request.content_type)?;
        let form = Form::new().part("image", part);
        self.http
            .post(&self.config.endpoint)
            .multipart(form)
            .send()
            .await
    }

    async fn post_json(
        &self,
        request: &AnalysisRequest,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.http
            .post(&self.config.endpoint)
            .json(&json_payload(request))
            .send()
            .await
    }
}

/// JSON-body form of the upload, for servers that reject multipart content.
pub fn json_payload(request: &AnalysisRequest) -> serde_json::Value {
    json!({ "image": BASE64.encode(&request.bytes) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_payload_carries_base64_under_image_key() {
        let request = AnalysisRequest {
            bytes: b"hello".to_vec(),
            content_type: "image/jpeg".to_string(),
            file_name: "uploaded_image.jpg".to_string(),
        };
        let payload = json_payload(&request);
        assert_eq!(payload["image"], "aGVsbG8=");
    }
}
