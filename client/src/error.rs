use thiserror::Error;

/// Terminal failure of one analysis attempt. Nothing here is retried beyond
/// the single multipart-to-JSON fallback in [`crate::api::Analyzer`].
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    Server(u16),
    #[error("could not interpret server response")]
    UnparseableResponse,
    #[error("invalid image: {0}")]
    InvalidImage(#[from] image::ImageError),
    #[error("invalid endpoint URL: {0}")]
    Config(#[from] url::ParseError),
}
