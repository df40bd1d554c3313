use std::env;
use std::time::Duration;

use url::Url;

use crate::error::AnalysisError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/process-image/";

/// Everything the submitter and normalizer need to know about the backend.
/// Threaded explicitly into the services instead of living in process-wide
/// mutable state, so repeated or concurrent runs stay independent.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Full URL of the classification endpoint.
    pub endpoint: String,
    /// Scheme + host of the endpoint, used to resolve server-relative
    /// media paths into absolute URLs.
    pub base_url: String,
    pub timeout: Duration,
    /// Confidence reported when the backend omits one. The original backends
    /// never documented theirs, so this stays adjustable.
    pub default_confidence: f64,
    /// Skip the network and answer with a random verdict.
    pub mock: bool,
}

impl ApiConfig {
    pub fn new(endpoint: &str) -> Result<Self, AnalysisError> {
        let parsed = Url::parse(endpoint)?;
        let host = parsed.host_str().ok_or(url::ParseError::EmptyHost)?;
        let base_url = match parsed.port() {
            Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
            None => format!("{}://{}", parsed.scheme(), host),
        };

        Ok(Self {
            endpoint: endpoint.to_string(),
            base_url,
            timeout: Duration::from_secs(30),
            default_confidence: 95.0,
            mock: false,
        })
    }

    /// Environment-driven configuration, same pattern as the server side:
    /// `.env` is loaded by the binary, values are read here.
    pub fn from_env() -> Result<Self, AnalysisError> {
        let endpoint =
            env::var("DEEPSHIELD_API_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let mut config = Self::new(&endpoint)?;

        if let Ok(secs) = env::var("DEEPSHIELD_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.timeout = Duration::from_secs(secs);
            }
        }

        config.mock = env::var("DEEPSHIELD_MOCK_API")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(config)
    }
}
