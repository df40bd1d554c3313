use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Verdict of the remote classifier for a single image.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Label {
    Real,
    Fake,
    Unknown,
}

impl Label {
    pub fn from_bool(is_fake: bool) -> Label {
        if is_fake { Label::Fake } else { Label::Real }
    }

    /// Reads a label out of free-form backend text ("FAKE", "The image looks
    /// real", ...). "fake" is checked first so that text mentioning both
    /// keywords keeps the warning verdict.
    pub fn from_text(text: &str) -> Option<Label> {
        let lowered = text.trim().to_lowercase();
        if lowered.contains("fake") {
            Some(Label::Fake)
        } else if lowered.contains("real") {
            Some(Label::Real)
        } else {
            None
        }
    }
}

/// One image upload: the bytes plus what the multipart part should say about
/// them. Built once at pick time, consumed by a single submission.
#[derive(Serialize, Deserialize, Clone)]
pub struct AnalysisRequest {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}

/// Normalized classifier output, whatever shape the backend answered in.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AnalysisResult {
    pub label: Label,
    /// Always an integer percentage in 0..=100.
    pub confidence: u8,
    /// Absolute URL of the server-annotated image, or the original image URL
    /// when the server returned none.
    pub processed_image_url: Option<String>,
}
