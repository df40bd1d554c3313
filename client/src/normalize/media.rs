use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

/// Field names that various backend revisions have used for the annotated
/// image, checked in this order.
const IMAGE_PATH_FIELDS: [&str; 8] = [
    "ProcessedImageUrl",
    "processedImageUrl",
    "processed_image_url",
    "file_path",
    "image_path",
    "media_path",
    "media",
    "path",
];

lazy_static! {
    static ref MEDIA_PATH_RE: Regex = Regex::new(r#"/media/[^\s"']+"#).unwrap();
}

/// First non-empty string under any of the known image-path fields.
pub fn processed_image_path(body: &Map<String, Value>) -> Option<&str> {
    IMAGE_PATH_FIELDS.iter().find_map(|field| {
        body.get(*field)
            .and_then(Value::as_str)
            .filter(|path| !path.is_empty())
    })
}

/// Server-relative media paths need the base URL prepended; anything else
/// (typically already an absolute URL) is used verbatim.
pub fn is_media_path(path: &str) -> bool {
    path.contains("/media/") || path.starts_with("media/")
}

pub fn resolve_media_url(path: &str, base_url: &str) -> String {
    if path.starts_with("http") {
        return path.to_string();
    }
    if path.starts_with('/') {
        format!("{}{}", base_url, path)
    } else {
        format!("{}/{}", base_url, path)
    }
}

/// Scrapes a `/media/...` path out of a plain-text body.
pub fn find_media_path(text: &str) -> Option<&str> {
    MEDIA_PATH_RE.find(text).map(|found| found.as_str())
}
