use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;
use image::imageops::FilterType;
use shared::AnalysisRequest;

use crate::error::AnalysisError;

/// Edge length the backend model was tuned for.
pub const UPLOAD_EDGE: u32 = 600;

/// Content type for the multipart part, guessed from the file extension the
/// way the original pickers did: PNG stays PNG, everything else goes as JPEG.
pub fn content_type_for(file_name: &str) -> &'static str {
    match Path::new(file_name).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        _ => "image/jpeg",
    }
}

/// Wraps raw file bytes into a request without touching them.
pub fn request_from_bytes(bytes: Vec<u8>, file_name: &str) -> AnalysisRequest {
    AnalysisRequest {
        content_type: content_type_for(file_name).to_string(),
        file_name: file_name.to_string(),
        bytes,
    }
}

/// Re-encodes the picked image as a 600x600 JPEG before upload, the shape the
/// classification endpoint expects.
pub fn resize_for_upload(bytes: &[u8]) -> Result<AnalysisRequest, AnalysisError> {
    let decoded = image::load_from_memory(bytes)?;
    let resized = decoded.resize_exact(UPLOAD_EDGE, UPLOAD_EDGE, FilterType::Triangle);

    let mut encoded = Cursor::new(Vec::new());
    // JPEG has no alpha channel; flatten before encoding.
    image::DynamicImage::ImageRgb8(resized.to_rgb8()).write_to(&mut encoded, ImageFormat::Jpeg)?;

    Ok(AnalysisRequest {
        bytes: encoded.into_inner(),
        content_type: "image/jpeg".to_string(),
        file_name: "uploaded_image.jpg".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for("shot.PNG"), "image/png");
        assert_eq!(content_type_for("shot.jpg"), "image/jpeg");
        assert_eq!(content_type_for("no_extension"), "image/jpeg");
    }

    #[test]
    fn resize_produces_a_square_jpeg() {
        let source = image::DynamicImage::new_rgba8(32, 48);
        let mut bytes = Cursor::new(Vec::new());
        source
            .write_to(&mut bytes, ImageFormat::Png)
            .expect("encodes");

        let request = resize_for_upload(&bytes.into_inner()).expect("resizes");
        assert_eq!(request.content_type, "image/jpeg");

        let roundtrip = image::load_from_memory(&request.bytes).expect("decodes");
        assert_eq!(roundtrip.width(), UPLOAD_EDGE);
        assert_eq!(roundtrip.height(), UPLOAD_EDGE);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(matches!(
            resize_for_upload(b"not an image"),
            Err(AnalysisError::InvalidImage(_))
        ));
    }
}
