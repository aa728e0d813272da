//! Validation and encoding of generated images.
//!
//! The model returns images as base64 inline data. They are checked here and
//! handed to the rest of the application as `data:` URIs.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{ImageFormat, ImageReader};

/// Image formats accepted from the model.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum decoded size for a generated image (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Validate image data: check format is allowed and detect content type.
///
/// Returns the content type on success (e.g., "image/jpeg").
pub fn validate_image(data: &[u8]) -> Result<String, String> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Failed to read image: {}", e))?;

    let format = reader
        .format()
        .ok_or_else(|| "Could not detect image format".to_string())?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(format!(
            "Unsupported image format: {:?}. Allowed: JPEG, PNG, GIF, WebP",
            format
        ));
    }

    Ok(format.to_mime_type().to_string())
}

/// Turn base64 inline data from the model into a `data:` URI.
///
/// The declared MIME type wins when present; otherwise the detected one is used.
pub fn inline_data_to_uri(data_b64: &str, declared_mime: Option<&str>) -> Result<String, String> {
    let bytes = STANDARD
        .decode(data_b64.trim())
        .map_err(|e| format!("Invalid base64 image data: {}", e))?;

    if bytes.is_empty() {
        return Err("Image data is empty".to_string());
    }

    if bytes.len() > MAX_FILE_SIZE {
        return Err(format!(
            "Image too large: {} bytes (max {})",
            bytes.len(),
            MAX_FILE_SIZE
        ));
    }

    let detected = validate_image(&bytes)?;
    let mime = declared_mime
        .filter(|m| m.starts_with("image/"))
        .map(str::to_string)
        .unwrap_or(detected);

    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(&bytes)))
}

#[cfg(test)]
pub(crate) fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 120, 40]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}
