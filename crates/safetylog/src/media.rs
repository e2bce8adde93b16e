//! Photo processing.
//!
//! A selected photo is read fully, decoded, shrunk to at most the configured
//! width (aspect ratio preserved, never enlarged) and re-encoded as JPEG. The
//! result is an embedded `data:image/jpeg;base64,...` payload that can be
//! stored inside the observation record itself.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::debug;

use crate::error::{Error, Result};

/// Default maximum width of a stored photo, in pixels.
pub const DEFAULT_MAX_WIDTH: u32 = 1400;

/// Default JPEG quality (0.82 on a 0..1 scale).
pub const DEFAULT_QUALITY: u8 = 82;

/// A processed photo ready to be attached to an observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPayload {
    /// Embedded image payload.
    pub data_url: String,
    /// Width of the encoded image.
    pub width: u32,
    /// Height of the encoded image.
    pub height: u32,
}

/// Turns photo files into size-bounded embedded payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoPipeline {
    max_width: u32,
    quality: u8,
}

impl Default for PhotoPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WIDTH, DEFAULT_QUALITY)
    }
}

impl PhotoPipeline {
    /// Create a pipeline. `quality` is clamped to `1..=100`.
    #[must_use]
    pub fn new(max_width: u32, quality: u8) -> Self {
        Self {
            max_width: max_width.max(1),
            quality: quality.clamp(1, 100),
        }
    }

    /// Maximum output width.
    #[must_use]
    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    /// JPEG quality used for re-encoding.
    #[must_use]
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Process the photo at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Media`] if the file cannot be read, is not a
    /// decodable image, or cannot be re-encoded.
    pub fn process(&self, path: &Path) -> Result<PhotoPayload> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::media(path, format!("failed to read file: {e}")))?;
        self.process_bytes(path, &bytes)
    }

    fn process_bytes(&self, path: &Path, bytes: &[u8]) -> Result<PhotoPayload> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| Error::media(path, format!("invalid image: {e}")))?;

        let (width, height) = scaled_dimensions(img.width(), img.height(), self.max_width);
        let img = if (width, height) == (img.width(), img.height()) {
            img
        } else {
            debug!(
                "Scaling photo from {}x{} to {}x{}",
                img.width(),
                img.height(),
                width,
                height
            );
            img.resize_exact(width, height, FilterType::Triangle)
        };

        let rgb = img.to_rgb8();
        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, self.quality)
            .encode_image(&rgb)
            .map_err(|e| Error::media(path, format!("failed to encode image: {e}")))?;

        debug!(
            "Encoded {} as {} byte JPEG",
            path.display(),
            encoded.len()
        );

        Ok(PhotoPayload {
            data_url: format!("data:image/jpeg;base64,{}", STANDARD.encode(&encoded)),
            width,
            height,
        })
    }
}

/// Dimensions after shrinking to fit `max_width`.
///
/// The scale factor is `min(1, max_width / width)`, so images are never
/// enlarged. Results are rounded and never drop below one pixel.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scaled_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }

    let scale = f64::from(max_width) / f64::from(width);
    let scaled_width = (f64::from(width) * scale).round() as u32;
    let scaled_height = (f64::from(height) * scale).round() as u32;
    (scaled_width.max(1), scaled_height.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(width, height, Rgb([200, 40, 40]))
            .save(&path)
            .unwrap();
        path
    }

    fn decode_payload(payload: &PhotoPayload) -> image::DynamicImage {
        let encoded = payload
            .data_url
            .strip_prefix("data:image/jpeg;base64,")
            .expect("jpeg data url");
        let bytes = STANDARD.decode(encoded).unwrap();
        image::load_from_memory(&bytes).unwrap()
    }

    #[test]
    fn test_scaled_dimensions_never_upscales() {
        assert_eq!(scaled_dimensions(800, 600, 1400), (800, 600));
        assert_eq!(scaled_dimensions(1400, 700, 1400), (1400, 700));
    }

    #[test]
    fn test_scaled_dimensions_preserves_aspect() {
        assert_eq!(scaled_dimensions(2800, 1000, 1400), (1400, 500));
        assert_eq!(scaled_dimensions(4000, 3000, 1400), (1400, 1050));
        assert_eq!(scaled_dimensions(3000, 1001, 1400), (1400, 467));
    }

    #[test]
    fn test_scaled_dimensions_keeps_one_pixel() {
        assert_eq!(scaled_dimensions(10_000, 1, 100), (100, 1));
    }

    #[test]
    fn test_new_clamps_quality() {
        assert_eq!(PhotoPipeline::new(100, 0).quality(), 1);
        assert_eq!(PhotoPipeline::new(100, 250).quality(), 100);
        assert_eq!(PhotoPipeline::default().max_width(), DEFAULT_MAX_WIDTH);
    }

    #[test]
    fn test_wide_image_is_shrunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "wide.png", 2800, 1000);

        let payload = PhotoPipeline::default().process(&path).unwrap();
        assert_eq!((payload.width, payload.height), (1400, 500));
        assert!(payload.data_url.starts_with("data:image/jpeg;base64,"));

        let decoded = decode_payload(&payload);
        assert_eq!(decoded.dimensions(), (1400, 500));
    }

    #[test]
    fn test_narrow_image_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "narrow.png", 320, 240);

        let payload = PhotoPipeline::default().process(&path).unwrap();
        assert_eq!(decode_payload(&payload).dimensions(), (320, 240));
    }

    #[test]
    fn test_missing_file_is_media_error() {
        let err = PhotoPipeline::default()
            .process(Path::new("/nonexistent/photo.jpg"))
            .unwrap_err();
        assert!(matches!(err, Error::Media { .. }));
        assert!(err.to_string().contains("failed to read file"));
    }

    #[test]
    fn test_non_image_is_media_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "definitely not pixels").unwrap();

        let err = PhotoPipeline::default().process(&path).unwrap_err();
        assert!(matches!(err, Error::Media { .. }));
        assert!(err.to_string().contains("invalid image"));
    }
}
