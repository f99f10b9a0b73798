//! Pure Rust image processing backend (plus libwebp for lossy WebP).
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` |
//! | Decode (JPEG, PNG, WebP) | `image` crate |
//! | Resize | `image::imageops` Lanczos3 via `DynamicImage::resize_exact` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Encode → WebP | `webp` crate (the `image` crate's WebP encoder is lossless-only) |
//! | Capture metadata | custom `exif_parser` (JPEG APP1 + TIFF IFD) |
//!
//! The compression-only path re-encodes a JPEG at its original dimensions
//! and splices the source's APPn metadata segments (EXIF, ICC, IPTC) into
//! the new stream; the resize path simply never carries metadata through.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::scaled_height;
use super::exif_parser::{self, ExifCapture};
use super::params::{CompressParams, OutputFormat, VariantParams};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Source extensions with decoders compiled in.
const SOURCE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Returns true when the filename has a recognized source image extension
/// (case-insensitive).
pub fn is_source_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Production backend over the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk. Missing files map to `NotFound` so
/// callers can report them distinctly from decode corruption.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    if !path.exists() {
        return Err(BackendError::NotFound(path.to_path_buf()));
    }
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::DecodeFailed(format!("failed to decode {}: {}", path.display(), e))
        })
}

/// Encode to JPEG bytes at the given quality.
fn encode_jpeg(img: &DynamicImage, quality: u32) -> Result<Vec<u8>, BackendError> {
    let rgb = img.to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality as u8)
        .encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| BackendError::EncodeFailed(format!("JPEG encode failed: {e}")))?;
    Ok(bytes)
}

/// Encode to lossy WebP bytes at the given quality.
fn encode_webp(img: &DynamicImage, quality: u32) -> Result<Vec<u8>, BackendError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let encoder = webp::Encoder::from_image(&rgb)
        .map_err(|e| BackendError::EncodeFailed(format!("WebP encode failed: {e}")))?;
    Ok(encoder.encode(quality as f32).to_vec())
}

/// Splice the source JPEG's metadata segments into a freshly encoded JPEG.
///
/// Copies APP1 (EXIF/XMP), APP2 (ICC profile) and APP13 (IPTC) verbatim,
/// inserted right after any APP0/JFIF header of the encoded stream. Returns
/// the encoded bytes unchanged when the source carries no such segments or
/// either stream is not a JPEG.
fn splice_metadata(source: &[u8], encoded: Vec<u8>) -> Vec<u8> {
    let carried: Vec<_> = exif_parser::app_segments(source)
        .into_iter()
        .filter(|(marker, _)| matches!(marker, 0xE1 | 0xE2 | 0xED))
        .collect();
    if carried.is_empty() || !encoded.starts_with(&[0xFF, 0xD8]) {
        return encoded;
    }

    // Insert after SOI and any APP0 segment the encoder emitted.
    let mut insert_at = 2;
    if let Some((0xE0, range)) = exif_parser::app_segments(&encoded).first() {
        insert_at = range.end;
    }

    let mut out = Vec::with_capacity(encoded.len() + source.len() / 4);
    out.extend_from_slice(&encoded[..insert_at]);
    for (_, range) in carried {
        out.extend_from_slice(&source[range]);
    }
    out.extend_from_slice(&encoded[insert_at..]);
    out
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        if !path.exists() {
            return Err(BackendError::NotFound(path.to_path_buf()));
        }
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::DecodeFailed(format!(
                "failed to read dimensions of {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Dimensions { width, height })
    }

    fn read_capture(&self, path: &Path) -> Result<ExifCapture, BackendError> {
        Ok(exif_parser::read_exif(path))
    }

    fn encode_variant(&self, params: &VariantParams) -> Result<(), BackendError> {
        if params.target_width == 0 {
            return Err(BackendError::InvalidWidth(0));
        }

        let img = load_image(&params.source)?;
        let height = scaled_height((img.width(), img.height()), params.target_width);
        let resized = img.resize_exact(params.target_width, height.max(1), FilterType::Lanczos3);

        let bytes = match params.format {
            OutputFormat::Jpeg => encode_jpeg(&resized, params.quality.value())?,
            OutputFormat::Webp => encode_webp(&resized, params.quality.value())?,
        };
        std::fs::write(&params.output, bytes).map_err(BackendError::Io)
    }

    fn compress(&self, params: &CompressParams) -> Result<(), BackendError> {
        if !params.source.exists() {
            return Err(BackendError::NotFound(params.source.clone()));
        }
        let source_bytes = std::fs::read(&params.source).map_err(BackendError::Io)?;
        let img = image::load_from_memory(&source_bytes).map_err(|e| {
            BackendError::DecodeFailed(format!(
                "failed to decode {}: {}",
                params.source.display(),
                e
            ))
        })?;

        let encoded = encode_jpeg(&img, params.quality.value())?;
        let with_metadata = splice_metadata(&source_bytes, encoded);
        std::fs::write(&params.output, with_metadata).map_err(BackendError::Io)
    }
}
