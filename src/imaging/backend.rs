//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the four operations every backend must
//! support: identify, read_capture, encode_variant, and compress.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Pipeline logic is
//! backend-agnostic so tests can run against a recording mock without
//! touching pixels.

use super::exif_parser::ExifCapture;
use super::params::{CompressParams, VariantParams};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("source not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid target width: {0}")]
    InvalidWidth(u32),
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("decode failed: {0}")]
    DecodeFailed(String),
    #[error("encode failed: {0}")]
    EncodeFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Every backend implements all four operations so the build pipeline and
/// the compress tool stay backend-agnostic.
pub trait ImageBackend: Sync {
    /// Get image dimensions. A metadata probe, not a full decode.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Read embedded capture metadata. Missing or garbled metadata yields
    /// an empty [`ExifCapture`], not an error.
    fn read_capture(&self, path: &Path) -> Result<ExifCapture, BackendError>;

    /// Resize by width and encode one variant.
    fn encode_variant(&self, params: &VariantParams) -> Result<(), BackendError>;

    /// Quality-only JPEG re-encode at original size, metadata preserved.
    fn compress(&self, params: &CompressParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::OutputFormat;
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        pub identify_results: Mutex<Vec<Dimensions>>,
        pub capture_results: Mutex<Vec<ExifCapture>>,
        pub operations: Mutex<Vec<RecordedOp>>,
        /// Paths whose encode should fail, for partial-failure tests.
        pub failing_sources: Vec<PathBuf>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        ReadCapture(String),
        EncodeVariant {
            source: String,
            output: String,
            target_width: u32,
            format: OutputFormat,
            quality: u32,
        },
        Compress {
            source: String,
            output: String,
            quality: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dims: Vec<Dimensions>) -> Self {
            Self {
                identify_results: Mutex::new(dims),
                ..Self::default()
            }
        }

        pub fn with_capture(dims: Vec<Dimensions>, capture: Vec<ExifCapture>) -> Self {
            Self {
                identify_results: Mutex::new(dims),
                capture_results: Mutex::new(capture),
                ..Self::default()
            }
        }

        pub fn failing_on(mut self, source: PathBuf) -> Self {
            self.failing_sources.push(source);
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));

            if self.failing_sources.iter().any(|p| p == path) {
                return Err(BackendError::DecodeFailed("mock failure".to_string()));
            }

            self.identify_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::DecodeFailed("no mock dimensions".to_string()))
        }

        fn read_capture(&self, path: &Path) -> Result<ExifCapture, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::ReadCapture(path.to_string_lossy().to_string()));

            Ok(self
                .capture_results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_default())
        }

        fn encode_variant(&self, params: &VariantParams) -> Result<(), BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::EncodeVariant {
                    source: params.source.to_string_lossy().to_string(),
                    output: params.output.to_string_lossy().to_string(),
                    target_width: params.target_width,
                    format: params.format,
                    quality: params.quality.value(),
                });
            if self.failing_sources.iter().any(|p| p == &params.source) {
                return Err(BackendError::EncodeFailed("mock failure".to_string()));
            }
            Ok(())
        }

        fn compress(&self, params: &CompressParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Compress {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                quality: params.quality.value(),
            });
            if self.failing_sources.iter().any(|p| p == &params.source) {
                return Err(BackendError::EncodeFailed("mock failure".to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 3000,
            height: 2000,
        }]);

        let dims = backend.identify(Path::new("/photos/dawn.jpg")).unwrap();
        assert_eq!(dims.width, 3000);
        assert_eq!(dims.height, 2000);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/photos/dawn.jpg"));
    }

    #[test]
    fn mock_records_encode_variant() {
        use crate::imaging::params::Quality;

        let backend = MockBackend::new();
        backend
            .encode_variant(&VariantParams {
                source: "/photos/dawn.jpg".into(),
                output: "/out/dawn-thumb.webp".into(),
                target_width: 400,
                format: OutputFormat::Webp,
                quality: Quality::new(80),
            })
            .unwrap();

        let ops = backend.get_operations();
        assert!(matches!(
            &ops[0],
            RecordedOp::EncodeVariant {
                target_width: 400,
                format: OutputFormat::Webp,
                quality: 80,
                ..
            }
        ));
    }

    #[test]
    fn mock_fails_on_marked_source() {
        let backend =
            MockBackend::with_dimensions(vec![]).failing_on(PathBuf::from("/photos/bad.jpg"));
        let result = backend.identify(Path::new("/photos/bad.jpg"));
        assert!(matches!(result, Err(BackendError::DecodeFailed(_))));
    }
}
