//! Image processing — `image` crate decoders + libwebp encoding.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Capture metadata** | custom parser (JPEG APP1 + TIFF IFD) |
//! | **Resize → JPEG/WebP** | Lanczos3 + `JpegEncoder` / libwebp |
//! | **Compress** | full-size JPEG re-encode with metadata splice |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Variant planning and execution combining the above

pub mod backend;
mod calculations;
pub mod exif_parser;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{aspect_ratio, clamp_target_width, scaled_height};
pub use exif_parser::ExifCapture;
pub use operations::{PlannedVariant, VariantOutcome, VariantStatus, encode_planned, plan_variants};
pub use params::{Breakpoint, CompressParams, OutputFormat, Quality, VariantParams};
pub use rust_backend::{RustBackend, is_source_image};
