//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides which variants to produce) and the
//! [`backend`](super::backend) (which does the actual pixel work). The
//! separation allows swapping backends (e.g. for testing with a mock)
//! without changing pipeline logic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
///
/// Config carries quality as a plain integer and converts through
/// [`new`](Self::new) so the clamp always applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Output format for generated variants.
///
/// The manifest contract offers every breakpoint in both formats, so the
/// builder always encodes the full pair. The encoder itself is
/// format-agnostic and takes one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Webp,
}

impl OutputFormat {
    /// File extension used in variant paths (`jpg`, `webp`).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }

    /// MIME type for `<source type=...>` negotiation.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    /// Both variant formats, richer format first (browser preference order).
    pub fn all() -> [Self; 2] {
        [Self::Webp, Self::Jpeg]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A named target width at which derivative images are generated.
///
/// Declared in `gallery.toml`; the name becomes both the variant filename
/// suffix (`dawn-thumb.jpg`) and the key in the manifest's `versions` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Breakpoint {
    pub name: String,
    pub width: u32,
}

impl Breakpoint {
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

/// Parameters for a resize-and-encode operation producing one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Target width in pixels. Height is derived from the source aspect ratio.
    pub target_width: u32,
    pub format: OutputFormat,
    pub quality: Quality,
}

/// Parameters for a quality-only JPEG re-encode at original dimensions.
///
/// Unlike [`VariantParams`], the source's embedded metadata (EXIF, ICC,
/// IPTC) is carried over into the output.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub quality: Quality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(80).value(), 80);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_80() {
        assert_eq!(Quality::default().value(), 80);
    }

    #[test]
    fn format_extensions() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Webp.extension(), "webp");
    }

    #[test]
    fn format_order_prefers_webp() {
        assert_eq!(OutputFormat::all(), [OutputFormat::Webp, OutputFormat::Jpeg]);
    }
}
