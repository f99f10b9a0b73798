//! Gallery data model and navigable view.
//!
//! The manifest is an ordered sequence of [`GalleryEntry`] records — the
//! contract between the build pipeline and any presentation layer. This
//! module also models the viewer behavior independently of the DOM:
//! [`GalleryView`] is an index cursor over the sequence that wraps modulo
//! the length in both directions, exactly what the lightbox's next/prev
//! buttons do. The shipped page script mirrors this logic.

use crate::imaging::OutputFormat;
use crate::metadata::CaptureMetadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One manifest record per source photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryEntry {
    /// Original filename within the source directory.
    pub filename: String,
    /// Path of the original, as served (e.g. `images/dawn.jpg`).
    pub original: String,
    /// Intrinsic pixel width of the original.
    pub width: u32,
    /// Intrinsic pixel height of the original.
    pub height: u32,
    /// `width / height`, for grid placeholder sizing.
    #[serde(rename = "aspectRatio")]
    pub aspect_ratio: f64,
    /// Breakpoint name → generated variant paths and resolved width.
    pub versions: BTreeMap<String, VariantSet>,
    /// Formatted capture metadata; absent when the original carries none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture: Option<CaptureMetadata>,
}

/// Both format paths plus the resolved width for one breakpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSet {
    pub jpg: String,
    pub webp: String,
    pub width: u32,
}

impl GalleryEntry {
    /// Source preference list for `<picture>` rendering: one `(mime,
    /// srcset)` pair per format, richer format first, widths ascending
    /// with `w` descriptors. The browser negotiates; the renderer only
    /// offers.
    pub fn source_sets(&self) -> Vec<(&'static str, String)> {
        let mut variants: Vec<&VariantSet> = self.versions.values().collect();
        variants.sort_by_key(|v| v.width);
        variants.dedup_by_key(|v| v.width);

        OutputFormat::all()
            .into_iter()
            .map(|format| {
                let srcset = variants
                    .iter()
                    .map(|v| {
                        let path = match format {
                            OutputFormat::Jpeg => &v.jpg,
                            OutputFormat::Webp => &v.webp,
                        };
                        format!("{path} {}w", v.width)
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                (format.mime_type(), srcset)
            })
            .collect()
    }

    /// Widest JPEG variant path, the `<img>` fallback source.
    pub fn fallback_src(&self) -> Option<&str> {
        self.versions
            .values()
            .max_by_key(|v| v.width)
            .map(|v| v.jpg.as_str())
    }
}

/// An index cursor over an ordered gallery, wrapping in both directions.
///
/// Construction fails on an empty sequence, so `current()` always has an
/// entry to return.
#[derive(Debug)]
pub struct GalleryView<'a> {
    entries: &'a [GalleryEntry],
    index: usize,
}

impl<'a> GalleryView<'a> {
    /// View over `entries` starting at index 0. `None` when empty.
    pub fn new(entries: &'a [GalleryEntry]) -> Option<Self> {
        (!entries.is_empty()).then_some(Self { entries, index: 0 })
    }

    /// View opened at a specific index (clicking a grid tile). `None` when
    /// empty or out of range.
    pub fn open_at(entries: &'a [GalleryEntry], index: usize) -> Option<Self> {
        (index < entries.len()).then_some(Self { entries, index })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        false // construction rejects empty sequences
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &'a GalleryEntry {
        &self.entries[self.index]
    }

    /// Move to the next entry, wrapping past the end to index 0.
    pub fn advance(&mut self) -> &'a GalleryEntry {
        self.index = (self.index + 1) % self.entries.len();
        self.current()
    }

    /// Move to the previous entry, wrapping past index 0 to the end.
    pub fn retreat(&mut self) -> &'a GalleryEntry {
        self.index = (self.index + self.entries.len() - 1) % self.entries.len();
        self.current()
    }
}
