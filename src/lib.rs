//! # Photofolio
//!
//! A build tool for personal photography portfolio sites. Point it at a
//! folder of photos and it produces resized, recompressed variants at
//! fixed breakpoints, a JSON manifest describing every image, and a
//! single-page gallery with a lightbox viewer.
//!
//! # Architecture: One Pipeline, Three Artifacts
//!
//! ```text
//! images/  →  build  →  images/optimized/       (resized JPEG + WebP variants)
//!                    →  js/gallery-data.json    (ordered manifest, one entry per photo)
//!                    →  dist/index.html         (self-contained gallery page)
//! ```
//!
//! The manifest is the contract: the build pipeline writes it, the gallery
//! page fetches it at load, and nothing else is shared between the two
//! sides. Entries are sorted by filename so the manifest, and therefore the
//! gallery order, is deterministic across filesystems.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`process`] | The build pipeline — scan, parallel encode, manifest write |
//! | [`compress`] | Standalone quality-only recompression of named files |
//! | [`render`] | Generates the gallery page with Maud, assets inlined |
//! | [`gallery`] | Manifest entry types and the wrapping navigation cursor |
//! | [`config`] | `gallery.toml` loading, validation, and stock defaults |
//! | [`metadata`] | Capture metadata formatting (aperture, shutter, ISO...) |
//! | [`imaging`] | Pure-Rust image operations: resize, encode, EXIF parsing |
//! | [`naming`] | Filename stem and caption derivation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate (Lanczos3 resampling) for
//! decoding and JPEG output and the `webp` crate for lossy WebP. No
//! ImageMagick, no libvips, no system dependencies: the binary is fully
//! self-contained.
//!
//! ## Variants Are Never Upscaled
//!
//! A breakpoint wider than the source clamps to the source width. A phone
//! photo still gets every breakpoint entry in the manifest, they just
//! share a width, and the page's srcset logic collapses the duplicates.
//!
//! ## Capture Metadata at Build Time
//!
//! EXIF is parsed once during the build and shipped in the manifest as
//! pre-formatted strings. The page never re-downloads originals to read
//! tags out of them, which also removes a class of stale-response races
//! when flipping quickly through the lightbox.
//!
//! ## Maud Over Template Engines
//!
//! The gallery page is generated with [Maud](https://maud.lambda.xyz/):
//! compile-time checked HTML, auto-escaped interpolation, and no template
//! directory to ship alongside the binary.

pub mod compress;
pub mod config;
pub mod gallery;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod process;
pub mod render;
