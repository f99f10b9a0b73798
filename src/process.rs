//! The build pipeline: scan, encode, manifest.
//!
//! `build` walks the source directory, fans each image out over a rayon
//! pool sized by the processing config, and joins before writing the
//! manifest. One image failing never aborts the run; the failure is
//! reported and the manifest simply omits that entry.

use crate::config::{GalleryConfig, effective_workers};
use crate::gallery::{GalleryEntry, VariantSet};
use crate::imaging::{
    ImageBackend, OutputFormat, VariantOutcome, aspect_ratio, encode_planned, is_source_image,
    plan_variants,
};
use crate::metadata::CaptureMetadata;
use crate::naming;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("cannot read source directory {path}: {source}")]
    SourceDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("manifest serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Everything one build run did, for reporting.
pub struct BuildReport {
    /// Manifest entries, in the order they were written.
    pub entries: Vec<GalleryEntry>,
    /// Per-image variant outcomes, same order as `entries`.
    pub images: Vec<ImageReport>,
    /// Images that were skipped after an error.
    pub failures: Vec<ImageFailure>,
}

pub struct ImageReport {
    pub filename: String,
    pub outcomes: Vec<VariantOutcome>,
}

pub struct ImageFailure {
    pub filename: String,
    pub message: String,
}

/// Source filenames eligible for processing, sorted for a deterministic
/// manifest order.
pub fn list_source_images(dir: &Path) -> Result<Vec<String>, BuildError> {
    let read = fs::read_dir(dir).map_err(|source| BuildError::SourceDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in read {
        let entry = entry.map_err(|source| BuildError::SourceDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && is_source_image(&path) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Run the full pipeline and write the manifest.
///
/// With `force` set, variants are re-encoded even when their output files
/// already exist.
pub fn build(
    backend: &impl ImageBackend,
    config: &GalleryConfig,
    force: bool,
) -> Result<BuildReport, BuildError> {
    let filenames = list_source_images(&config.source_dir)?;

    fs::create_dir_all(&config.output_dir)?;
    if let Some(parent) = config.manifest_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(effective_workers(&config.processing))
        .build()?;

    let results: Vec<Result<(GalleryEntry, ImageReport), ImageFailure>> = pool.install(|| {
        filenames
            .par_iter()
            .map(|filename| process_image(backend, config, filename, force))
            .collect()
    });

    let mut entries = Vec::new();
    let mut images = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok((entry, report)) => {
                entries.push(entry);
                images.push(report);
            }
            Err(failure) => failures.push(failure),
        }
    }

    let json = serde_json::to_string_pretty(&entries)?;
    fs::write(&config.manifest_path, json)?;

    Ok(BuildReport {
        entries,
        images,
        failures,
    })
}

fn process_image(
    backend: &impl ImageBackend,
    config: &GalleryConfig,
    filename: &str,
    force: bool,
) -> Result<(GalleryEntry, ImageReport), ImageFailure> {
    let source = config.source_dir.join(filename);

    let dims = backend.identify(&source).map_err(|e| ImageFailure {
        filename: filename.to_string(),
        message: e.to_string(),
    })?;

    // Garbled or absent metadata degrades to "no capture info", never to a
    // skipped image.
    let capture = backend.read_capture(&source).unwrap_or_default();

    let stem = naming::stem(filename);
    let plan = plan_variants(stem, dims.width, &config.breakpoints);
    let outcomes = encode_planned(
        backend,
        &source,
        &config.output_dir,
        plan,
        config.quality(),
        force,
    )
    .map_err(|e| ImageFailure {
        filename: filename.to_string(),
        message: e.to_string(),
    })?;

    let mut versions: BTreeMap<String, VariantSet> = BTreeMap::new();
    for outcome in &outcomes {
        let variant = &outcome.variant;
        let path = config
            .output_dir
            .join(&variant.file_name)
            .to_string_lossy()
            .into_owned();
        let set = versions
            .entry(variant.breakpoint.clone())
            .or_insert_with(|| VariantSet {
                jpg: String::new(),
                webp: String::new(),
                width: variant.width,
            });
        match variant.format {
            OutputFormat::Jpeg => set.jpg = path,
            OutputFormat::Webp => set.webp = path,
        }
    }

    let entry = GalleryEntry {
        filename: filename.to_string(),
        original: source.to_string_lossy().into_owned(),
        width: dims.width,
        height: dims.height,
        aspect_ratio: aspect_ratio(dims.width, dims.height),
        versions,
        capture: CaptureMetadata::from_exif(&capture),
    };
    let report = ImageReport {
        filename: filename.to_string(),
        outcomes,
    };
    Ok((entry, report))
}
