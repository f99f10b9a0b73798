//! Standalone quality-only recompression of explicit files.
//!
//! Unlike the build pipeline this takes no directory scan: the caller
//! names every file. Dimensions are untouched, only the JPEG quality
//! setting changes, and embedded metadata rides along.

use crate::imaging::{CompressParams, ImageBackend, Quality};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("no input files given")]
    NoInputs,
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What happened to one input file.
pub struct CompressOutcome {
    pub source: PathBuf,
    pub output: PathBuf,
    /// `Ok(None)` when the file was written but sizes could not be read.
    pub status: Result<Option<SizeChange>, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeChange {
    pub before_bytes: u64,
    pub after_bytes: u64,
}

impl SizeChange {
    /// Bytes saved as a percentage of the original size.
    pub fn percent_saved(&self) -> f64 {
        if self.before_bytes == 0 {
            return 0.0;
        }
        let saved = self.before_bytes.saturating_sub(self.after_bytes);
        saved as f64 * 100.0 / self.before_bytes as f64
    }
}

/// Recompress every file into `output_dir`, in parallel, one outcome per
/// input in input order. A bad file fails its own outcome only.
pub fn run(
    backend: &impl ImageBackend,
    files: &[PathBuf],
    output_dir: &Path,
    quality: Quality,
) -> Result<Vec<CompressOutcome>, CompressError> {
    if files.is_empty() {
        return Err(CompressError::NoInputs);
    }

    fs::create_dir_all(output_dir).map_err(|source| CompressError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let outcomes = files
        .par_iter()
        .map(|source| compress_one(backend, source, output_dir, quality))
        .collect();

    Ok(outcomes)
}

fn compress_one(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    quality: Quality,
) -> CompressOutcome {
    let Some(file_name) = source.file_name() else {
        return CompressOutcome {
            source: source.to_path_buf(),
            output: output_dir.to_path_buf(),
            status: Err(format!("not a file: {}", source.display())),
        };
    };
    let output = output_dir.join(file_name);

    let params = CompressParams {
        source: source.to_path_buf(),
        output: output.clone(),
        quality,
    };
    let status = match backend.compress(&params) {
        Ok(()) => Ok(size_change(source, &output)),
        Err(e) => Err(e.to_string()),
    };

    CompressOutcome {
        source: source.to_path_buf(),
        output,
        status,
    }
}

fn size_change(source: &Path, output: &Path) -> Option<SizeChange> {
    let before = fs::metadata(source).ok()?.len();
    let after = fs::metadata(output).ok()?.len();
    Some(SizeChange {
        before_bytes: before,
        after_bytes: after,
    })
}
