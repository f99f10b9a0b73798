//! Variant planning and execution.
//!
//! Planning is pure: given a filename stem, the source width, and the
//! configured breakpoints, [`plan_variants`] decides exactly which files a
//! build should produce. Execution ([`encode_planned`]) walks the plan,
//! reuses outputs that already exist on disk, and hands the rest to the
//! backend.
//!
//! Reuse is purely path-existence based — no content hashing. A stale
//! variant from a changed source is never refreshed unless the file is
//! deleted first (or the build runs with `--force`).

use super::backend::{BackendError, ImageBackend};
use super::calculations::clamp_target_width;
use super::params::{Breakpoint, OutputFormat, Quality, VariantParams};
use std::path::Path;

/// One output file a build intends to produce.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedVariant {
    /// Breakpoint name this variant belongs to (`thumb`, `large`, ...).
    pub breakpoint: String,
    /// Resolved target width: `min(breakpoint width, source width)`.
    pub width: u32,
    pub format: OutputFormat,
    /// Bare file name within the output directory.
    pub file_name: String,
}

/// How a planned variant was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantStatus {
    Encoded,
    Reused,
}

/// A planned variant plus the way this build satisfied it.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantOutcome {
    pub variant: PlannedVariant,
    pub status: VariantStatus,
}

/// Plan every (breakpoint × format) variant for one source image.
///
/// Widths are clamped to the source width — never upscaled. Plan order
/// follows the configured breakpoint order, formats within a breakpoint in
/// browser-preference order (WebP first).
pub fn plan_variants(
    stem: &str,
    source_width: u32,
    breakpoints: &[Breakpoint],
) -> Vec<PlannedVariant> {
    let mut plan = Vec::with_capacity(breakpoints.len() * 2);
    for bp in breakpoints {
        let width = clamp_target_width(bp.width, source_width);
        for format in OutputFormat::all() {
            plan.push(PlannedVariant {
                breakpoint: bp.name.clone(),
                width,
                format,
                file_name: format!("{stem}-{}.{}", bp.name, format.extension()),
            });
        }
    }
    plan
}

/// Execute a variant plan against the backend.
///
/// Existing output files are reused without re-encoding unless `force` is
/// set. Stops at the first backend error — the caller treats the whole
/// image as failed (the manifest carries complete entries or none).
pub fn encode_planned(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    plan: Vec<PlannedVariant>,
    quality: Quality,
    force: bool,
) -> Result<Vec<VariantOutcome>, BackendError> {
    let mut outcomes = Vec::with_capacity(plan.len());

    for variant in plan {
        let output = output_dir.join(&variant.file_name);

        let status = if !force && output.exists() {
            VariantStatus::Reused
        } else {
            backend.encode_variant(&VariantParams {
                source: source.to_path_buf(),
                output,
                target_width: variant.width,
                format: variant.format,
                quality,
            })?;
            VariantStatus::Encoded
        };

        outcomes.push(VariantOutcome { variant, status });
    }

    Ok(outcomes)
}
