//! Filename conventions shared across the pipeline.
//!
//! Variant files derive from the source photo's stem:
//! `{stem}-{breakpoint}.{ext}`. The gallery page derives display captions
//! from the same stem, underscores becoming spaces.

/// The filename without its final extension. The whole name when there is
/// no extension.
pub fn stem(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => filename,
    }
}
