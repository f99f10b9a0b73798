//! Pure calculation functions for variant dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Clamp a breakpoint width to the source width — variants are never upscaled.
pub fn clamp_target_width(breakpoint_width: u32, source_width: u32) -> u32 {
    breakpoint_width.min(source_width)
}

/// Height of a width-resized image, preserving aspect ratio (rounded).
///
/// # Examples
/// ```
/// # use photofolio::imaging::scaled_height;
/// // 3000x2000 resized to 1920 wide → 1280 tall
/// assert_eq!(scaled_height((3000, 2000), 1920), 1280);
/// ```
pub fn scaled_height(source: (u32, u32), target_width: u32) -> u32 {
    let (w, h) = source;
    if w == 0 {
        return 0;
    }
    (h as f64 * target_width as f64 / w as f64).round() as u32
}

/// Width/height ratio as recorded in the manifest.
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    width as f64 / height as f64
}
