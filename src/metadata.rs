//! Capture metadata formatting.
//!
//! Turns raw EXIF values ([`ExifCapture`]) into the display strings the
//! lightbox panel shows. Formatting happens at build time so the manifest
//! carries ready-to-render values and the page script never parses EXIF:
//!
//! - exposure `0.004` → `"1/250s"`, `2` → `"2s"`
//! - f-number `1.8` → `"f/1.8"`
//! - focal length `50.0` → `"50mm"`
//! - make + model joined into a single camera string

use crate::imaging::ExifCapture;
use serde::{Deserialize, Serialize};

/// Formatted capture metadata as embedded in a manifest entry.
///
/// Absent fields mean the tag was missing from the source file. An entry
/// where all six tags are missing carries no capture object at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal: Option<String>,
}

impl CaptureMetadata {
    /// Format raw EXIF values; `None` when no tag was present at all.
    pub fn from_exif(exif: &ExifCapture) -> Option<Self> {
        if exif.is_empty() {
            return None;
        }
        Some(Self {
            camera: format_camera(exif.make.as_deref(), exif.model.as_deref()),
            aperture: exif.f_number.map(format_f_number),
            shutter: exif.exposure_time.map(format_exposure),
            iso: exif.iso.map(|v| v.to_string()),
            focal: exif.focal_length.map(format_focal_length),
        })
    }
}

/// Join make and model into one display string. Either side may be absent.
fn format_camera(make: Option<&str>, model: Option<&str>) -> Option<String> {
    match (make, model) {
        (None, None) => None,
        (Some(m), None) => Some(m.to_string()),
        (None, Some(m)) => Some(m.to_string()),
        (Some(make), Some(model)) => Some(format!("{make} {model}")),
    }
}

/// Format an exposure time in seconds.
///
/// Sub-second exposures are shown as a reciprocal fraction with the
/// denominator rounded to the nearest integer; one second and up as a
/// literal seconds value (integral values without decimals).
pub fn format_exposure(seconds: f64) -> String {
    if seconds <= 0.0 {
        return "0s".to_string();
    }
    if seconds >= 1.0 {
        if seconds.fract() == 0.0 {
            format!("{}s", seconds as u64)
        } else {
            format!("{seconds}s")
        }
    } else {
        format!("1/{}s", (1.0 / seconds).round() as u64)
    }
}

/// Format an f-number with one decimal place: `1.8` → `"f/1.8"`.
pub fn format_f_number(f_number: f64) -> String {
    format!("f/{f_number:.1}")
}

/// Format a focal length as a whole-millimetre value: `50.0` → `"50mm"`.
pub fn format_focal_length(mm: f64) -> String {
    format!("{}mm", mm.round() as u64)
}
