//! Gallery configuration.
//!
//! Handles loading and validating `gallery.toml`. Every knob the pipeline
//! uses lives in an explicit [`GalleryConfig`] passed into the builder —
//! there are no process-wide constants.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_dir = "images"                    # Source photos
//! output_dir = "images/optimized"          # Generated variants
//! manifest_path = "js/gallery-data.json"   # Manifest consumed by the page
//! site_dir = "dist"                        # Generated index.html
//!
//! [images]
//! quality = 80              # JPEG/WebP quality (1-100)
//!
//! [[breakpoints]]           # Named target widths, in display order
//! name = "thumb"
//! width = 400
//!
//! [[breakpoints]]
//! name = "medium"
//! width = 1080
//!
//! [[breakpoints]]
//! name = "large"
//! width = 1920
//!
//! [processing]
//! max_workers = 4           # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want. Declaring
//! any `[[breakpoints]]` table replaces the whole stock set. Unknown keys
//! are rejected to catch typos early.

use crate::imaging::{Breakpoint, Quality};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `gallery.toml`.
///
/// All fields have defaults matching the stock portfolio layout. User
/// config files need only specify the values they want to override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Directory of source photographs.
    pub source_dir: PathBuf,
    /// Directory receiving generated variants.
    pub output_dir: PathBuf,
    /// Path of the JSON manifest (parent directories are created).
    pub manifest_path: PathBuf,
    /// Directory receiving the generated site page.
    pub site_dir: PathBuf,
    /// Encoding settings.
    pub images: ImagesConfig,
    /// Named target widths, in display order.
    pub breakpoints: Vec<Breakpoint>,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("images"),
            output_dir: PathBuf::from("images/optimized"),
            manifest_path: PathBuf::from("js/gallery-data.json"),
            site_dir: PathBuf::from("dist"),
            images: ImagesConfig::default(),
            breakpoints: stock_breakpoints(),
            processing: ProcessingConfig::default(),
        }
    }
}

fn stock_breakpoints() -> Vec<Breakpoint> {
    vec![
        Breakpoint::new("thumb", 400),   // masonry grid / mobile
        Breakpoint::new("medium", 1080), // tablets / small laptops
        Breakpoint::new("large", 1920),  // desktop lightbox
    ]
}

impl GalleryConfig {
    /// Load config from a TOML file. A missing file yields the defaults;
    /// a present-but-invalid file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.quality == 0 || self.images.quality > 100 {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.breakpoints.is_empty() {
            return Err(ConfigError::Validation(
                "at least one [[breakpoints]] entry is required".into(),
            ));
        }
        if self.breakpoints.iter().any(|bp| bp.width == 0) {
            return Err(ConfigError::Validation(
                "breakpoint widths must be non-zero".into(),
            ));
        }
        let names: BTreeSet<&str> = self.breakpoints.iter().map(|bp| bp.name.as_str()).collect();
        if names.len() != self.breakpoints.len() {
            return Err(ConfigError::Validation(
                "breakpoint names must be unique".into(),
            ));
        }
        if self.breakpoints.iter().any(|bp| bp.name.is_empty()) {
            return Err(ConfigError::Validation(
                "breakpoint names must be non-empty".into(),
            ));
        }
        Ok(())
    }

    /// Encoding quality as the clamped imaging type.
    pub fn quality(&self) -> Quality {
        Quality::new(self.images.quality)
    }
}

/// Encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// JPEG/WebP encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self { quality: 80 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_workers: Option<usize>,
}

/// Resolve the effective worker count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_workers(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_workers.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Stock `gallery.toml` with every option documented, for `gen-config`.
pub fn stock_config_toml() -> String {
    r#"# photofolio configuration
# All options are optional - the values below are the defaults.

source_dir = "images"                    # Source photos
output_dir = "images/optimized"          # Generated variants
manifest_path = "js/gallery-data.json"   # Manifest consumed by the page
site_dir = "dist"                        # Generated index.html

[images]
quality = 80              # JPEG/WebP quality (1-100)

# Named target widths, in display order. Declaring any [[breakpoints]]
# table replaces the whole stock set.
[[breakpoints]]
name = "thumb"            # masonry grid / mobile
width = 400

[[breakpoints]]
name = "medium"           # tablets / small laptops
width = 1080

[[breakpoints]]
name = "large"            # desktop lightbox
width = 1920

[processing]
# max_workers = 4         # Max parallel workers (omit for auto = CPU cores)
"#
    .to_string()
}
