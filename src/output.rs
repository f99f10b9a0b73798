//! Human-readable reporting for the CLI.
//!
//! Formatting is kept pure and testable; the `print_*` wrappers are the
//! only place anything touches stdout or stderr.

use crate::compress::CompressOutcome;
use crate::imaging::VariantStatus;
use crate::process::{BuildReport, ImageReport};
use std::path::Path;

pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

/// One line per image: `dawn.jpg: 6 variants (4 encoded, 2 reused)`.
pub fn format_image_line(report: &ImageReport) -> String {
    let encoded = report
        .outcomes
        .iter()
        .filter(|o| o.status == VariantStatus::Encoded)
        .count();
    let reused = report.outcomes.len() - encoded;
    format!(
        "{}: {} variants ({encoded} encoded, {reused} reused)",
        report.filename,
        report.outcomes.len()
    )
}

pub fn format_build_summary(report: &BuildReport, manifest_path: &Path) -> String {
    let encoded: usize = report
        .images
        .iter()
        .flat_map(|i| &i.outcomes)
        .filter(|o| o.status == VariantStatus::Encoded)
        .count();
    let reused: usize = report
        .images
        .iter()
        .map(|i| i.outcomes.len())
        .sum::<usize>()
        - encoded;

    let mut summary = format!(
        "{} images processed, {encoded} variants encoded, {reused} reused",
        report.entries.len()
    );
    if !report.failures.is_empty() {
        summary.push_str(&format!(", {} skipped", report.failures.len()));
    }
    summary.push_str(&format!("\nmanifest written to {}", manifest_path.display()));
    summary
}

pub fn format_compress_outcome(outcome: &CompressOutcome) -> String {
    let name = outcome.source.display();
    match &outcome.status {
        Ok(Some(change)) => format!(
            "{name}: {} -> {} ({:.1}% saved)",
            format_bytes(change.before_bytes),
            format_bytes(change.after_bytes),
            change.percent_saved()
        ),
        Ok(None) => format!("{name}: written to {}", outcome.output.display()),
        Err(message) => format!("{name}: FAILED ({message})"),
    }
}

pub fn print_build_report(report: &BuildReport, manifest_path: &Path) {
    for image in &report.images {
        println!("  {}", format_image_line(image));
    }
    for failure in &report.failures {
        eprintln!("  SKIPPED {}: {}", failure.filename, failure.message);
    }
    println!("{}", format_build_summary(report, manifest_path));
}

pub fn print_compress_outcomes(outcomes: &[CompressOutcome]) {
    for outcome in outcomes {
        match outcome.status {
            Ok(_) => println!("  {}", format_compress_outcome(outcome)),
            Err(_) => eprintln!("  {}", format_compress_outcome(outcome)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::SizeChange;
    use crate::imaging::{OutputFormat, PlannedVariant, VariantOutcome};
    use std::path::PathBuf;

    fn outcome(status: VariantStatus) -> VariantOutcome {
        VariantOutcome {
            variant: PlannedVariant {
                breakpoint: "thumb".to_string(),
                width: 400,
                format: OutputFormat::Webp,
                file_name: "dawn-thumb.webp".to_string(),
            },
            status,
        }
    }

    #[test]
    fn bytes_scale_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn image_line_counts_statuses() {
        let report = ImageReport {
            filename: "dawn.jpg".to_string(),
            outcomes: vec![
                outcome(VariantStatus::Encoded),
                outcome(VariantStatus::Encoded),
                outcome(VariantStatus::Reused),
            ],
        };
        assert_eq!(
            format_image_line(&report),
            "dawn.jpg: 3 variants (2 encoded, 1 reused)"
        );
    }

    #[test]
    fn build_summary_mentions_failures_only_when_present() {
        let report = BuildReport {
            entries: vec![],
            images: vec![],
            failures: vec![],
        };
        let summary = format_build_summary(&report, Path::new("js/gallery-data.json"));
        assert!(summary.starts_with("0 images processed"));
        assert!(!summary.contains("skipped"));
        assert!(summary.contains("js/gallery-data.json"));
    }

    #[test]
    fn compress_outcome_reports_savings() {
        let outcome = CompressOutcome {
            source: PathBuf::from("a.jpg"),
            output: PathBuf::from("out/a.jpg"),
            status: Ok(Some(SizeChange {
                before_bytes: 200 * 1024,
                after_bytes: 150 * 1024,
            })),
        };
        assert_eq!(
            format_compress_outcome(&outcome),
            "a.jpg: 200.0 KB -> 150.0 KB (25.0% saved)"
        );
    }

    #[test]
    fn compress_failure_keeps_message() {
        let outcome = CompressOutcome {
            source: PathBuf::from("bad.jpg"),
            output: PathBuf::from("out/bad.jpg"),
            status: Err("decode failed: truncated".to_string()),
        };
        assert!(format_compress_outcome(&outcome).contains("FAILED (decode failed: truncated)"));
    }
}
