//! Plain-text comparison report serializer.
//!
//! Renders the per-image summaries followed by the four difference
//! fields. Every numeric field is formatted to 2 decimal places. A
//! side whose measurement failed outright (e.g. unreadable image) is
//! reported with its error message instead of numbers; a side that
//! measured nothing reports "no measurement" for the diameter.
//!
//! This is a pure function with no I/O — it returns a `String`.

use std::fmt::Write;

use rondel_pipeline::{ComparisonReport, ImageSummary};

/// Serialize a comparison report into human-readable text.
#[must_use]
pub fn to_text(report: &ComparisonReport) -> String {
    let mut out = String::new();

    summary_block(&mut out, 1, &report.first);
    let _ = writeln!(out);
    summary_block(&mut out, 2, &report.second);
    let _ = writeln!(out);

    let _ = writeln!(out, "Difference in Pixels: {:.2}", report.pixel_diff);
    let _ = writeln!(
        out,
        "Pixel Percentage Difference: {:.2}%",
        report.pixel_percent_diff,
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Difference in Diameter: {:.2} mm", report.diameter_diff);
    let _ = write!(
        out,
        "Diameter Percentage Difference: {:.2}%",
        report.diameter_percent_diff,
    );

    out
}

fn summary_block(out: &mut String, index: usize, summary: &ImageSummary) {
    if let Some(error) = &summary.error {
        let _ = writeln!(out, "Image {index}: measurement failed: {error}");
        return;
    }
    let _ = writeln!(out, "Image {index} Pixels: {:.2}", summary.total_pixels);
    match summary.diameter_mm {
        Some(diameter) => {
            let _ = writeln!(out, "Image {index} Diameter: {diameter:.2} mm");
        }
        None => {
            let _ = writeln!(out, "Image {index} Diameter: no measurement");
        }
    }
}
