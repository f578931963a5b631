//! rondel-report: Pure text rendering of comparison results (sans-IO)
//!
//! Converts a [`ComparisonReport`](rondel_pipeline::ComparisonReport)
//! into human-readable text. Future formats: JSON envelope, CSV.

pub mod text;

pub use text::to_text;
