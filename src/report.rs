//! Run summaries for the filter and conversion passes.
//!
//! Both reports serialize to JSON for programmatic use and implement
//! `Display` for the human-readable summary printed at the end of a run.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::sink::OutputFormat;
use crate::wider::ParseIssue;

/// How many example paths are listed before the rest are only counted.
pub const MAX_LISTED_EXAMPLES: usize = 10;

/// Summary of a filter pass.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FilterReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Records whose image exists and were written to the output.
    pub processed_images: usize,
    /// Image paths (as written in the annotation file) that were not found.
    pub missing_images: Vec<String>,
    pub parse_issues: Vec<ParseIssue>,
}

impl FilterReport {
    pub fn missing_count(&self) -> usize {
        self.missing_images.len()
    }

    /// Emit the summary through `tracing`.
    pub fn log(&self) {
        tracing::info!(path = %self.output.display(), "Filtered annotation file created");
        tracing::info!("Processed images: {}", self.processed_images);
        tracing::info!("Missing images: {}", self.missing_count());
        log_examples("Examples of missing images:", &self.missing_images, "missing images");
    }
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Filtered {} -> {}",
            self.input.display(),
            self.output.display()
        )?;
        writeln!(f, "  processed images: {}", self.processed_images)?;
        writeln!(f, "  missing images:   {}", self.missing_count())?;
        writeln!(f, "  parse issues:     {}", self.parse_issues.len())?;
        write_examples(f, "Examples of missing images:", &self.missing_images, "missing images")
    }
}

/// Per-format write counts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SinkCounts {
    pub written: usize,
    pub failed: usize,
}

/// Summary of a conversion pass.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionReport {
    pub input: PathBuf,
    /// Records yielded by the parser.
    pub records: usize,
    /// Images whose size could not be determined; no outputs were written.
    pub skipped_images: Vec<String>,
    pub yolo: SinkCounts,
    pub voc: SinkCounts,
    pub parse_issues: Vec<ParseIssue>,
}

impl ConversionReport {
    pub fn counts_mut(&mut self, format: OutputFormat) -> &mut SinkCounts {
        match format {
            OutputFormat::Yolo => &mut self.yolo,
            OutputFormat::Voc => &mut self.voc,
        }
    }

    pub fn counts(&self, format: OutputFormat) -> &SinkCounts {
        match format {
            OutputFormat::Yolo => &self.yolo,
            OutputFormat::Voc => &self.voc,
        }
    }

    /// Emit the summary through `tracing`.
    pub fn log(&self) {
        tracing::info!(
            "YOLO files created: {}, VOC XML files created: {}",
            self.yolo.written,
            self.voc.written
        );
        if self.yolo.failed > 0 || self.voc.failed > 0 {
            tracing::warn!(
                "YOLO files failed: {}, VOC XML files failed: {}",
                self.yolo.failed,
                self.voc.failed
            );
        }
        log_examples("Skipped images:", &self.skipped_images, "skipped images");
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Converted {}", self.input.display())?;
        writeln!(f, "  records:          {}", self.records)?;
        writeln!(f, "  skipped images:   {}", self.skipped_images.len())?;
        writeln!(
            f,
            "  YOLO files:       {} written, {} failed",
            self.yolo.written, self.yolo.failed
        )?;
        writeln!(
            f,
            "  VOC XML files:    {} written, {} failed",
            self.voc.written, self.voc.failed
        )?;
        writeln!(f, "  parse issues:     {}", self.parse_issues.len())?;
        write_examples(f, "Skipped images:", &self.skipped_images, "skipped images")
    }
}

fn write_examples(
    f: &mut fmt::Formatter<'_>,
    heading: &str,
    items: &[String],
    noun: &str,
) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }

    writeln!(f, "  {heading}")?;
    for item in items.iter().take(MAX_LISTED_EXAMPLES) {
        writeln!(f, "    - {item}")?;
    }
    if items.len() > MAX_LISTED_EXAMPLES {
        writeln!(
            f,
            "    ... and {} more {noun}.",
            items.len() - MAX_LISTED_EXAMPLES
        )?;
    }
    Ok(())
}

fn log_examples(heading: &str, items: &[String], noun: &str) {
    if items.is_empty() {
        return;
    }

    tracing::warn!("{heading}");
    for item in items.iter().take(MAX_LISTED_EXAMPLES) {
        tracing::warn!("- {item}");
    }
    if items.len() > MAX_LISTED_EXAMPLES {
        tracing::warn!(
            "... and {} more {noun}.",
            items.len() - MAX_LISTED_EXAMPLES
        );
    }
}
