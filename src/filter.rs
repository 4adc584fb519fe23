//! Filter pass: keep only records whose image exists on disk.

use std::path::Path;

use crate::error::WiderError;
use crate::report::FilterReport;
use crate::sink::write_output_file;
use crate::wider::path::resolve_image_path;
use crate::wider::{read_annotation_file, AnnotationParser};

/// Copy the records of `annotations` whose image exists under `image_root`
/// into `output`.
///
/// Kept records are written line for line as they were consumed, including
/// box lines that failed to parse. Records that never completed (a bad or
/// missing count line) are not written. The output file is overwritten.
pub fn filter_annotations(
    annotations: &Path,
    image_root: &Path,
    output: &Path,
) -> Result<FilterReport, WiderError> {
    tracing::info!("Checking and filtering annotation file for existing images...");
    let content = read_annotation_file(annotations)?;

    let mut report = FilterReport {
        input: annotations.to_path_buf(),
        output: output.to_path_buf(),
        ..Default::default()
    };
    let filtered = filter_annotation_str(&content, image_root, &mut report);

    write_output_file(output, &filtered)?;
    report.log();
    Ok(report)
}

fn filter_annotation_str(content: &str, image_root: &Path, report: &mut FilterReport) -> String {
    let mut parser = AnnotationParser::new(content.lines());
    let mut filtered = String::new();

    for record in parser.by_ref() {
        let image_path = resolve_image_path(image_root, &record.image_path);
        if image_path.exists() {
            for line in &record.source_lines {
                filtered.push_str(line);
                filtered.push('\n');
            }
            report.processed_images += 1;
        } else {
            tracing::debug!(path = %image_path.display(), "image missing");
            report.missing_images.push(record.image_path);
        }
    }

    report.parse_issues = parser.into_issues();
    filtered
}
