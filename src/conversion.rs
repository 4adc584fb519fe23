//! Conversion pass: WIDER records to YOLO labels and VOC documents.

use std::path::Path;

use crate::error::WiderError;
use crate::image_size::ImageSizeResolver;
use crate::report::ConversionReport;
use crate::sink::AnnotationSink;
use crate::wider::path::resolve_image_path;
use crate::wider::{read_annotation_file, AnnotationParser, AnnotationRecord};

/// Convert every record in `annotations`.
///
/// Each record's image is looked up under `image_root` to get its size. If
/// that fails, or the size is zero in either direction, the record is
/// skipped and nothing is written for it. Otherwise every sink runs; a sink
/// failure is logged and counted without affecting the other sinks.
///
/// Only an unreadable annotation file is fatal.
pub fn convert_annotations(
    annotations: &Path,
    image_root: &Path,
    resolver: &dyn ImageSizeResolver,
    sinks: &[&dyn AnnotationSink],
) -> Result<ConversionReport, WiderError> {
    tracing::info!("Starting annotation processing.");
    let content = read_annotation_file(annotations)?;
    tracing::info!(
        "Number of lines in annotation file: {}",
        content.lines().count()
    );

    let mut report = ConversionReport {
        input: annotations.to_path_buf(),
        ..Default::default()
    };

    let mut parser = AnnotationParser::new(content.lines());
    for record in parser.by_ref() {
        report.records += 1;
        convert_record(&record, image_root, resolver, sinks, &mut report);
    }
    report.parse_issues = parser.into_issues();

    report.log();
    Ok(report)
}

fn convert_record(
    record: &AnnotationRecord,
    image_root: &Path,
    resolver: &dyn ImageSizeResolver,
    sinks: &[&dyn AnnotationSink],
    report: &mut ConversionReport,
) {
    let image_path = resolve_image_path(image_root, &record.image_path);
    tracing::info!(path = %image_path.display(), "Trying to open image");

    let sized = resolver.image_size(&image_path).and_then(|dims| {
        if dims.is_degenerate() {
            Err(WiderError::ZeroImageDimension {
                path: image_path.clone(),
                width: dims.width,
                height: dims.height,
            })
        } else {
            Ok(dims)
        }
    });

    let dims = match sized {
        Ok(dims) => dims,
        Err(err) => {
            tracing::error!("{err}");
            tracing::warn!(
                "Skipping image due to missing size information: {}",
                record.image_path
            );
            report.skipped_images.push(record.image_path.clone());
            return;
        }
    };

    for sink in sinks {
        let counts = report.counts_mut(sink.format());
        match sink.write_record(record, dims) {
            Ok(_) => counts.written += 1,
            Err(err) => {
                tracing::error!(
                    image = %record.image_path,
                    format = sink.format().name(),
                    "Error writing output: {err}"
                );
                counts.failed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::sink::OutputFormat;
    use crate::wider::ImageDimensions;

    struct RecordingSink {
        format: OutputFormat,
        fail: bool,
        seen: RefCell<Vec<(String, usize)>>,
    }

    impl RecordingSink {
        fn new(format: OutputFormat, fail: bool) -> Self {
            Self {
                format,
                fail,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl AnnotationSink for RecordingSink {
        fn format(&self) -> OutputFormat {
            self.format
        }

        fn write_record(
            &self,
            record: &AnnotationRecord,
            _dims: ImageDimensions,
        ) -> Result<PathBuf, WiderError> {
            self.seen
                .borrow_mut()
                .push((record.image_path.clone(), record.boxes.len()));
            if self.fail {
                return Err(WiderError::Io(std::io::Error::other("disk full")));
            }
            Ok(PathBuf::from(&record.image_path))
        }
    }

    fn sized(path: &Path) -> Result<ImageDimensions, WiderError> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        match name {
            "zero.jpg" => Ok(ImageDimensions::new(0, 10)),
            "missing.jpg" => Err(WiderError::Io(std::io::Error::from(
                std::io::ErrorKind::NotFound,
            ))),
            _ => Ok(ImageDimensions::new(100, 50)),
        }
    }

    fn write_input(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("ann.txt");
        fs::write(&path, content).expect("write annotations");
        path
    }

    #[test]
    fn unsized_images_are_skipped_entirely() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let input = write_input(
            temp.path(),
            "a.jpg\n1\n1 2 3 4\nmissing.jpg\n0\nzero.jpg\n1\n1 1 1 1\n",
        );
        let yolo = RecordingSink::new(OutputFormat::Yolo, false);
        let voc = RecordingSink::new(OutputFormat::Voc, false);

        let report = convert_annotations(&input, temp.path(), &sized, &[&yolo, &voc])
            .expect("convert");

        assert_eq!(report.records, 3);
        assert_eq!(report.skipped_images, vec!["missing.jpg", "zero.jpg"]);
        assert_eq!(report.yolo.written, 1);
        assert_eq!(report.voc.written, 1);
        assert_eq!(*yolo.seen.borrow(), vec![("a.jpg".to_string(), 1)]);
    }

    #[test]
    fn failing_sink_does_not_block_the_other() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let input = write_input(temp.path(), "a.jpg\n0\nb.jpg\n0\n");
        let yolo = RecordingSink::new(OutputFormat::Yolo, true);
        let voc = RecordingSink::new(OutputFormat::Voc, false);

        let report = convert_annotations(&input, temp.path(), &sized, &[&yolo, &voc])
            .expect("convert");

        assert_eq!(report.yolo.written, 0);
        assert_eq!(report.yolo.failed, 2);
        assert_eq!(report.voc.written, 2);
        assert_eq!(voc.seen.borrow().len(), 2);
    }

    #[test]
    fn parse_issues_are_reported() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let input = write_input(temp.path(), "junk\na.jpg\n2\n1 2 3\n");
        let voc = RecordingSink::new(OutputFormat::Voc, false);

        let report =
            convert_annotations(&input, temp.path(), &sized, &[&voc]).expect("convert");

        assert_eq!(report.records, 1);
        assert_eq!(report.parse_issues.len(), 3);
        assert_eq!(*voc.seen.borrow(), vec![("a.jpg".to_string(), 0)]);
    }

    #[test]
    fn unreadable_input_is_fatal() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let err = convert_annotations(&temp.path().join("nope.txt"), temp.path(), &sized, &[])
            .unwrap_err();
        assert!(matches!(err, WiderError::ReadAnnotations { .. }));
    }
}
