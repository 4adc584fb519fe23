//! YOLO label output.
//!
//! One text file per image, one line per box:
//! `class x_center y_center width height`, with the four spatial fields
//! normalized by the image size. Every box is a face, so the class is
//! always `0`.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::WiderError;
use crate::sink::{write_output_file, AnnotationSink, OutputFormat};
use crate::wider::path::derived_output_path;
use crate::wider::{AnnotationRecord, BoundingBox, ImageDimensions};

const LABEL_EXTENSION: &str = "txt";
const FACE_CLASS_ID: u32 = 0;

/// A box in normalized center/size form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YoloRecord {
    pub class_id: u32,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl YoloRecord {
    /// Map an absolute box to normalized coordinates.
    ///
    /// Returns `None` when either image dimension is zero. Results are not
    /// clamped: a box that spills past the image edge yields values outside
    /// `[0, 1]`.
    pub fn from_bbox(bbox: &BoundingBox, dims: ImageDimensions) -> Option<Self> {
        if dims.is_degenerate() {
            return None;
        }

        let img_w = f64::from(dims.width);
        let img_h = f64::from(dims.height);
        let width = f64::from(bbox.width);
        let height = f64::from(bbox.height);

        Some(Self {
            class_id: FACE_CLASS_ID,
            x_center: (f64::from(bbox.xmin) + width / 2.0) / img_w,
            y_center: (f64::from(bbox.ymin) + height / 2.0) / img_h,
            width: width / img_w,
            height: height / img_h,
        })
    }

    /// Recover the absolute `(xmin, ymin, width, height)` box.
    pub fn to_absolute(&self, dims: ImageDimensions) -> (f64, f64, f64, f64) {
        let img_w = f64::from(dims.width);
        let img_h = f64::from(dims.height);
        let width = self.width * img_w;
        let height = self.height * img_h;
        (
            self.x_center * img_w - width / 2.0,
            self.y_center * img_h - height / 2.0,
            width,
            height,
        )
    }
}

impl fmt::Display for YoloRecord {
    /// Floats use the shortest representation that reads back to the same
    /// `f64`; `{:?}` keeps a trailing `.0` on integral values.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} {:?} {:?} {:?}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

/// Render the full label file for a set of boxes.
///
/// Empty input renders an empty string.
pub fn to_yolo_label_string(boxes: &[BoundingBox], dims: ImageDimensions) -> Option<String> {
    let mut out = String::new();
    for bbox in boxes {
        let record = YoloRecord::from_bbox(bbox, dims)?;
        out.push_str(&record.to_string());
        out.push('\n');
    }
    Some(out)
}

/// Writes `<output_dir>/<image stem path>.txt` label files.
#[derive(Clone, Debug)]
pub struct YoloLabelWriter {
    output_dir: PathBuf,
}

impl YoloLabelWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the label for `image_path` is written to.
    pub fn label_path(&self, image_path: &str) -> PathBuf {
        self.output_dir
            .join(derived_output_path(image_path, LABEL_EXTENSION))
    }
}

impl AnnotationSink for YoloLabelWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Yolo
    }

    fn write_record(
        &self,
        record: &AnnotationRecord,
        dims: ImageDimensions,
    ) -> Result<PathBuf, WiderError> {
        let label_path = self.label_path(&record.image_path);
        let contents = to_yolo_label_string(&record.boxes, dims).ok_or_else(|| {
            WiderError::ZeroImageDimension {
                path: PathBuf::from(&record.image_path),
                width: dims.width,
                height: dims.height,
            }
        })?;

        write_output_file(&label_path, &contents)?;
        tracing::info!(path = %label_path.display(), boxes = record.boxes.len(), "YOLO saved");
        Ok(label_path)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn record(image_path: &str, boxes: Vec<BoundingBox>) -> AnnotationRecord {
        AnnotationRecord {
            image_path: image_path.to_string(),
            box_count: boxes.len(),
            source_lines: Vec::new(),
            line_number: 1,
            boxes,
        }
    }

    #[test]
    fn converts_to_normalized_center_form() {
        let dims = ImageDimensions::new(1024, 683);
        let yolo = YoloRecord::from_bbox(&BoundingBox::new(449, 330, 122, 149), dims)
            .expect("non-degenerate");

        assert_eq!(yolo.class_id, 0);
        assert_eq!(yolo.x_center, 510.0 / 1024.0);
        assert_eq!(yolo.y_center, 404.5 / 683.0);
        assert_eq!(yolo.width, 122.0 / 1024.0);
        assert_eq!(yolo.height, 149.0 / 683.0);
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let bbox = BoundingBox::new(1, 1, 1, 1);
        assert!(YoloRecord::from_bbox(&bbox, ImageDimensions::new(0, 10)).is_none());
        assert!(YoloRecord::from_bbox(&bbox, ImageDimensions::new(10, 0)).is_none());
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let bbox = BoundingBox::new(90, -10, 40, 20);
        let yolo =
            YoloRecord::from_bbox(&bbox, ImageDimensions::new(100, 100)).expect("non-degenerate");
        assert!(yolo.x_center > 1.0);
        assert_eq!(yolo.y_center, 0.0);
    }

    #[test]
    fn display_keeps_full_precision() {
        let yolo = YoloRecord {
            class_id: 0,
            x_center: 0.5,
            y_center: 1.0 / 3.0,
            width: 1.0,
            height: 0.125,
        };
        assert_eq!(yolo.to_string(), "0 0.5 0.3333333333333333 1.0 0.125");
    }

    #[test]
    fn label_string_is_empty_for_no_boxes() {
        assert_eq!(
            to_yolo_label_string(&[], ImageDimensions::new(10, 10)),
            Some(String::new())
        );
    }

    #[test]
    fn writer_mirrors_image_tree() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let writer = YoloLabelWriter::new(temp.path().join("yolo"));
        let rec = record(
            "0--Parade\\a.jpg",
            vec![BoundingBox::new(0, 0, 10, 10), BoundingBox::new(5, 5, 2, 2)],
        );

        let written = writer
            .write_record(&rec, ImageDimensions::new(20, 20))
            .expect("write label");

        assert_eq!(
            written,
            temp.path().join("yolo").join("0--Parade").join("a.txt")
        );
        let contents = fs::read_to_string(&written).expect("read label");
        assert_eq!(contents, "0 0.25 0.25 0.5 0.5\n0 0.3 0.3 0.1 0.1\n");
    }

    #[test]
    fn writer_reports_degenerate_image() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let writer = YoloLabelWriter::new(temp.path());
        let rec = record("a.jpg", vec![BoundingBox::new(0, 0, 1, 1)]);

        let err = writer
            .write_record(&rec, ImageDimensions::new(0, 0))
            .unwrap_err();
        assert!(matches!(err, WiderError::ZeroImageDimension { .. }));
        assert!(!temp.path().join("a.txt").exists());
    }
}
