//! Pascal VOC XML output.
//!
//! Each image gets one `<annotation>` document with a fixed layout:
//! folder, filename, source database, size, segmented flag, then one
//! `<object>` per face box. Boxes are written as absolute XYXY pixels.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::WiderError;
use crate::sink::{write_output_file, AnnotationSink, OutputFormat};
use crate::wider::path::{basename, derived_output_path, normalize_image_path};
use crate::wider::{AnnotationRecord, BoundingBox, ImageDimensions};

const VOC_XML_EXTENSION: &str = "xml";
const SOURCE_DATABASE: &str = "WIDER Face";
const OBJECT_NAME: &str = "face";
const OBJECT_POSE: &str = "Unspecified";
const IMAGE_DEPTH: u32 = 3;

/// In-memory VOC annotation document for a single image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocDocument {
    pub folder: String,
    pub filename: String,
    pub database: String,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub segmented: bool,
    pub objects: Vec<VocObject>,
}

/// One `<object>` element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocObject {
    pub name: String,
    pub pose: String,
    pub truncated: bool,
    pub difficult: bool,
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

impl VocObject {
    /// A face object spanning `bbox`.
    pub fn face(bbox: &BoundingBox) -> Self {
        Self {
            name: OBJECT_NAME.to_string(),
            pose: OBJECT_POSE.to_string(),
            truncated: false,
            difficult: false,
            xmin: i64::from(bbox.xmin),
            ymin: i64::from(bbox.ymin),
            xmax: bbox.xmax(),
            ymax: bbox.ymax(),
        }
    }
}

impl VocDocument {
    /// Start a document for `image_path` with no objects.
    ///
    /// `folder` is the name of the VOC output directory, `filename` the last
    /// component of the normalized image path.
    pub fn new(image_path: &str, dims: ImageDimensions, output_dir: &Path) -> Self {
        Self {
            folder: basename(output_dir),
            filename: basename(&normalize_image_path(image_path)),
            database: SOURCE_DATABASE.to_string(),
            width: dims.width,
            height: dims.height,
            depth: IMAGE_DEPTH,
            segmented: false,
            objects: Vec::new(),
        }
    }

    /// Add one face object per box.
    pub fn with_boxes<'a>(mut self, boxes: impl IntoIterator<Item = &'a BoundingBox>) -> Self {
        self.objects.extend(boxes.into_iter().map(VocObject::face));
        self
    }

    /// Build the full document for a parsed record.
    pub fn from_record(
        record: &AnnotationRecord,
        dims: ImageDimensions,
        output_dir: &Path,
    ) -> Self {
        Self::new(&record.image_path, dims, output_dir).with_boxes(&record.boxes)
    }

    pub fn to_xml_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VocDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<?xml version=\"1.0\" encoding=\"utf-8\"?>")?;
        writeln!(f, "<annotation>")?;
        writeln!(f, "  <folder>{}</folder>", xml_escape(&self.folder))?;
        writeln!(f, "  <filename>{}</filename>", xml_escape(&self.filename))?;
        writeln!(f, "  <source>")?;
        writeln!(f, "    <database>{}</database>", xml_escape(&self.database))?;
        writeln!(f, "  </source>")?;
        writeln!(f, "  <size>")?;
        writeln!(f, "    <width>{}</width>", self.width)?;
        writeln!(f, "    <height>{}</height>", self.height)?;
        writeln!(f, "    <depth>{}</depth>", self.depth)?;
        writeln!(f, "  </size>")?;
        writeln!(f, "  <segmented>{}</segmented>", flag(self.segmented))?;

        for object in &self.objects {
            writeln!(f, "  <object>")?;
            writeln!(f, "    <name>{}</name>", xml_escape(&object.name))?;
            writeln!(f, "    <pose>{}</pose>", xml_escape(&object.pose))?;
            writeln!(f, "    <truncated>{}</truncated>", flag(object.truncated))?;
            writeln!(f, "    <difficult>{}</difficult>", flag(object.difficult))?;
            writeln!(f, "    <bndbox>")?;
            writeln!(f, "      <xmin>{}</xmin>", object.xmin)?;
            writeln!(f, "      <ymin>{}</ymin>", object.ymin)?;
            writeln!(f, "      <xmax>{}</xmax>", object.xmax)?;
            writeln!(f, "      <ymax>{}</ymax>", object.ymax)?;
            writeln!(f, "    </bndbox>")?;
            writeln!(f, "  </object>")?;
        }

        writeln!(f, "</annotation>")
    }
}

/// Writes `<output_dir>/<image stem path>.xml` documents.
#[derive(Clone, Debug)]
pub struct VocWriter {
    output_dir: PathBuf,
}

impl VocWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the document for `image_path` is written to.
    pub fn xml_path(&self, image_path: &str) -> PathBuf {
        self.output_dir
            .join(derived_output_path(image_path, VOC_XML_EXTENSION))
    }
}

impl AnnotationSink for VocWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Voc
    }

    fn write_record(
        &self,
        record: &AnnotationRecord,
        dims: ImageDimensions,
    ) -> Result<PathBuf, WiderError> {
        let xml_path = self.xml_path(&record.image_path);
        let document = VocDocument::from_record(record, dims, &self.output_dir);

        write_output_file(&xml_path, &document.to_xml_string())?;
        tracing::info!(path = %xml_path.display(), objects = document.objects.len(), "XML saved");
        Ok(xml_path)
    }
}

fn flag(value: bool) -> u8 {
    u8::from(value)
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
