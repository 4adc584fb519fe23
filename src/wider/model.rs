//! Record types produced by the annotation parser.

use std::fmt;

use serde::Serialize;

/// An absolute pixel rectangle: top-left corner plus width and height.
///
/// Values are kept exactly as they appear in the source file. Negative or
/// zero-sized boxes are representable; nothing downstream clamps them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct BoundingBox {
    pub xmin: i32,
    pub ymin: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    #[inline]
    pub fn new(xmin: i32, ymin: i32, width: i32, height: i32) -> Self {
        Self {
            xmin,
            ymin,
            width,
            height,
        }
    }

    /// Right edge, computed in `i64` so extreme inputs cannot overflow.
    #[inline]
    pub fn xmax(&self) -> i64 {
        i64::from(self.xmin) + i64::from(self.width)
    }

    /// Bottom edge, computed in `i64` so extreme inputs cannot overflow.
    #[inline]
    pub fn ymax(&self) -> i64 {
        i64::from(self.ymin) + i64::from(self.height)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.xmin, self.ymin, self.width, self.height
        )
    }
}

/// Pixel dimensions of an image, as reported by an [`ImageSizeResolver`].
///
/// [`ImageSizeResolver`]: crate::image_size::ImageSizeResolver
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either side is zero, which makes normalization undefined.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// One image block from a WIDER annotation file.
///
/// `source_lines` holds every line the parser consumed for this record, in
/// order and trimmed: the image line, the count line, then each box line,
/// including box lines that were dropped as malformed. The filter pass
/// re-emits these unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationRecord {
    /// Image path exactly as written in the file (not yet normalized).
    pub image_path: String,
    /// Box count declared on the count line.
    pub box_count: usize,
    /// Boxes that parsed successfully, in file order.
    pub boxes: Vec<BoundingBox>,
    /// 1-based line number of the image line.
    pub line_number: usize,
    pub source_lines: Vec<String>,
}

impl AnnotationRecord {
    pub(crate) fn new(
        image_path: String,
        line_number: usize,
        count_line: String,
        box_count: usize,
    ) -> Self {
        Self {
            source_lines: vec![image_path.clone(), count_line],
            image_path,
            box_count,
            boxes: Vec::new(),
            line_number,
        }
    }

    /// Number of box lines actually consumed from the input.
    pub fn consumed_box_lines(&self) -> usize {
        self.source_lines.len().saturating_sub(2)
    }

    /// Number of consumed box lines that were dropped as malformed.
    pub fn dropped_box_lines(&self) -> usize {
        self.consumed_box_lines() - self.boxes.len()
    }

    /// Returns true if input ended before the declared number of box lines.
    pub fn is_truncated(&self) -> bool {
        self.consumed_box_lines() < self.box_count
    }
}
