//! Reading WIDER Face annotation files.
//!
//! The [`parser`] module holds the line state machine shared by the filter
//! and conversion passes; [`model`] the records it yields.

mod model;
pub mod parser;
pub mod path;

use std::fs;
use std::path::Path;

pub use model::{AnnotationRecord, BoundingBox, ImageDimensions};
pub use parser::{parse_wider_str, AnnotationParser, ParseIssue, ParseIssueCode};

use crate::error::WiderError;

/// Read a whole annotation file into memory.
///
/// Failure here is fatal for whichever pass asked for the file.
pub fn read_annotation_file(path: &Path) -> Result<String, WiderError> {
    fs::read_to_string(path).map_err(|source| WiderError::ReadAnnotations {
        path: path.to_path_buf(),
        source,
    })
}
