//! Per-image output writers.
//!
//! The conversion pass hands every successfully sized record to each sink in
//! turn. Sinks do not share state, so a failure in one never stops the
//! others from running.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::WiderError;
use crate::wider::{AnnotationRecord, ImageDimensions};

/// Output formats produced by the conversion pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Yolo,
    Voc,
}

impl OutputFormat {
    /// Human-readable name for the format.
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Yolo => "yolo",
            OutputFormat::Voc => "voc",
        }
    }
}

/// Writes one derived file per annotation record.
pub trait AnnotationSink {
    fn format(&self) -> OutputFormat;

    /// Write the output for `record` and return the path written.
    fn write_record(
        &self,
        record: &AnnotationRecord,
        dims: ImageDimensions,
    ) -> Result<PathBuf, WiderError>;
}

/// Write `contents` to `path`, creating parent directories first.
pub(crate) fn write_output_file(path: &Path, contents: &str) -> Result<(), WiderError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| WiderError::CreateOutputDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, contents).map_err(|source| WiderError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}
