use std::path::PathBuf;
use thiserror::Error;

/// The main error type for widerlabel operations.
///
/// Only conditions that abort a whole pass are surfaced through this type at
/// the top level. Per-line and per-record problems are logged and counted by
/// the passes themselves.
#[derive(Debug, Error)]
pub enum WiderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read annotation file {path}: {source}")]
    ReadAnnotations {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory {path}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Image {path} has a zero dimension ({width}x{height})")]
    ZeroImageDimension {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    #[error("Image {path} is too large: {message}")]
    ImageTooLarge { path: PathBuf, message: String },

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Missing required setting '{0}' (pass it as a flag, an environment variable, or in the config file)")]
    MissingConfig(&'static str),

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),
}
