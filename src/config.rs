//! Paths the pipeline runs against.
//!
//! There are exactly five settings, all filesystem paths. They can come from
//! a YAML file, from CLI flags, or from both; flags win.
//!
//! ```yaml
//! annotations: wider_face_split/wider_face_val_bbx_gt.txt
//! images: WIDER_val/images
//! filtered: output/wider_face_val_filtered.txt
//! yolo_dir: output/yolo
//! voc_dir: output/voc
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WiderError;

/// Fully resolved pipeline settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PipelineConfig {
    /// Source WIDER annotation file.
    pub annotations: PathBuf,
    /// Directory the annotation image paths are relative to.
    pub images: PathBuf,
    /// Where the filter pass writes the reduced annotation file.
    pub filtered: PathBuf,
    pub yolo_dir: PathBuf,
    pub voc_dir: PathBuf,
}

impl PipelineConfig {
    /// Create the YOLO and VOC output roots.
    pub fn create_output_dirs(&self) -> Result<(), WiderError> {
        create_output_dir(&self.yolo_dir)?;
        create_output_dir(&self.voc_dir)
    }
}

/// Settings where any field may still be unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    pub annotations: Option<PathBuf>,
    pub images: Option<PathBuf>,
    pub filtered: Option<PathBuf>,
    pub yolo_dir: Option<PathBuf>,
    pub voc_dir: Option<PathBuf>,
}

impl PartialConfig {
    /// Load settings from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, WiderError> {
        let raw = fs::read_to_string(path).map_err(|source| WiderError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw, path)
    }

    fn from_yaml_str(raw: &str, path: &Path) -> Result<Self, WiderError> {
        serde_yaml::from_str(raw).map_err(|source| WiderError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fields set in `overrides` replace the ones in `self`.
    pub fn merge(self, overrides: PartialConfig) -> Self {
        Self {
            annotations: overrides.annotations.or(self.annotations),
            images: overrides.images.or(self.images),
            filtered: overrides.filtered.or(self.filtered),
            yolo_dir: overrides.yolo_dir.or(self.yolo_dir),
            voc_dir: overrides.voc_dir.or(self.voc_dir),
        }
    }

    /// Require every field to be set.
    pub fn resolve(self) -> Result<PipelineConfig, WiderError> {
        Ok(PipelineConfig {
            annotations: self
                .annotations
                .ok_or(WiderError::MissingConfig("annotations"))?,
            images: self.images.ok_or(WiderError::MissingConfig("images"))?,
            filtered: self.filtered.ok_or(WiderError::MissingConfig("filtered"))?,
            yolo_dir: self.yolo_dir.ok_or(WiderError::MissingConfig("yolo_dir"))?,
            voc_dir: self.voc_dir.ok_or(WiderError::MissingConfig("voc_dir"))?,
        })
    }
}

/// Create an output directory and its parents. Failure is fatal to the run.
pub fn create_output_dir(path: &Path) -> Result<(), WiderError> {
    fs::create_dir_all(path).map_err(|source| WiderError::CreateOutputDir {
        path: path.to_path_buf(),
        source,
    })
}
