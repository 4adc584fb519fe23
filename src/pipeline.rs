//! Filter then convert, end to end.

use std::fmt;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::conversion::convert_annotations;
use crate::error::WiderError;
use crate::filter::filter_annotations;
use crate::image_size::ImageSizeResolver;
use crate::report::{ConversionReport, FilterReport};
use crate::voc::VocWriter;
use crate::yolo::YoloLabelWriter;

/// Reports from both passes of a pipeline run.
#[derive(Clone, Debug, Serialize)]
pub struct PipelineReport {
    pub filter: FilterReport,
    pub conversion: ConversionReport,
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.filter)?;
        write!(f, "{}", self.conversion)
    }
}

/// Create the output roots, filter the annotation file down to images that
/// exist, then convert the filtered file to YOLO and VOC.
pub fn run_pipeline(
    config: &PipelineConfig,
    resolver: &dyn ImageSizeResolver,
) -> Result<PipelineReport, WiderError> {
    config.create_output_dirs()?;

    let filter = filter_annotations(&config.annotations, &config.images, &config.filtered)?;

    let yolo = YoloLabelWriter::new(&config.yolo_dir);
    let voc = VocWriter::new(&config.voc_dir);
    let conversion =
        convert_annotations(&config.filtered, &config.images, resolver, &[&yolo, &voc])?;

    Ok(PipelineReport { filter, conversion })
}
