//! Image dimension lookup.
//!
//! Only width and height are needed, so the production resolver reads just
//! the image header through `imagesize` rather than decoding pixels.

use std::path::Path;

use crate::error::WiderError;
use crate::wider::ImageDimensions;

/// Something that can report the pixel size of an image on disk.
pub trait ImageSizeResolver {
    fn image_size(&self, path: &Path) -> Result<ImageDimensions, WiderError>;
}

/// Header-probing resolver backed by the `imagesize` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeaderSizeResolver;

impl ImageSizeResolver for HeaderSizeResolver {
    fn image_size(&self, path: &Path) -> Result<ImageDimensions, WiderError> {
        let size = imagesize::size(path).map_err(|source| WiderError::ImageDimensionRead {
            path: path.to_path_buf(),
            source,
        })?;

        let width: u32 = size
            .width
            .try_into()
            .map_err(|_| WiderError::ImageTooLarge {
                path: path.to_path_buf(),
                message: format!("width {} does not fit in u32", size.width),
            })?;

        let height: u32 = size
            .height
            .try_into()
            .map_err(|_| WiderError::ImageTooLarge {
                path: path.to_path_buf(),
                message: format!("height {} does not fit in u32", size.height),
            })?;

        tracing::debug!(path = %path.display(), width, height, "image size");
        Ok(ImageDimensions::new(width, height))
    }
}

impl<F> ImageSizeResolver for F
where
    F: Fn(&Path) -> Result<ImageDimensions, WiderError>,
{
    fn image_size(&self, path: &Path) -> Result<ImageDimensions, WiderError> {
        self(path)
    }
}
