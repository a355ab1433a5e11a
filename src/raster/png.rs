//! PNG encoding of the finished raster.

use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::pipeline::PipelineError;

/// Persist the raster as a PNG file.
///
/// Encoder and file-system failures surface as
/// [`PipelineError::Encode`] / [`PipelineError::Io`], kept separate from
/// geometry errors.
pub fn write_png(path: &Path, image: &RgbaImage) -> Result<(), PipelineError> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
