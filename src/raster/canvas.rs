//! Depth buffer plus output raster for one pipeline run.

use image::{Rgba, RgbaImage};

use crate::pipeline::PipelineError;
use crate::style::Style;

/// A `width x height` grid of depth cells paired 1:1 with an RGBA raster.
///
/// Depth cells start at negative infinity and keep the running maximum depth
/// seen per pixel; the raster starts at the style's background color. Owned
/// by exactly one pipeline run and consumed when the run finishes.
pub struct Canvas {
    width: u32,
    height: u32,
    depth: Vec<f64>,
    image: RgbaImage,
}

impl Canvas {
    /// Allocate a cleared canvas.
    ///
    /// Allocation failures for oversized canvases surface as
    /// [`PipelineError::OutOfResources`] instead of aborting the process.
    pub fn new(width: u32, height: u32, style: Style) -> Result<Self, PipelineError> {
        let too_big = || PipelineError::OutOfResources { width, height };
        let cells = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(too_big)?;
        let bytes = cells.checked_mul(4).ok_or_else(too_big)?;

        let mut depth = Vec::new();
        depth.try_reserve_exact(cells).map_err(|_| too_big())?;
        depth.resize(cells, f64::NEG_INFINITY);

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(bytes).map_err(|_| too_big())?;
        let background = style.background();
        for _ in 0..cells {
            pixels.extend_from_slice(&background);
        }
        let image = RgbaImage::from_raw(width, height, pixels).ok_or_else(too_big)?;

        Ok(Self {
            width,
            height,
            depth,
            image,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Write `color` at (x, y) if `depth` wins the strict depth test.
    ///
    /// Equal depth does not overwrite, so among exactly coplanar triangles
    /// the first writer keeps the pixel. (x, y) are model-oriented pixel
    /// coordinates; the raster is flipped vertically so image row 0 holds
    /// the model's maximum Y.
    pub fn plot(&mut self, x: u32, y: u32, depth: f64, color: [u8; 4]) -> bool {
        let cell = y as usize * self.width as usize + x as usize;
        if depth > self.depth[cell] {
            self.depth[cell] = depth;
            self.image.put_pixel(x, self.height - 1 - y, Rgba(color));
            true
        } else {
            false
        }
    }

    /// Stored depth at model-oriented (x, y), for inspection.
    pub fn depth_at(&self, x: u32, y: u32) -> f64 {
        self.depth[y as usize * self.width as usize + x as usize]
    }

    /// Consume the canvas, keeping only the finished raster.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}
