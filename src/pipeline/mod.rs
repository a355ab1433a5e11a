//! Pipeline driver: validation, scaling, transform, rasterization.
//!
//! One run is a single sequential unit of work over one [`SurfaceModel`];
//! nothing is shared between runs, so callers may execute independent runs
//! on separate threads without locking.

use image::RgbaImage;
use thiserror::Error;

use crate::geometry::triangle::{has_coincident_vertices, is_collinear};
use crate::geometry::{Bounds, ScalePlan, Triangle};
use crate::raster::{self, Canvas};
use crate::stl::{Facet, SurfaceModel};
use crate::style::Style;

/// Terminal failure of a conversion run.
///
/// The first three kinds are the "no usable data" conditions checked in
/// order; individual invalid or upright triangles are never errors, only
/// counted.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("file has no valid surfaces")]
    NoSurfaces,
    #[error("file has no polygons")]
    NoPolygons,
    #[error("file has no valid polygons")]
    NoValidPolygons,
    #[error("STL file not properly formatted: {0}")]
    InvalidFormat(String),
    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),
    #[error("output image is too big to allocate ({width}x{height})")]
    OutOfResources { width: u32, height: u32 },
    #[error("failed to encode output image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Non-fatal rejections accumulated over a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IgnoredCounts {
    /// Triangles with coincident or exactly collinear vertices.
    pub invalid: u64,
    /// Triangles whose XY projection collapses to a line.
    pub upright: u64,
}

impl IgnoredCounts {
    pub fn any(&self) -> bool {
        self.invalid > 0 || self.upright > 0
    }
}

/// Progress checkpoint indices, one per reported phase.
pub const PROGRESS_VALIDATE: usize = 0;
pub const PROGRESS_TRANSFORM: usize = 1;
pub const PROGRESS_CLEAR: usize = 2;
pub const PROGRESS_RASTERIZE: usize = 3;
pub const PROGRESS_COUNT: usize = 4;

/// Sink for the four per-phase progress gauges.
///
/// Each gauge's maximum is set once before its phase begins and its value
/// only grows within the phase. Implementations decide how, or whether,
/// progress is displayed.
pub trait ProgressSink {
    fn set_maximum(&self, index: usize, maximum: u64);
    fn set_value(&self, index: usize, value: u64);
}

/// Sink that discards all progress updates.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn set_maximum(&self, _index: usize, _maximum: u64) {}
    fn set_value(&self, _index: usize, _value: u64) {}
}

/// Everything a successful run produces: the raster plus the diagnostics
/// the caller reports to the user.
#[derive(Debug)]
pub struct RunOutput {
    pub image: RgbaImage,
    pub counts: IgnoredCounts,
    /// Bounding box of the valid facets in un-scaled model units.
    pub bounds: Bounds,
    pub plan: ScalePlan,
}

/// Convert the model's first surface group into a normal-map raster.
///
/// Phases: validation scan, scale planning, transform into pixel space,
/// canvas clear, rasterization. On any terminal error all four progress
/// gauges are reset to an idle (1, 1) state.
pub fn run(
    model: &SurfaceModel,
    width: u32,
    height: u32,
    style: Style,
    progress: &dyn ProgressSink,
) -> Result<RunOutput, PipelineError> {
    let result = run_inner(model, width, height, style, progress);
    if result.is_err() {
        for index in 0..PROGRESS_COUNT {
            progress.set_maximum(index, 1);
            progress.set_value(index, 1);
        }
    }
    result
}

fn run_inner(
    model: &SurfaceModel,
    width: u32,
    height: u32,
    style: Style,
    progress: &dyn ProgressSink,
) -> Result<RunOutput, PipelineError> {
    let group = model.groups.first().ok_or(PipelineError::NoSurfaces)?;
    if group.is_empty() {
        return Err(PipelineError::NoPolygons);
    }

    progress.set_maximum(PROGRESS_VALIDATE, group.len() as u64);
    for index in 0..PROGRESS_COUNT {
        progress.set_value(index, 0);
    }

    // validation scan: drop degenerate and collinear facets, grow the
    // bounding box over the survivors only
    let mut counts = IgnoredCounts::default();
    let mut bounds = Bounds::empty();
    let mut valid: Vec<&Facet> = Vec::with_capacity(group.len());
    for (index, facet) in group.iter().enumerate() {
        if has_coincident_vertices(&facet.vertices) || is_collinear(&facet.vertices) {
            counts.invalid += 1;
        } else {
            for vertex in &facet.vertices {
                bounds.expand_point(vertex[0], vertex[1]);
            }
            valid.push(facet);
        }
        progress.set_value(PROGRESS_VALIDATE, index as u64 + 1);
    }
    if valid.is_empty() {
        return Err(PipelineError::NoValidPolygons);
    }

    let plan = ScalePlan::fit(&bounds, width, height);

    // transform: translate to the origin, apply the uniform scale, rebuild
    // each triangle so plane and barycentric terms match pixel space
    progress.set_maximum(PROGRESS_TRANSFORM, valid.len() as u64);
    let mut triangles = Vec::with_capacity(valid.len());
    for (index, facet) in valid.iter().enumerate() {
        let mut vertices = facet.vertices;
        for vertex in &mut vertices {
            vertex[0] = (vertex[0] - bounds.min_x) * plan.scale;
            vertex[1] = (vertex[1] - bounds.min_y) * plan.scale;
            vertex[2] *= plan.scale;
        }
        // construction only fails if scaling collapsed the triangle; such a
        // triangle could not have produced pixels anyway
        if let Some(triangle) = Triangle::new(facet.normal, vertices) {
            triangles.push(triangle);
        }
        progress.set_value(PROGRESS_TRANSFORM, index as u64 + 1);
    }

    progress.set_maximum(PROGRESS_CLEAR, u64::from(plan.height));
    let mut canvas = Canvas::new(plan.width, plan.height, style)?;
    progress.set_value(PROGRESS_CLEAR, u64::from(plan.height));

    progress.set_maximum(PROGRESS_RASTERIZE, triangles.len() as u64);
    counts.upright = raster::rasterize(&mut canvas, &triangles, style, |done| {
        progress.set_value(PROGRESS_RASTERIZE, done)
    });

    Ok(RunOutput {
        image: canvas.into_image(),
        counts,
        bounds,
        plan,
    })
}
