//! Fit-to-canvas scale planning.

/// Bounding box of the valid facets' XY projection, in model units.
#[derive(Debug, Clone)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Empty box that any expansion will overwrite.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Grow the box to include a projected point.
    pub fn expand_point(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// One uniform scale factor plus the final canvas size that fits the model
/// while keeping its aspect ratio.
///
/// Only one requested dimension is honored exactly; the other is derived
/// from the model's aspect ratio as `floor(span * scale) + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalePlan {
    /// Applied uniformly to X, Y and Z.
    pub scale: f64,
    pub width: u32,
    pub height: u32,
}

impl ScalePlan {
    /// Pick the scale that fits `bounds` into a `width` x `height` canvas.
    ///
    /// The larger of the two per-axis candidates is tried first and accepted
    /// only if the other axis still fits; otherwise the smaller one wins.
    /// A zero span on one axis yields an infinite candidate, which always
    /// overflows and falls back to the finite axis, deriving the flat axis
    /// to a single pixel. A model that is flat on both axes maps to a 1x1
    /// canvas at scale 1.
    pub fn fit(bounds: &Bounds, width: u32, height: u32) -> Self {
        let span_x = bounds.width();
        let span_y = bounds.height();
        if span_x == 0.0 && span_y == 0.0 {
            return Self {
                scale: 1.0,
                width: 1,
                height: 1,
            };
        }

        let scale_x = (f64::from(width) - 1.0) / span_x;
        let scale_y = (f64::from(height) - 1.0) / span_y;
        if scale_x > scale_y {
            if (scale_x * span_y).round() <= f64::from(height) - 1.0 {
                Self {
                    scale: scale_x,
                    width,
                    height: derive_dimension(span_y, scale_x),
                }
            } else {
                Self {
                    scale: scale_y,
                    width: derive_dimension(span_x, scale_y),
                    height,
                }
            }
        } else if (scale_y * span_x).round() <= f64::from(width) - 1.0 {
            Self {
                scale: scale_y,
                width: derive_dimension(span_x, scale_y),
                height,
            }
        } else {
            Self {
                scale: scale_x,
                width,
                height: derive_dimension(span_y, scale_x),
            }
        }
    }
}

fn derive_dimension(span: f64, scale: f64) -> u32 {
    (span * scale).floor() as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(span_x: f64, span_y: f64) -> Bounds {
        let mut bounds = Bounds::empty();
        bounds.expand_point(0.0, 0.0);
        bounds.expand_point(span_x, span_y);
        bounds
    }

    #[test]
    fn test_bounds_expand() {
        let mut bounds = Bounds::empty();
        bounds.expand_point(-3.0, 2.0);
        bounds.expand_point(5.0, -1.0);
        assert_eq!(bounds.min_x, -3.0);
        assert_eq!(bounds.max_x, 5.0);
        assert_eq!(bounds.min_y, -1.0);
        assert_eq!(bounds.max_y, 2.0);
        assert_eq!(bounds.width(), 8.0);
        assert_eq!(bounds.height(), 3.0);
    }

    #[test]
    fn test_wide_model_limits_on_x() {
        // span 100x50 into 512x512: the Y candidate (511/50) would need
        // 1022 columns, so the X candidate wins and height is derived
        let plan = ScalePlan::fit(&bounds(100.0, 50.0), 512, 512);
        assert_eq!(plan.scale, 511.0 / 100.0);
        assert_eq!(plan.width, 512);
        assert_eq!(plan.height, (50.0 * plan.scale).floor() as u32 + 1);
        assert_eq!(plan.height, 256);
    }

    #[test]
    fn test_tall_model_limits_on_y() {
        let plan = ScalePlan::fit(&bounds(50.0, 100.0), 512, 512);
        assert_eq!(plan.scale, 511.0 / 100.0);
        assert_eq!(plan.height, 512);
        assert_eq!(plan.width, 256);
    }

    #[test]
    fn test_square_model_fills_square_canvas() {
        let plan = ScalePlan::fit(&bounds(10.0, 10.0), 16, 16);
        assert_eq!(plan.scale, 1.5);
        assert_eq!(plan.width, 16);
        assert_eq!(plan.height, 16);
    }

    #[test]
    fn test_larger_candidate_rejected_when_other_axis_overflows() {
        // span 100x50 into 512x256: scale_x = 511/100 = 5.11,
        // scale_y = 255/50 = 5.1; round(5.11 * 50) = 256 > 255, so the
        // smaller scale wins and width is derived
        let plan = ScalePlan::fit(&bounds(100.0, 50.0), 512, 256);
        assert_eq!(plan.scale, 5.1);
        assert_eq!(plan.height, 256);
        assert_eq!(plan.width, 511);
    }

    #[test]
    fn test_zero_span_x_derives_single_column() {
        let plan = ScalePlan::fit(&bounds(0.0, 10.0), 64, 64);
        assert_eq!(plan.scale, 63.0 / 10.0);
        assert_eq!(plan.width, 1);
        assert_eq!(plan.height, 64);
    }

    #[test]
    fn test_zero_span_y_derives_single_row() {
        let plan = ScalePlan::fit(&bounds(10.0, 0.0), 64, 64);
        assert_eq!(plan.scale, 63.0 / 10.0);
        assert_eq!(plan.width, 64);
        assert_eq!(plan.height, 1);
    }

    #[test]
    fn test_point_model_maps_to_single_pixel() {
        let plan = ScalePlan::fit(&bounds(0.0, 0.0), 64, 64);
        assert_eq!(
            plan,
            ScalePlan {
                scale: 1.0,
                width: 1,
                height: 1,
            }
        );
    }
}
