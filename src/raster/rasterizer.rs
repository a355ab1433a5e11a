//! Painter's-algorithm rasterization of transformed triangles.

use super::Canvas;
use crate::geometry::Triangle;
use crate::style::Style;

/// Rasterize `triangles` onto the canvas in input order.
///
/// Upright triangles contribute no pixels and are counted instead; the
/// count is the return value. `on_progress` receives the number of
/// triangles processed so far.
pub fn rasterize(
    canvas: &mut Canvas,
    triangles: &[Triangle],
    style: Style,
    mut on_progress: impl FnMut(u64),
) -> u64 {
    let mut upright = 0;
    for (index, triangle) in triangles.iter().enumerate() {
        if triangle.is_upright() {
            upright += 1;
        } else {
            rasterize_triangle(canvas, triangle, style);
        }
        on_progress(index as u64 + 1);
    }
    upright
}

/// Scan every pixel of the triangle's footprint: containment test, depth
/// solve, strict depth-buffer comparison, color write.
fn rasterize_triangle(canvas: &mut Canvas, triangle: &Triangle, style: Style) {
    // footprint intersected with the canvas; transformed coordinates already
    // land inside it for well-formed scale plans
    let min_x = triangle.pixel_box.min_x.max(0);
    let max_x = triangle.pixel_box.max_x.min(i64::from(canvas.width()) - 1);
    let min_y = triangle.pixel_box.min_y.max(0);
    let max_y = triangle.pixel_box.max_y.min(i64::from(canvas.height()) - 1);

    let color = style.shade(triangle.normal_unit);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (px, py) = (x as f64, y as f64);
            if !triangle.contains(px, py) {
                continue;
            }
            canvas.plot(x as u32, y as u32, triangle.depth_at(px, py), color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UP: [f64; 3] = [0.0, 0.0, 1.0];

    fn triangle(vertices: [[f64; 3]; 3], normal: [f64; 3]) -> Triangle {
        Triangle::new(normal, vertices).unwrap()
    }

    #[test]
    fn test_single_triangle_paints_its_interior() {
        let mut canvas = Canvas::new(16, 16, Style::Standard).unwrap();
        let triangles = vec![triangle(
            [[0.0, 0.0, 0.0], [15.0, 0.0, 0.0], [0.0, 15.0, 0.0]],
            UP,
        )];

        let upright = rasterize(&mut canvas, &triangles, Style::Standard, |_| {});
        assert_eq!(upright, 0);

        let image = canvas.into_image();
        let expected = Style::Standard.shade(UP);
        let background = Style::Standard.background();
        let mut painted = 0;
        for pixel in image.pixels() {
            if pixel.0 == expected {
                painted += 1;
            } else {
                assert_eq!(pixel.0, background);
            }
        }
        // integer points with x >= 0, y >= 0, x + y <= 15
        assert_eq!(painted, 136);
    }

    #[test]
    fn test_upright_triangle_is_counted_and_skipped() {
        let mut canvas = Canvas::new(8, 8, Style::Standard).unwrap();
        let triangles = vec![triangle(
            [[0.0, 0.0, 0.0], [7.0, 0.0, 0.0], [0.0, 7.0, 5.0]],
            [0.0, -1.0, 0.0],
        )];

        let upright = rasterize(&mut canvas, &triangles, Style::Standard, |_| {});
        assert_eq!(upright, 1);

        let background = Style::Standard.background();
        for pixel in canvas.into_image().pixels() {
            assert_eq!(pixel.0, background);
        }
    }

    #[test]
    fn test_nearer_triangle_wins_depth_test() {
        let mut canvas = Canvas::new(8, 8, Style::Standard).unwrap();
        let low = triangle([[0.0, 0.0, 0.0], [7.0, 0.0, 0.0], [0.0, 7.0, 0.0]], UP);
        let high = triangle(
            [[0.0, 0.0, 3.0], [7.0, 0.0, 3.0], [0.0, 7.0, 3.0]],
            [0.6, 0.0, 0.8],
        );

        rasterize(&mut canvas, &[low, high], Style::Standard, |_| {});

        assert_eq!(canvas.depth_at(1, 1), 3.0);
        let high_color = Style::Standard.shade([0.6, 0.0, 0.8]);
        assert_eq!(canvas.into_image().get_pixel(1, 6).0, high_color);
    }

    #[test]
    fn test_coplanar_tie_keeps_first_triangle() {
        let mut canvas = Canvas::new(8, 8, Style::Standard).unwrap();
        let first = triangle([[0.0, 0.0, 2.0], [7.0, 0.0, 2.0], [0.0, 7.0, 2.0]], UP);
        let second = triangle(
            [[0.0, 0.0, 2.0], [7.0, 0.0, 2.0], [0.0, 7.0, 2.0]],
            [0.6, 0.0, 0.8],
        );

        rasterize(&mut canvas, &[first, second], Style::Standard, |_| {});

        let first_color = Style::Standard.shade(UP);
        assert_eq!(canvas.into_image().get_pixel(1, 6).0, first_color);
    }

    #[test]
    fn test_footprint_clipped_to_canvas() {
        // bounding box pokes outside the 4x4 canvas; must not panic
        let mut canvas = Canvas::new(4, 4, Style::Standard).unwrap();
        let triangles = vec![triangle(
            [[-2.0, -2.0, 0.0], [6.0, -2.0, 0.0], [-2.0, 6.0, 0.0]],
            UP,
        )];

        rasterize(&mut canvas, &triangles, Style::Standard, |_| {});

        let expected = Style::Standard.shade(UP);
        let image = canvas.into_image();
        assert_eq!(image.get_pixel(0, 3).0, expected);
    }

    #[test]
    fn test_progress_reports_each_triangle() {
        let mut canvas = Canvas::new(4, 4, Style::Standard).unwrap();
        let t = triangle([[0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [0.0, 3.0, 0.0]], UP);
        let triangles = vec![t.clone(), t.clone(), t];

        let mut seen = Vec::new();
        rasterize(&mut canvas, &triangles, Style::Standard, |done| {
            seen.push(done)
        });
        assert_eq!(seen, vec![1, 2, 3]);
    }
}
