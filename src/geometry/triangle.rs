//! Triangle in 3D space with utilities for projection onto the pixel grid.
//!
//! Vertices are expected in output-pixel units (post scaling/translation);
//! everything needed for fast repeated point tests is precomputed once at
//! construction, so containment and depth queries are pure reads.

/// Integer pixel footprint of a triangle's XY projection (floor of each
/// vertex coordinate, min/max across the three vertices).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

/// A validated triangle with precomputed plane and barycentric terms.
///
/// Construction rejects coincident and collinear vertices, so `denominator`
/// is non-zero and the barycentric weights are always finite.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Three vertices: [[x, y, z]; 3]
    pub vertices: [[f64; 3]; 3],
    /// Face normal as supplied by the source, normalized for shading.
    /// A zero-length source normal is kept as all zeros.
    pub normal_unit: [f64; 3],
    /// Unnormalized (v0 - v1) x (v2 - v1); coefficients of the plane equation.
    plane_normal: [f64; 3],
    /// Plane constant: -(plane_normal . v1)
    plane_offset: f64,
    pub pixel_box: PixelBox,
    // vertex coordinate differences feeding the barycentric weights
    x0mx2: f64,
    x2mx1: f64,
    y1my2: f64,
    y2my0: f64,
    denominator: f64,
}

impl Triangle {
    /// Build a triangle from a supplied face normal and three vertices.
    ///
    /// Returns `None` when two vertices coincide or the three vertices are
    /// exactly collinear; such triangles have no usable projection.
    pub fn new(normal: [f64; 3], vertices: [[f64; 3]; 3]) -> Option<Self> {
        if has_coincident_vertices(&vertices) || is_collinear(&vertices) {
            return None;
        }

        let [v0, v1, v2] = vertices;
        let plane_normal = cross(sub(v0, v1), sub(v2, v1));
        let plane_offset = -dot(plane_normal, v1);

        let x0mx2 = v0[0] - v2[0];
        let x2mx1 = v2[0] - v1[0];
        let y0my2 = v0[1] - v2[1];
        let y1my2 = v1[1] - v2[1];
        let y2my0 = v2[1] - v0[1];
        let denominator = y1my2 * x0mx2 + x2mx1 * y0my2;

        let mut pixel_box = PixelBox {
            min_x: i64::MAX,
            max_x: i64::MIN,
            min_y: i64::MAX,
            max_y: i64::MIN,
        };
        for vertex in &vertices {
            let x = vertex[0].floor() as i64;
            let y = vertex[1].floor() as i64;
            pixel_box.min_x = pixel_box.min_x.min(x);
            pixel_box.max_x = pixel_box.max_x.max(x);
            pixel_box.min_y = pixel_box.min_y.min(y);
            pixel_box.max_y = pixel_box.max_y.max(y);
        }

        Some(Self {
            vertices,
            normal_unit: normalize(normal),
            plane_normal,
            plane_offset,
            pixel_box,
            x0mx2,
            x2mx1,
            y1my2,
            y2my0,
            denominator,
        })
    }

    /// Barycentric weights of (x, y) relative to the XY projection.
    /// The third weight is derived as 1 - l0 - l1, not computed independently.
    pub fn barycentric(&self, x: f64, y: f64) -> (f64, f64, f64) {
        let l0 = (self.y1my2 * (x - self.vertices[2][0])
            + self.x2mx1 * (y - self.vertices[2][1]))
            / self.denominator;
        let l1 = (self.y2my0 * (x - self.vertices[2][0])
            + self.x0mx2 * (y - self.vertices[2][1]))
            / self.denominator;
        (l0, l1, 1.0 - l0 - l1)
    }

    /// Whether (x, y) falls inside the projected triangle, edges included.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (l0, l1, l2) = self.barycentric(x, y);
        l0 >= 0.0 && l1 >= 0.0 && l2 >= 0.0
    }

    /// Z of the triangle's plane at (x, y).
    ///
    /// Requires a plane normal with non-zero Z; upright triangles must be
    /// filtered out before depth is queried.
    pub fn depth_at(&self, x: f64, y: f64) -> f64 {
        -(self.plane_normal[0] * x + self.plane_normal[1] * y + self.plane_offset)
            / self.plane_normal[2]
    }

    /// Whether the XY projection collapses to a line: the supplied face
    /// normal has exactly zero Z.
    pub fn is_upright(&self) -> bool {
        self.normal_unit[2] == 0.0
    }
}

/// Any two vertices at exact zero Euclidean distance.
pub fn has_coincident_vertices(vertices: &[[f64; 3]; 3]) -> bool {
    distance(&vertices[0], &vertices[1]) == 0.0
        || distance(&vertices[0], &vertices[2]) == 0.0
        || distance(&vertices[1], &vertices[2]) == 0.0
}

/// Whether the three vertices form a straight line in space.
///
/// The vertex with the smallest adjacent-edge sum sits between the other
/// two; the points are collinear iff its two edges sum exactly to the third
/// side. Exact comparison, no epsilon: near-collinear input is accepted.
pub fn is_collinear(vertices: &[[f64; 3]; 3]) -> bool {
    let d01 = distance(&vertices[0], &vertices[1]);
    let d02 = distance(&vertices[0], &vertices[2]);
    let d12 = distance(&vertices[1], &vertices[2]);
    let d0 = d01 + d02;
    let d1 = d01 + d12;
    let d2 = d02 + d12;
    if d0 < d1 && d0 < d2 {
        d01 + d02 == d12
    } else if d1 < d0 && d1 < d2 {
        d01 + d12 == d02
    } else {
        d02 + d12 == d01
    }
}

fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let len = dot(v, v).sqrt();
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}
