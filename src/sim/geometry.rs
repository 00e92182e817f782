//! 2D geometry for sector polygons and wall segments
//!
//! Everything here is a pure function over map-plane points. Map `y` is the
//! renderer's depth axis; heights never show up in this module.

use glam::Vec2;

use crate::consts::PARALLEL_EPSILON;

/// Intersection of a ray with a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Intersection point
    pub point: Vec2,
    /// Ray parameter (multiples of the ray vector), used to rank hits by distance
    pub t: f32,
}

/// Where a point sits relative to a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Perpendicular distance from the point to the infinite line
    pub distance: f32,
    /// Scalar projection of the point onto the segment, measured from its start
    pub along: f32,
    /// Segment length
    pub length: f32,
    /// Unit direction from segment start to end
    pub tangent: Vec2,
}

impl SegmentProjection {
    /// True when the projection lands on the segment itself
    #[inline]
    pub fn within_segment(&self) -> bool {
        self.along >= 0.0 && self.along <= self.length
    }
}

/// Even-odd point in polygon test.
///
/// Vertices are taken in the given order. Points exactly on an edge may land
/// on either side.
pub fn point_in_polygon(point: Vec2, vertices: &[Vec2]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = vertices[i];
        let vj = vertices[j];
        // Different sides guarantees vj.y != vi.y below
        if (vi.y > point.y) != (vj.y > point.y) {
            let cross_x = (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x;
            if point.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Intersect the ray `p1 → p2` with the segment `p3 → p4`.
///
/// The ray extends past `p2` (`t` may exceed 1) but never behind `p1`.
/// Returns `None` for parallel lines or when the hit is off the segment.
pub fn segment_intersect(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> Option<RayHit> {
    let ray = p2 - p1;
    let seg = p4 - p3;

    let det = ray.perp_dot(seg);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }

    let diff = p3 - p1;
    let t = diff.perp_dot(seg) / det;
    let u = diff.perp_dot(ray) / det;

    if t < 0.0 || !(0.0..=1.0).contains(&u) {
        return None;
    }

    Some(RayHit {
        point: p1 + ray * t,
        t,
    })
}

/// Round `value` to the nearest multiple of `step`
#[inline]
pub fn snap_to_grid(value: f32, step: f32) -> f32 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}

/// Snap both coordinates of a point
#[inline]
pub fn snap_point(p: Vec2, step: f32) -> Vec2 {
    Vec2::new(snap_to_grid(p.x, step), snap_to_grid(p.y, step))
}

/// Project `point` onto the segment `a → b`.
///
/// Returns `None` for a zero-length segment.
pub fn project_onto_segment(point: Vec2, a: Vec2, b: Vec2) -> Option<SegmentProjection> {
    let edge = b - a;
    let length = edge.length();
    if length < f32::EPSILON {
        return None;
    }

    let tangent = edge / length;
    let rel = point - a;
    Some(SegmentProjection {
        distance: tangent.perp_dot(rel).abs(),
        along: rel.dot(tangent),
        length,
        tangent,
    })
}

/// Shoelace area; positive for counter-clockwise rings (y up)
pub fn signed_area(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f32 = (0..n)
        .map(|i| vertices[i].perp_dot(vertices[(i + 1) % n]))
        .sum();
    twice * 0.5
}

/// Average of the vertices (good enough as an interior point for convex rings)
pub fn vertex_centroid(vertices: &[Vec2]) -> Vec2 {
    if vertices.is_empty() {
        return Vec2::ZERO;
    }
    vertices.iter().copied().sum::<Vec2>() / vertices.len() as f32
}
