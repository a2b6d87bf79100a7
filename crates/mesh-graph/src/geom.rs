//! Plane and line primitives used by face construction and offsetting.
//!
//! All functions are pure. Degenerate inputs (parallel planes, a line lying
//! in or parallel to a plane, zero-length directions) produce `None` rather
//! than NaN-laden results, so callers can branch on them explicitly.

use nalgebra::{Point3, Vector3};

/// Default distance tolerance for coplanarity and vertex merging.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Tolerance on the sine of the angle between two directions below which they
/// are treated as parallel. Normals of imported faces carry rounding noise
/// well above machine precision.
pub const PARALLEL_TOLERANCE: f64 = DEFAULT_TOLERANCE;

/// A plane given by a point on it and a normal vector.
///
/// The normal does not need to be unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Create a plane from a point and a normal.
    #[inline]
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { point, normal }
    }

    /// Unit normal, or `None` if the normal has zero length.
    pub fn unit_normal(&self) -> Option<Vector3<f64>> {
        self.normal.try_normalize(f64::MIN_POSITIVE)
    }

    /// Signed distance from `p` to the plane, positive on the normal side.
    pub fn signed_distance(&self, p: &Point3<f64>) -> Option<f64> {
        self.unit_normal().map(|n| n.dot(&(p - self.point)))
    }
}

/// An infinite line given by a point on it and a direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub point: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Line {
    /// Create a line from a point and a direction.
    #[inline]
    pub fn new(point: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { point, direction }
    }
}

/// Move `point` by `distance` along `direction`.
///
/// The direction is normalized first; a zero direction leaves the point
/// unchanged. A negative distance moves against the direction.
pub fn offset_point(point: &Point3<f64>, direction: &Vector3<f64>, distance: f64) -> Point3<f64> {
    match direction.try_normalize(f64::MIN_POSITIVE) {
        Some(unit) => point + unit * distance,
        None => *point,
    }
}

/// Intersect two planes.
///
/// Returns `None` when the planes are parallel (which includes coplanar
/// planes) or when either normal has zero length.
pub fn intersect_plane_plane(a: &Plane, b: &Plane) -> Option<Line> {
    let n1 = a.unit_normal()?;
    let n2 = b.unit_normal()?;
    let direction = n1.cross(&n2);
    let len_sq = direction.norm_squared();
    if len_sq.sqrt() < PARALLEL_TOLERANCE {
        return None;
    }

    // Point satisfying n1·x = d1 and n2·x = d2, closest to the origin.
    let d1 = n1.dot(&a.point.coords);
    let d2 = n2.dot(&b.point.coords);
    let coords = (n2.cross(&direction) * d1 + direction.cross(&n1) * d2) / len_sq;

    Some(Line::new(Point3::from(coords), direction / len_sq.sqrt()))
}

/// Intersect a line with a plane.
///
/// Returns `None` when the line is parallel to the plane (including lying in
/// it) or either direction vector has zero length.
pub fn intersect_line_plane(line: &Line, plane: &Plane) -> Option<Point3<f64>> {
    let n = plane.unit_normal()?;
    let dir = line.direction.try_normalize(f64::MIN_POSITIVE)?;
    let denom = n.dot(&dir);
    if denom.abs() < PARALLEL_TOLERANCE {
        return None;
    }
    let t = n.dot(&(plane.point - line.point)) / denom;
    Some(line.point + dir * t)
}

/// Orthogonal projection of `point` onto `line`.
///
/// A zero-length line direction projects onto the line's anchor point.
pub fn project_to_line(point: &Point3<f64>, line: &Line) -> Point3<f64> {
    let len_sq = line.direction.norm_squared();
    if len_sq == 0.0 {
        return line.point;
    }
    let t = (point - line.point).dot(&line.direction) / len_sq;
    line.point + line.direction * t
}

/// Area-weighted polygon normal by Newell's method.
///
/// The result follows the right-hand rule over the point order and is not
/// normalized; its length is twice the polygon's area.
pub fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

/// Best-fit plane through `points` and the largest distance of any point
/// from it.
///
/// Returns `None` for fewer than three points or when the points are
/// collinear (no defined normal).
pub fn plane_deviation(points: &[Point3<f64>]) -> Option<(Plane, f64)> {
    if points.len() < 3 {
        return None;
    }
    let normal = newell_normal(points).try_normalize(f64::MIN_POSITIVE)?;
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    let centroid = Point3::from(sum / points.len() as f64);

    let deviation = points
        .iter()
        .map(|p| normal.dot(&(p - centroid)).abs())
        .fold(0.0_f64, f64::max);

    Some((Plane::new(centroid, normal), deviation))
}

/// Check whether all points lie on one plane within `tolerance`.
///
/// Three or fewer points are always planar, as are collinear point sets.
pub fn planar_points(points: &[Point3<f64>], tolerance: f64) -> bool {
    if points.len() <= 3 {
        return true;
    }
    match plane_deviation(points) {
        Some((_, deviation)) => deviation <= tolerance,
        None => true,
    }
}
