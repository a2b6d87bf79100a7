//! Ear-clipping triangulation of planar polygons.

use nalgebra::{Point3, Vector3};
use tracing::{debug, warn};

/// Triangulate a simple planar polygon.
///
/// `normal` is the polygon's facing direction; output triangles index into
/// `points` and wind the same way as the polygon around it. Polygons with
/// fewer than three points produce no triangles.
pub fn triangulate_polygon(points: &[Point3<f64>], normal: &Vector3<f64>) -> Vec<[u32; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    if n == 3 {
        return vec![[0, 1, 2]];
    }

    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);

    while remaining.len() > 3 {
        let count = remaining.len();
        let ear = (0..count).find(|&i| {
            let prev = remaining[(i + count - 1) % count];
            let next = remaining[(i + 1) % count];
            is_ear(points, &remaining, prev, remaining[i], next, normal)
        });

        match ear {
            Some(i) => {
                let prev = remaining[(i + count - 1) % count];
                let next = remaining[(i + 1) % count];
                triangles.push([prev as u32, remaining[i] as u32, next as u32]);
                remaining.remove(i);
            }
            None => {
                warn!(
                    remaining = count,
                    "Ear clipping stuck, using fan triangulation"
                );
                break;
            }
        }
    }

    if remaining.len() >= 3 {
        let center = remaining[0];
        for pair in remaining[1..].windows(2) {
            triangles.push([center as u32, pair[0] as u32, pair[1] as u32]);
        }
    }

    debug!(
        points = n,
        triangles = triangles.len(),
        "Triangulated polygon"
    );

    triangles
}

/// A vertex is an ear when its corner is convex with respect to `normal` and
/// no other remaining vertex lies inside the corner triangle.
fn is_ear(
    points: &[Point3<f64>],
    remaining: &[usize],
    prev: usize,
    curr: usize,
    next: usize,
    normal: &Vector3<f64>,
) -> bool {
    let a = points[prev];
    let b = points[curr];
    let c = points[next];

    let corner = (b - a).cross(&(c - b));
    if corner.norm_squared() == 0.0 || corner.dot(normal) <= 0.0 {
        return false;
    }

    !remaining
        .iter()
        .filter(|&&idx| idx != prev && idx != curr && idx != next)
        .any(|&idx| point_in_triangle_2d(&points[idx], &a, &b, &c, normal))
}

/// Point-in-triangle test after projecting onto the coordinate plane most
/// perpendicular to `normal`. Points on an edge count as inside.
fn point_in_triangle_2d(
    p: &Point3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
    normal: &Vector3<f64>,
) -> bool {
    let abs = normal.abs();
    let project = |q: &Point3<f64>| -> (f64, f64) {
        if abs.z >= abs.x && abs.z >= abs.y {
            (q.x, q.y)
        } else if abs.y >= abs.x {
            (q.x, q.z)
        } else {
            (q.y, q.z)
        }
    };

    let (p, a, b, c) = (project(p), project(v0), project(v1), project(v2));
    let sign = |p1: (f64, f64), p2: (f64, f64), p3: (f64, f64)| -> f64 {
        (p1.0 - p3.0) * (p2.1 - p3.1) - (p2.0 - p3.0) * (p1.1 - p3.1)
    };

    let d1 = sign(p, a, b);
    let d2 = sign(p, b, c);
    let d3 = sign(p, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}
