//! Offset point of a single vertex.
//!
//! Each face around the vertex contributes an offset plane: the face plane
//! moved by the thickness against the face normal. The offset point is where
//! those planes meet, found by escalating from the cheapest configuration to
//! the most general one:
//!
//! 1. One face: move the vertex straight back along the face normal.
//! 2. Intersect the first plane with the following ones until a line is
//!    found. No line means every plane is parallel to the first; this is the
//!    flat case and resolves like (1).
//! 3. Line and no planes left: project the vertex onto the line.
//! 4. Otherwise intersect the line with each remaining plane and take the
//!    first hit (the miter point of three or more faces). If every remaining
//!    plane contains the line, keep the projection from (3).

use mesh_graph::geom::{self, Line, Plane};
use mesh_graph::{Entities, Point3, Vector3, VertexId};
use tracing::trace;

use crate::error::{ShellError, ShellResult};

/// Which configuration produced an offset point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetCase {
    /// The vertex belongs to exactly one face.
    SingleFace,
    /// Several faces, all parallel.
    Coplanar,
    /// Exactly two independent planes; projected onto their intersection.
    TwoPlanes,
    /// Three or more planes meeting in one point.
    Miter,
    /// A line was found but every further plane contains it.
    DegenerateMiter,
}

/// The plane-defining part of a face around a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncidentFace {
    /// Any point on the face.
    pub point: Point3<f64>,
    /// Face normal.
    pub normal: Vector3<f64>,
}

/// Offset `vertex` by `distance` against the normals of its faces.
///
/// # Errors
///
/// [`ShellError::NoIncidentFaces`] if the vertex is not used by any face,
/// [`ShellError::Mesh`] if the handle does not belong to `entities`.
pub fn offset_vertex(
    entities: &Entities,
    vertex: VertexId,
    distance: f64,
) -> ShellResult<Point3<f64>> {
    offset_vertex_detailed(entities, vertex, distance).map(|(point, _)| point)
}

/// Like [`offset_vertex`], also reporting which configuration was resolved.
pub fn offset_vertex_detailed(
    entities: &Entities,
    vertex: VertexId,
    distance: f64,
) -> ShellResult<(Point3<f64>, OffsetCase)> {
    let record = entities
        .get_vertex(vertex)
        .ok_or_else(|| mesh_graph::MeshError::invalid_handle("vertex", vertex.0))?;

    let faces: Vec<IncidentFace> = record
        .faces()
        .iter()
        .map(|&face| IncidentFace {
            point: entities.vertex(entities.face(face).outer_loop()[0]).position(),
            normal: entities.face(face).normal(),
        })
        .collect();

    let resolved = resolve_offset(&record.position(), &faces, distance)
        .ok_or(ShellError::NoIncidentFaces { vertex: vertex.0 })?;
    trace!(vertex = vertex.0, case = ?resolved.1, "Resolved vertex offset");
    Ok(resolved)
}

/// Offset `position` given the faces around it.
///
/// Returns `None` only when `faces` is empty.
pub fn resolve_offset(
    position: &Point3<f64>,
    faces: &[IncidentFace],
    distance: f64,
) -> Option<(Point3<f64>, OffsetCase)> {
    let first = faces.first()?;
    let straight = || geom::offset_point(position, &-first.normal, distance);

    if faces.len() == 1 {
        return Some((straight(), OffsetCase::SingleFace));
    }

    let mut planes = faces.iter().map(|face| {
        let offset = geom::offset_point(&face.point, &-face.normal, distance);
        Plane::new(offset, offset - face.point)
    });

    let plane1 = planes.next()?;
    let line: Option<Line> = planes
        .by_ref()
        .find_map(|plane2| geom::intersect_plane_plane(&plane1, &plane2));

    let Some(line) = line else {
        return Some((straight(), OffsetCase::Coplanar));
    };

    let mut remaining = planes.peekable();
    if remaining.peek().is_none() {
        return Some((geom::project_to_line(position, &line), OffsetCase::TwoPlanes));
    }

    match remaining.find_map(|plane3| geom::intersect_line_plane(&line, &plane3)) {
        Some(point) => Some((point, OffsetCase::Miter)),
        None => Some((
            geom::project_to_line(position, &line),
            OffsetCase::DegenerateMiter,
        )),
    }
}
