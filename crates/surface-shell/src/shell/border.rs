//! Wall faces closing the gap between an open source edge and its offset.

use mesh_graph::{AddFace, EdgeId, Entities, FaceId, MeshError, Point3};
use tracing::trace;

use crate::error::ShellResult;

/// Faces created for one border wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderFace {
    /// The four points were coplanar.
    Quad(FaceId),
    /// Two triangles sharing the `divider` diagonal.
    Split { faces: [FaceId; 2], divider: EdgeId },
}

impl BorderFace {
    pub fn face_count(&self) -> usize {
        match self {
            BorderFace::Quad(_) => 1,
            BorderFace::Split { .. } => 2,
        }
    }
}

/// Add the wall `points[0] -> points[1] -> points[2] -> points[3]`.
///
/// Non-coplanar walls are split along `points[0]`-`points[2]`. The diagonal
/// is made soft and smooth; every perimeter edge is made hard.
pub fn add_border_face(
    entities: &mut Entities,
    points: [Point3<f64>; 4],
) -> ShellResult<BorderFace> {
    let border = match entities.try_add_face(&points)? {
        AddFace::Added(face) => {
            harden_edges(entities, face, None);
            BorderFace::Quad(face)
        }
        AddFace::NonPlanar { deviation } => {
            trace!(deviation, "Splitting non-planar border wall");
            let [p0, p1, p2, p3] = points;
            let second = entities.add_face(&[p2, p3, p0])?;
            let first = entities.add_face(&[p0, p1, p2])?;

            let divider = diagonal(entities, &p0, &p2)?;

            let edge = entities.edge_mut(divider);
            edge.soft = true;
            edge.smooth = true;
            harden_edges(entities, first, Some(divider));
            harden_edges(entities, second, Some(divider));

            BorderFace::Split {
                faces: [first, second],
                divider,
            }
        }
    };
    Ok(border)
}

fn diagonal(entities: &Entities, a: &Point3<f64>, b: &Point3<f64>) -> ShellResult<EdgeId> {
    let (va, vb) = (entities.find_vertex(a), entities.find_vertex(b));
    va.zip(vb)
        .and_then(|(va, vb)| entities.common_edge(va, vb))
        .ok_or_else(|| {
            MeshError::MissingEdge {
                vertex_a: va.map_or(u32::MAX, |v| v.0),
                vertex_b: vb.map_or(u32::MAX, |v| v.0),
            }
            .into()
        })
}

fn harden_edges(entities: &mut Entities, face: FaceId, except: Option<EdgeId>) {
    let edges = entities.face(face).edges().to_vec();
    for id in edges.into_iter().filter(|&id| Some(id) != except) {
        let edge = entities.edge_mut(id);
        edge.soft = false;
        edge.smooth = false;
    }
}
