//! Gather the faces of a container and the vertices they use.

use hashbrown::HashSet;
use mesh_graph::{Entities, FaceId, VertexId};
use tracing::debug;

/// Faces of a container and their unique outer-loop vertices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedMesh {
    /// Top-level faces in creation order.
    pub faces: Vec<FaceId>,
    /// Vertices of those faces, each once, in first-seen order.
    pub vertices: Vec<VertexId>,
}

impl CollectedMesh {
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Collect the top-level faces of `entities`.
///
/// Loose edges and nested groups are ignored. Vertices are taken from the
/// outer loops only.
pub fn collect_mesh(entities: &Entities) -> CollectedMesh {
    let faces: Vec<FaceId> = entities.iter().filter_map(|e| e.as_face()).collect();

    let mut seen = HashSet::with_capacity(faces.len() * 2);
    let vertices: Vec<VertexId> = faces
        .iter()
        .flat_map(|&face| entities.face(face).outer_loop().iter().copied())
        .filter(|&v| seen.insert(v))
        .collect();

    debug!(
        faces = faces.len(),
        vertices = vertices.len(),
        "Collected shell source mesh"
    );
    CollectedMesh { faces, vertices }
}
