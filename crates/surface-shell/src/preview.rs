//! Offset polygons for drawing a shell before it is built.

use mesh_graph::{Affine3, Entities, Group, Point3};

use crate::error::ShellResult;
use crate::offset::OffsetMap;
use crate::shell::{CollectedMesh, collect_mesh};

/// Faces of one group, gathered once and offset again for every thickness.
#[derive(Debug, Clone)]
pub struct PreviewMesh {
    entities: Entities,
    collected: CollectedMesh,
    transformation: Affine3<f64>,
}

impl PreviewMesh {
    /// Gather the faces of `entities`, placed in the world by
    /// `transformation`.
    pub fn new(entities: Entities, transformation: Affine3<f64>) -> Self {
        let collected = collect_mesh(&entities);
        Self {
            entities,
            collected,
            transformation,
        }
    }

    pub fn from_group(group: &Group) -> Self {
        Self::new(group.entities.clone(), group.transformation)
    }

    pub fn face_count(&self) -> usize {
        self.collected.faces.len()
    }

    /// One world-space polygon per face, in the face's loop order.
    pub fn offset_polygons(&self, thickness: f64) -> ShellResult<Vec<Vec<Point3<f64>>>> {
        let offsets = OffsetMap::build(&self.entities, &self.collected.vertices, thickness)?
            .transformed(&self.transformation);

        self.collected
            .faces
            .iter()
            .map(|&face| {
                self.entities
                    .face(face)
                    .outer_loop()
                    .iter()
                    .map(|&v| offsets.require(v))
                    .collect()
            })
            .collect()
    }
}

/// Offset polygons of every mesh for `thickness`.
///
/// A zero thickness has no preview and yields no polygons.
pub fn offset_polygons(
    meshes: &[PreviewMesh],
    thickness: f64,
) -> ShellResult<Vec<Vec<Point3<f64>>>> {
    if thickness == 0.0 {
        return Ok(Vec::new());
    }
    let mut polygons = Vec::with_capacity(meshes.iter().map(PreviewMesh::face_count).sum());
    for mesh in meshes {
        polygons.extend(mesh.offset_polygons(thickness)?);
    }
    Ok(polygons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_graph::Vector3;
    use nalgebra::{Matrix4, Translation3};

    fn unit_square() -> Entities {
        let mut entities = Entities::new();
        entities
            .add_face(&[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ])
            .unwrap();
        entities
    }

    #[test]
    fn test_polygons_follow_face_loops() {
        let mesh = PreviewMesh::new(unit_square(), Affine3::identity());
        let polygons = offset_polygons(&[mesh], 2.0).unwrap();

        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].len(), 4);
        assert_relative_eq!(polygons[0][1], Point3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_polygons_in_world_space() {
        let mut group = Group::with_entities(unit_square());
        group.transformation = Affine3::from_matrix_unchecked(
            Translation3::new(0.0, 0.0, 10.0).to_homogeneous(),
        );
        let mesh = PreviewMesh::from_group(&group);

        let polygons = offset_polygons(&[mesh], -1.0).unwrap();
        for p in &polygons[0] {
            assert_relative_eq!(p.z, 11.0);
        }

        let scaled = PreviewMesh::new(
            unit_square(),
            Affine3::from_matrix_unchecked(Matrix4::new_nonuniform_scaling(&Vector3::new(
                2.0, 2.0, 2.0,
            ))),
        );
        let polygons = offset_polygons(&[scaled], 1.0).unwrap();
        assert_relative_eq!(polygons[0][2], Point3::new(2.0, 2.0, -2.0));
    }

    #[test]
    fn test_zero_thickness_has_no_preview() {
        let mesh = PreviewMesh::new(unit_square(), Affine3::identity());
        assert!(offset_polygons(&[mesh], 0.0).unwrap().is_empty());
    }

    #[test]
    fn test_several_meshes() {
        let meshes = [
            PreviewMesh::new(unit_square(), Affine3::identity()),
            PreviewMesh::new(Entities::new(), Affine3::identity()),
            PreviewMesh::new(unit_square(), Affine3::identity()),
        ];
        assert_eq!(offset_polygons(&meshes, 1.0).unwrap().len(), 2);
    }
}
