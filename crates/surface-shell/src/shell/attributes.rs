//! Edge display flags carried from a source face to its offset face.

use mesh_graph::{EdgeId, Entities, FaceId, MeshError, VertexId};

use crate::error::{ShellError, ShellResult};

/// Copy soft, smooth and hidden flags from the edges of `source_face` to
/// the matching edges of `offset_face`.
///
/// The offset face's outer loop must be the source loop reversed, vertex for
/// vertex.
pub fn copy_soft_smooth(
    source: &Entities,
    source_face: FaceId,
    offset: &mut Entities,
    offset_face: FaceId,
) -> ShellResult<()> {
    let source_loop = source.face(source_face).outer_loop();
    let offset_loop: Vec<VertexId> = offset
        .face(offset_face)
        .outer_loop()
        .iter()
        .rev()
        .copied()
        .collect();

    if source_loop.len() != offset_loop.len() {
        return Err(ShellError::LoopMismatch {
            source_len: source_loop.len(),
            offset: offset_loop.len(),
        });
    }

    let n = source_loop.len();
    for i in 0..n {
        let from = edge_between(source, source_loop[i], source_loop[(i + 1) % n])?;
        let to = edge_between(offset, offset_loop[i], offset_loop[(i + 1) % n])?;

        let from = source.edge(from);
        let (soft, smooth, hidden) = (from.soft, from.smooth, from.hidden);
        let to = offset.edge_mut(to);
        to.soft = soft;
        to.smooth = smooth;
        to.hidden = hidden;
    }
    Ok(())
}

fn edge_between(entities: &Entities, a: VertexId, b: VertexId) -> ShellResult<EdgeId> {
    entities.common_edge(a, b).ok_or_else(|| {
        MeshError::MissingEdge {
            vertex_a: a.0,
            vertex_b: b.0,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_graph::Point3;

    fn square(z: f64) -> [Point3<f64>; 4] {
        [
            Point3::new(0.0, 0.0, z),
            Point3::new(1.0, 0.0, z),
            Point3::new(1.0, 1.0, z),
            Point3::new(0.0, 1.0, z),
        ]
    }

    #[test]
    fn test_flags_follow_reversed_loop() {
        let mut source = Entities::new();
        let face = source.add_face(&square(0.0)).unwrap();
        // Edge (1,0,0)-(1,1,0) soft and smooth, (0,1,0)-(0,0,0) hidden.
        let edges = source.face(face).edges().to_vec();
        source.edge_mut(edges[1]).soft = true;
        source.edge_mut(edges[1]).smooth = true;
        source.edge_mut(edges[3]).hidden = true;

        let mut offset = Entities::new();
        let mut reversed = square(-1.0);
        reversed.reverse();
        let offset_face = offset.add_face(&reversed).unwrap();

        copy_soft_smooth(&source, face, &mut offset, offset_face).unwrap();

        let flags = |a: Point3<f64>, b: Point3<f64>| {
            let id = offset
                .common_edge(
                    offset.find_vertex(&a).unwrap(),
                    offset.find_vertex(&b).unwrap(),
                )
                .unwrap();
            let e = offset.edge(id);
            (e.soft, e.smooth, e.hidden)
        };
        let s = square(-1.0);
        assert_eq!(flags(s[0], s[1]), (false, false, false));
        assert_eq!(flags(s[1], s[2]), (true, true, false));
        assert_eq!(flags(s[2], s[3]), (false, false, false));
        assert_eq!(flags(s[3], s[0]), (false, false, true));
    }

    #[test]
    fn test_hard_edges_stay_hard() {
        let mut source = Entities::new();
        let face = source.add_face(&square(0.0)).unwrap();

        let mut offset = Entities::new();
        let mut reversed = square(2.0);
        reversed.reverse();
        let offset_face = offset.add_face(&reversed).unwrap();
        // Pre-set flags on the offset side are overwritten.
        for id in offset.face(offset_face).edges().to_vec() {
            offset.edge_mut(id).soft = true;
        }

        copy_soft_smooth(&source, face, &mut offset, offset_face).unwrap();
        assert!(offset.edges().all(|(_, e)| !e.soft && !e.smooth && !e.hidden));
    }

    #[test]
    fn test_loop_length_mismatch() {
        let mut source = Entities::new();
        let face = source.add_face(&square(0.0)).unwrap();

        let mut offset = Entities::new();
        let triangle = offset
            .add_face(&[
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(0.0, 1.0, 1.0),
                Point3::new(1.0, 0.0, 1.0),
            ])
            .unwrap();

        let err = copy_soft_smooth(&source, face, &mut offset, triangle).unwrap_err();
        assert!(matches!(
            err,
            ShellError::LoopMismatch {
                source_len: 4,
                offset: 3
            }
        ));
    }
}
