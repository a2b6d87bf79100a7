use hashbrown::HashMap;
use mesh_graph::{Affine3, Entities, Point3, VertexId};

use super::vertex::{OffsetCase, offset_vertex_detailed};
use crate::error::{ShellError, ShellResult};

type PositionKey = [u64; 3];

fn position_key(p: &Point3<f64>) -> PositionKey {
    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
}

/// Offset points of a set of vertices for one thickness.
///
/// Points are stored by vertex handle and, for the triangulated fallback
/// which only knows coordinates, by the exact source position.
#[derive(Debug, Clone, Default)]
pub struct OffsetMap {
    by_vertex: HashMap<VertexId, Point3<f64>>,
    by_position: HashMap<PositionKey, Point3<f64>>,
    cases: HashMap<OffsetCase, usize>,
}

impl OffsetMap {
    /// Offset every vertex in `vertices`.
    ///
    /// # Errors
    ///
    /// The first vertex that cannot be offset fails the whole map.
    pub fn build(entities: &Entities, vertices: &[VertexId], distance: f64) -> ShellResult<Self> {
        let mut map = Self {
            by_vertex: HashMap::with_capacity(vertices.len()),
            by_position: HashMap::with_capacity(vertices.len()),
            cases: HashMap::new(),
        };
        for &vertex in vertices {
            let (point, case) = offset_vertex_detailed(entities, vertex, distance)?;
            let previous = map.by_vertex.insert(vertex, point);
            debug_assert!(previous.is_none(), "vertex {:?} offset twice", vertex);
            map.by_position
                .insert(position_key(&entities.vertex(vertex).position()), point);
            *map.cases.entry(case).or_default() += 1;
        }
        Ok(map)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_vertex.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_vertex.is_empty()
    }

    pub fn get(&self, vertex: VertexId) -> Option<Point3<f64>> {
        self.by_vertex.get(&vertex).copied()
    }

    /// Offset point of `vertex`, which must have been collected.
    pub fn require(&self, vertex: VertexId) -> ShellResult<Point3<f64>> {
        self.get(vertex)
            .ok_or(ShellError::MissingOffset { vertex: vertex.0 })
    }

    /// Offset point of the vertex that sat exactly at `position`.
    pub fn at_position(&self, position: &Point3<f64>) -> Option<Point3<f64>> {
        self.by_position.get(&position_key(position)).copied()
    }

    /// How many vertices resolved through each configuration.
    pub fn case_count(&self, case: OffsetCase) -> usize {
        self.cases.get(&case).copied().unwrap_or(0)
    }

    /// Copy of the map with every offset point transformed, used to move
    /// group-local offsets into world space.
    pub fn transformed(&self, transformation: &Affine3<f64>) -> Self {
        Self {
            by_vertex: self
                .by_vertex
                .iter()
                .map(|(&v, p)| (v, transformation.transform_point(p)))
                .collect(),
            by_position: self
                .by_position
                .iter()
                .map(|(&k, p)| (k, transformation.transform_point(p)))
                .collect(),
            cases: self.cases.clone(),
        }
    }
}
