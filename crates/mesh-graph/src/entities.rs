//! Arena-based container of vertices, edges, faces and nested groups.
//!
//! All records live in flat vectors and reference each other through typed
//! handles. Vertices are merged by position (snapped to a grid of the
//! container's tolerance) and edges by vertex pair, so faces added from
//! points automatically share topology with their neighbours.

use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use tracing::{debug, trace};

use crate::error::{MeshError, MeshResult};
use crate::geom::{self, DEFAULT_TOLERANCE};
use crate::polygon_mesh::PolygonMesh;
use crate::triangulate::triangulate_polygon;
use crate::types::{Edge, EdgeId, Entity, Face, FaceId, Group, GroupId, Material, Vertex, VertexId};

type PositionKey = [i64; 3];

/// Outcome of [`Entities::try_add_face`].
///
/// Non-planar input is an expected outcome for callers that have a fallback
/// (for example triangulating instead), so it is reported as a value rather
/// than an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AddFace {
    /// The face was created.
    Added(FaceId),
    /// The points do not lie on one plane; nothing was created.
    NonPlanar { deviation: f64 },
}

/// A container of mesh entities.
#[derive(Debug, Clone)]
pub struct Entities {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    groups: Vec<Group>,
    order: Vec<Entity>,
    vertex_lookup: HashMap<PositionKey, VertexId>,
    edge_lookup: HashMap<(VertexId, VertexId), EdgeId>,
    tolerance: f64,
}

impl Default for Entities {
    fn default() -> Self {
        Self::new()
    }
}

impl Entities {
    /// Create an empty container with the default tolerance.
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_TOLERANCE)
    }

    /// Create an empty container that merges points closer than `tolerance`
    /// and accepts faces whose points deviate from their plane by at most
    /// `tolerance`.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            groups: Vec::new(),
            order: Vec::new(),
            vertex_lookup: HashMap::new(),
            edge_lookup: HashMap::new(),
            tolerance,
        }
    }

    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// True when the container holds no edges, faces or groups.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Faces in this container and all nested groups.
    pub fn total_face_count(&self) -> usize {
        self.faces.len()
            + self
                .groups
                .iter()
                .map(|g| g.entities.total_face_count())
                .sum::<usize>()
    }

    /// Edges in this container and all nested groups.
    pub fn total_edge_count(&self) -> usize {
        self.edges.len()
            + self
                .groups
                .iter()
                .map(|g| g.entities.total_edge_count())
                .sum::<usize>()
    }

    /// Groups in this container and all nested groups.
    pub fn total_group_count(&self) -> usize {
        self.groups.len()
            + self
                .groups
                .iter()
                .map(|g| g.entities.total_group_count())
                .sum::<usize>()
    }

    /// Top-level entities in creation order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.order.iter().copied()
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId(i as u32), v))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId(i as u32), e))
    }

    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, f)| (FaceId(i as u32), f))
    }

    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &Group)> + '_ {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, g)| (GroupId(i as u32), g))
    }

    // --- Accessors ---
    //
    // The indexing accessors panic on a handle from another container, the
    // same way slice indexing does. The `get_*` forms return `None`.

    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    #[inline]
    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id.index()]
    }

    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    #[inline]
    pub fn face_mut(&mut self, id: FaceId) -> &mut Face {
        &mut self.faces[id.index()]
    }

    #[inline]
    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.index()]
    }

    #[inline]
    pub fn group_mut(&mut self, id: GroupId) -> &mut Group {
        &mut self.groups[id.index()]
    }

    #[inline]
    pub fn get_vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index())
    }

    #[inline]
    pub fn get_face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.index())
    }

    #[inline]
    pub fn get_group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.index())
    }

    /// Positions of a face's outer loop, in loop order.
    pub fn face_positions(&self, id: FaceId) -> Vec<Point3<f64>> {
        self.face(id)
            .outer_loop
            .iter()
            .map(|&v| self.vertex(v).position)
            .collect()
    }

    /// Edges with exactly one face.
    pub fn boundary_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges()
            .filter(|(_, e)| e.is_boundary())
            .map(|(id, _)| id)
    }

    /// Axis-aligned bounds of all vertices in this container.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices[1..].iter().fold((first, first), |(min, max), v| {
            let p = v.position;
            (
                Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        }))
    }

    // --- Vertices and edges ---

    fn position_key(&self, p: &Point3<f64>) -> PositionKey {
        [
            (p.x / self.tolerance).round() as i64,
            (p.y / self.tolerance).round() as i64,
            (p.z / self.tolerance).round() as i64,
        ]
    }

    /// Existing vertex at `position`, within the merge tolerance.
    pub fn find_vertex(&self, position: &Point3<f64>) -> Option<VertexId> {
        self.vertex_lookup.get(&self.position_key(position)).copied()
    }

    /// Find or create the vertex at `position`.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> MeshResult<VertexId> {
        check_finite(&position)?;
        let key = self.position_key(&position);
        if let Some(&id) = self.vertex_lookup.get(&key) {
            return Ok(id);
        }
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Vertex::new(position));
        self.vertex_lookup.insert(key, id);
        Ok(id)
    }

    /// The edge joining two vertices, if any.
    pub fn common_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_lookup.get(&edge_key(a, b)).copied()
    }

    /// Find or create the edge between two vertices.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> MeshResult<EdgeId> {
        for v in [a, b] {
            if v.index() >= self.vertices.len() {
                return Err(MeshError::invalid_handle("vertex", v.0));
            }
        }
        if a == b {
            return Err(MeshError::degenerate_face("edge endpoints are the same vertex"));
        }
        if let Some(id) = self.common_edge(a, b) {
            return Ok(id);
        }
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge::new(a, b));
        self.edge_lookup.insert(edge_key(a, b), id);
        self.vertices[a.index()].edges.push(id);
        self.vertices[b.index()].edges.push(id);
        self.order.push(Entity::Edge(id));
        Ok(id)
    }

    /// Find or create an edge between two points.
    pub fn add_line(&mut self, a: Point3<f64>, b: Point3<f64>) -> MeshResult<EdgeId> {
        let va = self.add_vertex(a)?;
        let vb = self.add_vertex(b)?;
        self.add_edge(va, vb)
    }

    // --- Faces ---

    /// Add a face from an ordered loop of points.
    ///
    /// Returns [`AddFace::NonPlanar`] without modifying the container when the
    /// points are not coplanar within tolerance.
    ///
    /// # Errors
    ///
    /// [`MeshError::DegenerateFace`] for fewer than three distinct points,
    /// repeated points or zero area; [`MeshError::InvalidCoordinate`] for
    /// non-finite input.
    pub fn try_add_face(&mut self, points: &[Point3<f64>]) -> MeshResult<AddFace> {
        self.try_add_face_with_holes(points, &[])
    }

    /// Add a face from an ordered loop of points.
    ///
    /// # Errors
    ///
    /// As [`try_add_face`](Self::try_add_face), plus
    /// [`MeshError::NonPlanarPoints`] when the points are not coplanar.
    pub fn add_face(&mut self, points: &[Point3<f64>]) -> MeshResult<FaceId> {
        self.add_face_with_holes(points, &[])
    }

    /// Add a face with inner loops (holes).
    pub fn add_face_with_holes(
        &mut self,
        outer: &[Point3<f64>],
        holes: &[Vec<Point3<f64>>],
    ) -> MeshResult<FaceId> {
        match self.try_add_face_with_holes(outer, holes)? {
            AddFace::Added(id) => Ok(id),
            AddFace::NonPlanar { deviation } => Err(MeshError::NonPlanarPoints {
                deviation,
                tolerance: self.tolerance,
            }),
        }
    }

    fn try_add_face_with_holes(
        &mut self,
        outer: &[Point3<f64>],
        holes: &[Vec<Point3<f64>>],
    ) -> MeshResult<AddFace> {
        // Validate everything before touching the arena so a rejected face
        // leaves no stray vertices or edges behind.
        let mut seen: HashSet<PositionKey> = HashSet::new();
        for ring in std::iter::once(outer).chain(holes.iter().map(Vec::as_slice)) {
            if ring.len() < 3 {
                return Err(MeshError::degenerate_face(format!(
                    "loop has {} points, need at least 3",
                    ring.len()
                )));
            }
            for p in ring {
                check_finite(p)?;
                if !seen.insert(self.position_key(p)) {
                    return Err(MeshError::degenerate_face(format!(
                        "repeated point ({:.6}, {:.6}, {:.6})",
                        p.x, p.y, p.z
                    )));
                }
            }
        }

        let normal = geom::newell_normal(outer)
            .try_normalize(f64::MIN_POSITIVE)
            .ok_or_else(|| MeshError::degenerate_face("outer loop has zero area"))?;

        let all_points: Vec<Point3<f64>> = outer
            .iter()
            .chain(holes.iter().flatten())
            .copied()
            .collect();
        if all_points.len() > 3 {
            if let Some((_, deviation)) = geom::plane_deviation(&all_points) {
                if deviation > self.tolerance {
                    trace!(deviation, points = all_points.len(), "Rejected non-planar face");
                    return Ok(AddFace::NonPlanar { deviation });
                }
            }
        }

        let face_id = FaceId(self.faces.len() as u32);
        let outer_loop = outer
            .iter()
            .map(|p| self.add_vertex(*p))
            .collect::<MeshResult<Vec<_>>>()?;
        let edges = self.link_loop(&outer_loop, face_id)?;

        let mut inner_loops = Vec::with_capacity(holes.len());
        let mut inner_edges = Vec::new();
        for hole in holes {
            let ring = hole
                .iter()
                .map(|p| self.add_vertex(*p))
                .collect::<MeshResult<Vec<_>>>()?;
            inner_edges.extend(self.link_loop(&ring, face_id)?);
            inner_loops.push(ring);
        }

        self.faces.push(Face {
            outer_loop,
            inner_loops,
            normal,
            edges,
            inner_edges,
            material: None,
            back_material: None,
        });
        self.order.push(Entity::Face(face_id));
        Ok(AddFace::Added(face_id))
    }

    /// Create the edges of a closed loop and register `face` on them and on
    /// the loop's vertices.
    fn link_loop(&mut self, ring: &[VertexId], face: FaceId) -> MeshResult<Vec<EdgeId>> {
        let n = ring.len();
        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            let id = self.add_edge(ring[i], ring[(i + 1) % n])?;
            self.edges[id.index()].faces.push(face);
            edges.push(id);
        }
        for &v in ring {
            let faces = &mut self.vertices[v.index()].faces;
            if !faces.contains(&face) {
                faces.push(face);
            }
        }
        Ok(edges)
    }

    /// Triangulate a face's outer loop into a standalone polygon mesh.
    ///
    /// Triangles keep the face's winding. Inner loops are not included.
    pub fn face_mesh(&self, id: FaceId) -> PolygonMesh {
        let positions = self.face_positions(id);
        let triangles = triangulate_polygon(&positions, &self.face(id).normal);
        PolygonMesh::from_parts(positions, triangles)
    }

    /// Add every triangle of `mesh` as a face, assigning the given materials.
    ///
    /// Degenerate triangles (collapsed by merging or with zero area) are
    /// skipped. Returns the faces created.
    pub fn add_faces_from_mesh(
        &mut self,
        mesh: &PolygonMesh,
        material: Option<&Material>,
        back_material: Option<&Material>,
    ) -> MeshResult<Vec<FaceId>> {
        let mut created = Vec::with_capacity(mesh.polygon_count());
        for (index, triangle) in mesh.polygons().iter().enumerate() {
            let points = mesh.triangle_points(triangle)?;
            match self.try_add_face(&points) {
                Ok(AddFace::Added(id)) => {
                    let face = &mut self.faces[id.index()];
                    face.material = material.cloned();
                    face.back_material = back_material.cloned();
                    created.push(id);
                }
                Ok(AddFace::NonPlanar { .. }) => {
                    // Three points are always coplanar; only reachable through
                    // merging that would already have been reported as degenerate.
                    debug!(index, "Skipped non-planar mesh polygon");
                }
                Err(MeshError::DegenerateFace { details }) => {
                    debug!(index, details = %details, "Skipped degenerate mesh polygon");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(created)
    }

    // --- Groups ---

    /// Add a nested group, taking ownership of it.
    pub fn add_group(&mut self, group: Group) -> GroupId {
        let id = GroupId(self.groups.len() as u32);
        self.groups.push(group);
        self.order.push(Entity::Group(id));
        id
    }
}

#[inline]
fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a < b { (a, b) } else { (b, a) }
}

fn check_finite(p: &Point3<f64>) -> MeshResult<()> {
    for (coordinate, value) in [("x", p.x), ("y", p.y), ("z", p.z)] {
        if !value.is_finite() {
            return Err(MeshError::InvalidCoordinate { coordinate, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn square(z: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, z),
            Point3::new(1.0, 0.0, z),
            Point3::new(1.0, 1.0, z),
            Point3::new(0.0, 1.0, z),
        ]
    }

    #[test]
    fn test_add_face_creates_topology() {
        let mut entities = Entities::new();
        let face = entities.add_face(&square(0.0)).unwrap();

        assert_eq!(entities.vertex_count(), 4);
        assert_eq!(entities.edge_count(), 4);
        assert_eq!(entities.face_count(), 1);
        assert_relative_eq!(entities.face(face).normal(), Vector3::z(), epsilon = 1e-12);
        assert_eq!(entities.boundary_edges().count(), 4);

        // Mixed entity listing: four edges then the face.
        let kinds: Vec<Entity> = entities.iter().collect();
        assert_eq!(kinds.len(), 5);
        assert_eq!(kinds[4], Entity::Face(face));
    }

    #[test]
    fn test_adjacent_faces_share_edge() {
        let mut entities = Entities::new();
        let a = entities.add_face(&square(0.0)).unwrap();
        let b = entities
            .add_face(&[
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(2.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ])
            .unwrap();

        assert_eq!(entities.vertex_count(), 6);
        assert_eq!(entities.edge_count(), 7);

        let v1 = entities.find_vertex(&Point3::new(1.0, 0.0, 0.0)).unwrap();
        let v2 = entities.find_vertex(&Point3::new(1.0, 1.0, 0.0)).unwrap();
        let shared = entities.common_edge(v1, v2).unwrap();
        assert_eq!(entities.edge(shared).faces(), &[a, b]);
        assert!(!entities.edge(shared).is_boundary());
        assert_eq!(entities.vertex(v1).faces().len(), 2);
    }

    #[test]
    fn test_non_planar_face_leaves_container_untouched() {
        let mut entities = Entities::new();
        let mut points = square(0.0);
        points[2].z = 0.5;

        match entities.try_add_face(&points).unwrap() {
            AddFace::NonPlanar { deviation } => assert!(deviation > 0.1),
            other => panic!("expected non-planar, got {:?}", other),
        }
        assert!(entities.is_empty());
        assert_eq!(entities.vertex_count(), 0);

        let err = entities.add_face(&points).unwrap_err();
        assert!(matches!(err, MeshError::NonPlanarPoints { .. }));
    }

    #[test]
    fn test_degenerate_faces_rejected() {
        let mut entities = Entities::new();
        let two = [Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        assert!(matches!(
            entities.add_face(&two),
            Err(MeshError::DegenerateFace { .. })
        ));

        let repeated = [
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ];
        assert!(matches!(
            entities.add_face(&repeated),
            Err(MeshError::DegenerateFace { .. })
        ));

        let collinear = [
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(matches!(
            entities.add_face(&collinear),
            Err(MeshError::DegenerateFace { .. })
        ));

        let nan = [
            Point3::origin(),
            Point3::new(f64::NAN, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        assert!(matches!(
            entities.add_face(&nan),
            Err(MeshError::InvalidCoordinate { .. })
        ));
        assert!(entities.is_empty());
    }

    #[test]
    fn test_vertices_merge_within_tolerance() {
        let mut entities = Entities::new();
        let a = entities.add_vertex(Point3::new(1.0, 2.0, 3.0)).unwrap();
        let b = entities.add_vertex(Point3::new(1.0 + 1e-9, 2.0, 3.0)).unwrap();
        let c = entities.add_vertex(Point3::new(1.1, 2.0, 3.0)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_face_with_hole_keeps_outer_edges_separate() {
        let mut entities = Entities::new();
        let outer = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(4.0, 4.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        ];
        let hole = vec![
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 3.0, 0.0),
            Point3::new(3.0, 3.0, 0.0),
            Point3::new(3.0, 1.0, 0.0),
        ];
        let face = entities.add_face_with_holes(&outer, &[hole]).unwrap();
        let f = entities.face(face);
        assert_eq!(f.outer_loop().len(), 4);
        assert_eq!(f.inner_loops().len(), 1);
        assert_eq!(f.edges().len(), 4);
        assert_eq!(f.inner_edges().len(), 4);
        assert_eq!(entities.vertex_count(), 8);
    }

    #[test]
    fn test_face_mesh_and_add_faces_from_mesh() {
        let mut source = Entities::new();
        let face = source
            .add_face(&[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(2.0, 2.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 2.0, 0.0),
            ])
            .unwrap();
        source.face_mut(face).material = Some(Material::new("Brick"));

        let mesh = source.face_mesh(face);
        assert_eq!(mesh.point_count(), 5);
        assert_eq!(mesh.polygon_count(), 3);

        let mut dest = Entities::new();
        let created = dest
            .add_faces_from_mesh(&mesh, source.face(face).material.as_ref(), None)
            .unwrap();
        assert_eq!(created.len(), 3);
        for id in created {
            let f = dest.face(id);
            assert_eq!(f.material.as_ref().map(Material::name), Some("Brick"));
            assert!(f.back_material.is_none());
            assert!(f.normal().z > 0.0);
        }
    }

    #[test]
    fn test_groups_and_totals() {
        let mut root = Entities::new();
        root.add_face(&square(0.0)).unwrap();
        let mut group = Group::named("Inner");
        group.entities.add_face(&square(5.0)).unwrap();
        let id = root.add_group(group);

        assert_eq!(root.group(id).display_name(), "Inner");
        assert_eq!(root.face_count(), 1);
        assert_eq!(root.total_face_count(), 2);
        assert_eq!(root.total_edge_count(), 8);
        assert_eq!(root.total_group_count(), 1);
        assert_eq!(root.iter().last(), Some(Entity::Group(id)));
    }

    #[test]
    fn test_bounds() {
        let mut entities = Entities::new();
        assert!(entities.bounds().is_none());
        entities.add_face(&square(2.0)).unwrap();
        let (min, max) = entities.bounds().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 2.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 2.0));
    }
}
