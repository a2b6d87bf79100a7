//! Core mesh graph data types.
//!
//! Vertices, edges and faces reference each other through typed index
//! handles into the owning [`Entities`](crate::Entities) arena, which keeps
//! the cyclic vertex → face → edge → vertex graph free of reference cycles.

use nalgebra::{Affine3, Point3, Vector3};

use crate::entities::Entities;

// --- Typed index handles ---
// Cheap to copy, store, hash and compare. Only meaningful for the container
// that created them.

/// Handle to a [`Vertex`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

/// Handle to an [`Edge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u32);

/// Handle to a [`Face`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u32);

/// Handle to a [`Group`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u32);

impl VertexId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FaceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl GroupId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One top-level item of an [`Entities`] container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    Edge(EdgeId),
    Face(FaceId),
    Group(GroupId),
}

impl Entity {
    /// The face handle, if this entity is a face.
    #[inline]
    pub fn as_face(&self) -> Option<FaceId> {
        match self {
            Entity::Face(id) => Some(*id),
            _ => None,
        }
    }
}

/// A named material reference carried by faces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Material(pub String);

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// A vertex at a fixed position, shared by any number of edges and faces.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub(crate) position: Point3<f64>,
    pub(crate) edges: Vec<EdgeId>,
    pub(crate) faces: Vec<FaceId>,
}

impl Vertex {
    pub(crate) fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            edges: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Position of the vertex.
    #[inline]
    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    /// Edges using this vertex.
    #[inline]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Faces whose outer or inner loops use this vertex.
    #[inline]
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }
}

/// A straight edge between two vertices.
///
/// `soft`, `smooth` and `hidden` are display attributes: soft edges are not
/// drawn, smooth edges blend the shading of their faces, hidden edges are
/// drawn only when hidden geometry is shown.
#[derive(Debug, Clone)]
pub struct Edge {
    pub(crate) vertices: [VertexId; 2],
    pub(crate) faces: Vec<FaceId>,
    pub soft: bool,
    pub smooth: bool,
    pub hidden: bool,
}

impl Edge {
    pub(crate) fn new(start: VertexId, end: VertexId) -> Self {
        Self {
            vertices: [start, end],
            faces: Vec::new(),
            soft: false,
            smooth: false,
            hidden: false,
        }
    }

    #[inline]
    pub fn start(&self) -> VertexId {
        self.vertices[0]
    }

    #[inline]
    pub fn end(&self) -> VertexId {
        self.vertices[1]
    }

    #[inline]
    pub fn vertices(&self) -> [VertexId; 2] {
        self.vertices
    }

    /// Faces bounded by this edge.
    #[inline]
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    /// An edge with exactly one face is an open boundary of the surface.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.faces.len() == 1
    }

    /// Whether `vertex` is one of the endpoints.
    #[inline]
    pub fn uses(&self, vertex: VertexId) -> bool {
        self.vertices[0] == vertex || self.vertices[1] == vertex
    }
}

/// A planar polygon bounded by an outer loop and optional inner loops.
#[derive(Debug, Clone)]
pub struct Face {
    pub(crate) outer_loop: Vec<VertexId>,
    pub(crate) inner_loops: Vec<Vec<VertexId>>,
    pub(crate) normal: Vector3<f64>,
    /// Outer loop edges; `edges[i]` joins `outer_loop[i]` and `outer_loop[i + 1]`.
    pub(crate) edges: Vec<EdgeId>,
    pub(crate) inner_edges: Vec<EdgeId>,
    pub material: Option<Material>,
    pub back_material: Option<Material>,
}

impl Face {
    /// Outer loop vertices in winding order.
    #[inline]
    pub fn outer_loop(&self) -> &[VertexId] {
        &self.outer_loop
    }

    /// Inner loops (holes).
    #[inline]
    pub fn inner_loops(&self) -> &[Vec<VertexId>] {
        &self.inner_loops
    }

    /// Unit normal, following the right-hand rule over the outer loop.
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Outer loop edges in loop order.
    #[inline]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Edges of the inner loops.
    #[inline]
    pub fn inner_edges(&self) -> &[EdgeId] {
        &self.inner_edges
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.outer_loop.len()
    }
}

/// A named, transformed container of nested entities.
#[derive(Debug, Clone)]
pub struct Group {
    pub name: Option<String>,
    /// Maps the group's local coordinates into its parent's coordinates.
    pub transformation: Affine3<f64>,
    pub entities: Entities,
}

impl Group {
    /// Create an empty, untransformed group.
    pub fn new() -> Self {
        Self {
            name: None,
            transformation: Affine3::identity(),
            entities: Entities::new(),
        }
    }

    /// Create an empty group with a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new()
        }
    }

    /// Create a group holding the given entities.
    pub fn with_entities(entities: Entities) -> Self {
        Self {
            entities,
            ..Self::new()
        }
    }

    /// Display name, or `"<unnamed>"`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}
