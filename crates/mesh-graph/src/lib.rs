//! Polygon face/edge/vertex graph for surface modelling.
//!
//! This crate holds the geometry a modelling document is made of: planar
//! polygon faces bounded by shared edges and vertices, organised into nested,
//! transformed groups. It provides:
//!
//! - **Arena storage**: [`Entities`] owns vertices, edges, faces and groups,
//!   addressed by typed handles ([`VertexId`], [`EdgeId`], [`FaceId`],
//!   [`GroupId`]). Adjacency is stored as handle lists in both directions.
//! - **Plane math**: [`geom`] offers plane/line intersection, projection and
//!   planarity tests.
//! - **Triangulation**: [`Entities::face_mesh`] converts a face to a
//!   [`PolygonMesh`] by ear clipping.
//! - **Transactions**: [`Document`] groups edits into operations that commit
//!   or abort as a whole.
//! - **File I/O**: [`io`] loads and saves OBJ files.
//!
//! # Units
//!
//! Coordinates are unitless `f64`; the tools built on this crate assume
//! millimetres. Points closer than the container tolerance (default `1e-6`)
//! merge into one vertex.
//!
//! # Orientation
//!
//! Face normals follow the right-hand rule over the outer loop: a loop that is
//! counter-clockwise seen from above faces up.
//!
//! # Quick Start
//!
//! ```
//! use mesh_graph::{Entities, Point3};
//!
//! let mut entities = Entities::new();
//! let face = entities
//!     .add_face(&[
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(1.0, 1.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(entities.face(face).normal().z, 1.0);
//! assert_eq!(entities.boundary_edges().count(), 4);
//! ```

mod entities;
mod error;
mod polygon_mesh;
pub mod tracing_ext;
mod types;

pub mod document;
pub mod geom;
pub mod io;
pub mod progress;
pub mod triangulate;

pub use document::Document;
pub use entities::{AddFace, Entities};
pub use error::{ErrorCode, MeshError, MeshLocation, MeshResult, RecoverySuggestion};
pub use geom::{Line, Plane};
pub use io::{MeshFormat, load_document, load_obj, save_document, save_obj};
pub use polygon_mesh::PolygonMesh;
pub use progress::{Progress, ProgressCallback, ProgressTracker};
pub use types::{Edge, EdgeId, Entity, Face, FaceId, Group, GroupId, Material, Vertex, VertexId};

// Re-export nalgebra types so callers do not need a matching nalgebra version.
pub use nalgebra::{Affine3, Point3, Vector3};
