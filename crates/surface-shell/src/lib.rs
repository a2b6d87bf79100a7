//! Constant-thickness shells for polygon surfaces.
//!
//! Given a surface of planar faces, this crate builds a second surface at a
//! fixed distance from it and closes every open edge with a wall, so that the
//! source and its shell together form a solid of even thickness.
//!
//! # Features
//!
//! - **Exact miters**: each vertex is offset to where the shifted planes of
//!   its faces meet, so walls keep their thickness at creases and corners
//! - **Non-planar fallback**: offset faces that lose planarity are rebuilt
//!   from triangles instead of failing the whole shell
//! - **Attribute transfer**: soft, smooth and hidden edges carry over to the
//!   offset surface
//! - **Transactions**: shelling a selection of groups is one document
//!   operation that commits or rolls back as a whole
//! - **Builder API**: fluent configuration through [`ShellBuilder`]
//!
//! # Quick Start
//!
//! ```
//! use mesh_graph::{Entities, Point3};
//! use surface_shell::ShellBuilder;
//!
//! let mut surface = Entities::new();
//! surface
//!     .add_face(&[
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(50.0, 0.0, 0.0),
//!         Point3::new(50.0, 50.0, 0.0),
//!         Point3::new(0.0, 50.0, 0.0),
//!     ])
//!     .unwrap();
//!
//! let output = ShellBuilder::new(&surface).thickness(3.0).build().unwrap();
//! println!("{}", output.stats);
//! ```
//!
//! # Documents
//!
//! ```
//! use mesh_graph::{Document, Entities, Group, Point3};
//! use surface_shell::{ShellParams, shell_groups};
//!
//! let mut part = Entities::new();
//! part.add_face(&[
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ])
//! .unwrap();
//!
//! let mut root = Entities::new();
//! let group = root.add_group(Group::with_entities(part));
//! let mut document = Document::with_entities(root);
//!
//! shell_groups(&mut document, &[group], &ShellParams::with_thickness(0.25)).unwrap();
//! assert_eq!(document.history(), ["Shell 0.25"]);
//! ```
//!
//! # Low-Level API
//!
//! [`offset_vertex`] offsets a single vertex without building anything,
//! and [`offset_polygons`] produces world-space preview polygons.

mod builder;
mod error;
mod offset;
mod params;
mod preview;
mod shell;
mod tool;

pub use error::{ShellError, ShellErrorCode, ShellRecoverySuggestion, ShellResult};
pub use params::{DEFAULT_THICKNESS, ParamsConfigError, ShellParams};

// Builder API (recommended)
pub use builder::ShellBuilder;

// Vertex offsets
pub use offset::{IncidentFace, OffsetCase, OffsetMap, offset_vertex, offset_vertex_detailed, resolve_offset};

// Shell construction
pub use shell::{
    BorderFace, CollectedMesh, ShellOutput, ShellRun, ShellStats, add_border_face, collect_mesh,
    compute_shell, compute_shell_with_progress, copy_soft_smooth, operation_name, shell_groups,
    shell_groups_with_progress,
};

// Preview and interactive tool
pub use preview::{PreviewMesh, offset_polygons};
pub use tool::{ShellTool, ToolState, parse_length};
