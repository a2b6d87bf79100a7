//! Errors raised by the mesh graph.
//!
//! Every [`MeshError`] carries an [`ErrorCode`] (`MESH-1xxx` for files,
//! `MESH-2xxx` for geometry and topology, `MESH-3xxx` for document
//! operations), a [`RecoverySuggestion`] and, where one exists, a
//! [`MeshLocation`]. Terminal rendering goes through miette.
//!
//! ```
//! use mesh_graph::{ErrorCode, MeshError};
//!
//! let err = MeshError::degenerate_face("only two distinct points");
//! assert_eq!(err.code(), ErrorCode::DegenerateFace);
//! assert_eq!(err.code().to_string(), "MESH-2004");
//! ```

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub type MeshResult<T> = Result<T, MeshError>;

/// Stable numeric codes; the discriminant is the number after `MESH-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    IoRead = 1001,
    IoWrite = 1002,
    ParseError = 1003,
    UnsupportedFormat = 1004,

    InvalidHandle = 2001,
    InvalidCoordinate = 2002,
    EmptyMesh = 2003,
    DegenerateFace = 2004,
    NonPlanarPoints = 2005,
    MissingEdge = 2006,

    OperationInProgress = 3001,
    NoActiveOperation = 3002,
}

impl ErrorCode {
    pub fn number(self) -> u16 {
        self as u16
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MESH-{}", self.number())
    }
}

/// What a user can do about a [`MeshError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Export the model again as OBJ.
    ExportAsObj,
    /// Look at the file or its directory.
    CheckFile { checks: Vec<&'static str> },
    /// Clean up the geometry that was passed in.
    FixGeometry { checks: Vec<&'static str> },
    /// Commit or abort the open operation.
    FinishOperation,
    /// A bug in the caller; nothing to do at runtime.
    None,
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoverySuggestion::ExportAsObj => {
                write!(f, "Export the model as Wavefront OBJ and load that file")
            }
            RecoverySuggestion::CheckFile { checks } => {
                write!(f, "Check the file: {}", checks.join(", "))
            }
            RecoverySuggestion::FixGeometry { checks } => {
                write!(f, "Check the geometry for {}", checks.join(", "))
            }
            RecoverySuggestion::FinishOperation => {
                write!(f, "Commit or abort the open operation before starting another")
            }
            RecoverySuggestion::None => write!(f, "No automatic recovery available"),
        }
    }
}

/// Where an error happened.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshLocation {
    File { path: PathBuf },
    Edge { vertex_a: u32, vertex_b: u32 },
}

impl std::fmt::Display for MeshLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshLocation::File { path } => write!(f, "{}", path.display()),
            MeshLocation::Edge { vertex_a, vertex_b } => {
                write!(f, "between vertices {} and {}", vertex_a, vertex_b)
            }
        }
    }
}

/// Errors that can occur while building, editing or persisting a mesh graph.
#[derive(Debug, Error, Diagnostic)]
pub enum MeshError {
    #[error("cannot read {path}")]
    #[diagnostic(
        code(mesh::io::read),
        help("The file {} could not be opened for reading.", path.display())
    )]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}")]
    #[diagnostic(
        code(mesh::io::write),
        help("The output location must exist and accept new files.")
    )]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid for its format.
    #[error("{path} is not a valid model: {details}")]
    #[diagnostic(
        code(mesh::io::parse),
        help("The file may be corrupted or use an unsupported variant of the format.")
    )]
    ParseError { path: PathBuf, details: String },

    #[error("no reader or writer for extension {extension:?}")]
    #[diagnostic(code(mesh::format::unsupported), help("Supported formats: OBJ"))]
    UnsupportedFormat { extension: Option<String> },

    /// A handle was used with a container that does not own it.
    #[error("{kind} handle {index} is out of range")]
    #[diagnostic(
        code(mesh::topology::handle),
        help("Handles are only valid for the container that created them.")
    )]
    InvalidHandle { kind: &'static str, index: u32 },

    /// NaN or infinite coordinate.
    #[error("invalid coordinate: {coordinate} is {value}")]
    #[diagnostic(
        code(mesh::geometry::coordinate),
        help("Check for numerical issues in the source data.")
    )]
    InvalidCoordinate { coordinate: &'static str, value: f64 },

    /// Container has no usable geometry.
    #[error("nothing to work on: {details}")]
    #[diagnostic(
        code(mesh::geometry::empty),
        help("The model must contain at least one face.")
    )]
    EmptyMesh { details: String },

    /// Face loop has too few points, repeated points or no area.
    #[error("degenerate face: {details}")]
    #[diagnostic(
        code(mesh::geometry::degenerate),
        help("A face needs at least three distinct, non-collinear points.")
    )]
    DegenerateFace { details: String },

    /// Face points do not lie on a common plane.
    #[error("points are not planar: deviation {deviation:.3e} exceeds tolerance {tolerance:.3e}")]
    #[diagnostic(
        code(mesh::geometry::non_planar),
        help("Triangulate the polygon or add it as a mesh instead of a single face.")
    )]
    NonPlanarPoints { deviation: f64, tolerance: f64 },

    /// Two vertices that should share an edge do not.
    #[error("no edge joins vertices {vertex_a} and {vertex_b}")]
    #[diagnostic(code(mesh::topology::missing_edge))]
    MissingEdge { vertex_a: u32, vertex_b: u32 },

    /// An operation was started while another one is open.
    #[error("operation '{active}' is still open")]
    #[diagnostic(
        code(mesh::document::in_progress),
        help("Operations cannot be nested. Commit or abort the open one first.")
    )]
    OperationInProgress { active: String },

    /// Commit or abort without an open operation.
    #[error("no operation is open")]
    #[diagnostic(code(mesh::document::no_operation))]
    NoActiveOperation,
}

impl MeshError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MeshError::IoRead { .. } => ErrorCode::IoRead,
            MeshError::IoWrite { .. } => ErrorCode::IoWrite,
            MeshError::ParseError { .. } => ErrorCode::ParseError,
            MeshError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            MeshError::InvalidHandle { .. } => ErrorCode::InvalidHandle,
            MeshError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
            MeshError::EmptyMesh { .. } => ErrorCode::EmptyMesh,
            MeshError::DegenerateFace { .. } => ErrorCode::DegenerateFace,
            MeshError::NonPlanarPoints { .. } => ErrorCode::NonPlanarPoints,
            MeshError::MissingEdge { .. } => ErrorCode::MissingEdge,
            MeshError::OperationInProgress { .. } => ErrorCode::OperationInProgress,
            MeshError::NoActiveOperation => ErrorCode::NoActiveOperation,
        }
    }

    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        use RecoverySuggestion as R;
        match self {
            MeshError::IoRead { .. } => R::CheckFile {
                checks: vec!["the path exists", "it is readable"],
            },
            MeshError::IoWrite { .. } => R::CheckFile {
                checks: vec!["the directory exists", "it is writable"],
            },
            MeshError::ParseError { .. } | MeshError::UnsupportedFormat { .. } => R::ExportAsObj,
            MeshError::EmptyMesh { .. } => R::FixGeometry {
                checks: vec!["objects without faces"],
            },
            MeshError::InvalidCoordinate { .. } => R::FixGeometry {
                checks: vec!["NaN or infinite coordinates"],
            },
            MeshError::DegenerateFace { .. } | MeshError::NonPlanarPoints { .. } => {
                R::FixGeometry {
                    checks: vec!["collapsed faces", "a thickness larger than the features"],
                }
            }
            MeshError::OperationInProgress { .. } | MeshError::NoActiveOperation => {
                R::FinishOperation
            }
            MeshError::InvalidHandle { .. } | MeshError::MissingEdge { .. } => R::None,
        }
    }

    pub fn location(&self) -> Option<MeshLocation> {
        match self {
            MeshError::IoRead { path, .. }
            | MeshError::IoWrite { path, .. }
            | MeshError::ParseError { path, .. } => Some(MeshLocation::File { path: path.clone() }),
            MeshError::MissingEdge { vertex_a, vertex_b } => Some(MeshLocation::Edge {
                vertex_a: *vertex_a,
                vertex_b: *vertex_b,
            }),
            _ => None,
        }
    }

    pub fn io_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MeshError::IoRead {
            path: path.into(),
            source,
        }
    }

    pub fn io_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MeshError::IoWrite {
            path: path.into(),
            source,
        }
    }

    pub fn parse_error(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        MeshError::ParseError {
            path: path.into(),
            details: details.into(),
        }
    }

    pub fn empty_mesh(details: impl Into<String>) -> Self {
        MeshError::EmptyMesh {
            details: details.into(),
        }
    }

    pub fn degenerate_face(details: impl Into<String>) -> Self {
        MeshError::DegenerateFace {
            details: details.into(),
        }
    }

    pub fn invalid_handle(kind: &'static str, index: u32) -> Self {
        MeshError::InvalidHandle { kind, index }
    }
}
