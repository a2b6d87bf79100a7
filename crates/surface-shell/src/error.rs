//! Error types for shell operations with rich diagnostics.
//!
//! Only some of these stop an operation. [`ShellError::ZeroThickness`] is a
//! no-op signal the caller should swallow, and
//! [`ShellError::NonPlanarFacePoints`] is reported as a warning alongside a
//! successful result. Everything raised while building a shell ends up
//! wrapped in [`ShellError::TransactionAborted`] after the partial geometry
//! has been discarded.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for shell operations.
pub type ShellResult<T> = Result<T, ShellError>;

/// `SHELL-` codes: 1xxx input, 2xxx geometry, 3xxx operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ShellErrorCode {
    ZeroThickness = 1001,
    InvalidParams = 1002,

    NoIncidentFaces = 2001,
    NonPlanarFacePoints = 2002,
    MissingOffset = 2003,
    LoopMismatch = 2004,

    Cancelled = 3001,
    TransactionAborted = 3002,
    MeshError = 3003,
}

impl std::fmt::Display for ShellErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SHELL-{}", *self as u16)
    }
}

/// Recovery suggestions for shell errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellRecoverySuggestion {
    /// Use a non-zero thickness.
    SetThickness,
    /// Use a smaller thickness.
    ReduceThickness,
    /// Clean up the source geometry first.
    CheckSourceMesh,
    /// Run the operation again.
    Retry,
    /// No specific suggestion.
    None,
}

impl std::fmt::Display for ShellRecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellRecoverySuggestion::SetThickness => {
                write!(f, "Enter a positive or negative thickness")
            }
            ShellRecoverySuggestion::ReduceThickness => {
                write!(f, "Try a smaller thickness so offset faces do not collapse")
            }
            ShellRecoverySuggestion::CheckSourceMesh => {
                write!(
                    f,
                    "Check the selection for stray edges, collapsed faces and duplicate geometry"
                )
            }
            ShellRecoverySuggestion::Retry => write!(f, "Run the shell operation again"),
            ShellRecoverySuggestion::None => write!(f, "No specific suggestion available"),
        }
    }
}

/// Errors that can occur during shell operations.
#[derive(Debug, Error, Diagnostic)]
pub enum ShellError {
    /// Thickness of exactly zero: nothing to build.
    #[error("shell thickness is zero")]
    #[diagnostic(code(shell::input::zero_thickness), help("Enter a non-zero thickness."))]
    ZeroThickness,

    /// Invalid parameters.
    #[error("invalid shell parameters: {details}")]
    #[diagnostic(
        code(shell::params::invalid),
        help("Check parameter values: thickness must be finite, merge_tolerance > 0.")
    )]
    InvalidParams {
        details: String,
        param_name: Option<String>,
        param_value: Option<String>,
    },

    /// A vertex has no incident faces, so no offset direction exists.
    #[error("vertex {vertex} has no incident faces")]
    #[diagnostic(
        code(shell::offset::no_faces),
        help("Only vertices of faces can be offset.")
    )]
    NoIncidentFaces { vertex: u32 },

    /// Offset points of a face are not coplanar.
    ///
    /// Recoverable: the face is rebuilt from triangles instead.
    #[error("offset points of face {face} are not planar (deviation {deviation:.3e})")]
    #[diagnostic(
        code(shell::offset::non_planar),
        severity(Warning),
        help("The face was triangulated instead.")
    )]
    NonPlanarFacePoints { face: u32, deviation: f64 },

    /// A collected vertex has no offset point.
    #[error("no offset point for vertex {vertex}")]
    #[diagnostic(code(shell::offset::missing))]
    MissingOffset { vertex: u32 },

    /// Source and offset face loops cannot be matched.
    #[error("offset face loop has {offset} vertices, source face has {source_len}")]
    #[diagnostic(code(shell::attributes::loop_mismatch))]
    LoopMismatch { source_len: usize, offset: usize },

    /// The progress callback asked to stop.
    #[error("shell operation cancelled")]
    #[diagnostic(code(shell::operation::cancelled))]
    Cancelled,

    /// Construction failed and all partial geometry was discarded.
    #[error("shell operation rolled back: {source}")]
    #[diagnostic(
        code(shell::operation::aborted),
        help("No geometry was added. {}", source.recovery_suggestion())
    )]
    TransactionAborted {
        #[source]
        source: Box<ShellError>,
    },

    /// Underlying mesh error.
    #[error("mesh operation failed: {0}")]
    #[diagnostic(code(shell::mesh::error))]
    Mesh(#[from] mesh_graph::MeshError),
}

impl ShellError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ShellErrorCode {
        match self {
            ShellError::ZeroThickness => ShellErrorCode::ZeroThickness,
            ShellError::InvalidParams { .. } => ShellErrorCode::InvalidParams,
            ShellError::NoIncidentFaces { .. } => ShellErrorCode::NoIncidentFaces,
            ShellError::NonPlanarFacePoints { .. } => ShellErrorCode::NonPlanarFacePoints,
            ShellError::MissingOffset { .. } => ShellErrorCode::MissingOffset,
            ShellError::LoopMismatch { .. } => ShellErrorCode::LoopMismatch,
            ShellError::Cancelled => ShellErrorCode::Cancelled,
            ShellError::TransactionAborted { .. } => ShellErrorCode::TransactionAborted,
            ShellError::Mesh(_) => ShellErrorCode::MeshError,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> ShellRecoverySuggestion {
        match self {
            ShellError::ZeroThickness => ShellRecoverySuggestion::SetThickness,
            ShellError::InvalidParams { .. } => ShellRecoverySuggestion::None,
            ShellError::NoIncidentFaces { .. }
            | ShellError::MissingOffset { .. }
            | ShellError::LoopMismatch { .. } => ShellRecoverySuggestion::CheckSourceMesh,
            ShellError::NonPlanarFacePoints { .. } => ShellRecoverySuggestion::None,
            ShellError::Cancelled => ShellRecoverySuggestion::Retry,
            ShellError::TransactionAborted { source } => source.recovery_suggestion(),
            ShellError::Mesh(mesh_graph::MeshError::DegenerateFace { .. })
            | ShellError::Mesh(mesh_graph::MeshError::NonPlanarPoints { .. }) => {
                ShellRecoverySuggestion::ReduceThickness
            }
            ShellError::Mesh(_) => ShellRecoverySuggestion::CheckSourceMesh,
        }
    }

    /// Whether this is the zero-thickness no-op signal.
    pub fn is_no_op(&self) -> bool {
        matches!(self, ShellError::ZeroThickness)
    }

    /// The error that caused a rollback, or `self`.
    pub fn root_cause(&self) -> &ShellError {
        match self {
            ShellError::TransactionAborted { source } => source.root_cause(),
            other => other,
        }
    }

    // Constructor helpers

    /// Wrap an error raised during construction. Already-wrapped errors are
    /// returned unchanged.
    pub fn aborted(source: ShellError) -> Self {
        match source {
            aborted @ ShellError::TransactionAborted { .. } => aborted,
            other => ShellError::TransactionAborted {
                source: Box::new(other),
            },
        }
    }

    /// Create an invalid params error.
    pub fn invalid_params(details: impl Into<String>) -> Self {
        ShellError::InvalidParams {
            details: details.into(),
            param_name: None,
            param_value: None,
        }
    }

    /// Create an invalid params error with param info.
    pub fn invalid_param(
        param_name: impl Into<String>,
        param_value: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        ShellError::InvalidParams {
            details: details.into(),
            param_name: Some(param_name.into()),
            param_value: Some(param_value.into()),
        }
    }
}
