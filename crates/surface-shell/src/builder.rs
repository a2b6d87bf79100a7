//! Fluent builder for shell construction.
//!
//! # Example
//!
//! ```
//! use mesh_graph::{Entities, Point3};
//! use surface_shell::ShellBuilder;
//!
//! let mut surface = Entities::new();
//! surface
//!     .add_face(&[
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(100.0, 0.0, 0.0),
//!         Point3::new(100.0, 100.0, 0.0),
//!     ])
//!     .unwrap();
//!
//! let output = ShellBuilder::new(&surface)
//!     .thickness(-5.0)        // offset along the face normals
//!     .group_name("Skin")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(output.group.display_name(), "Skin");
//! assert_eq!(output.stats.border_walls(), 3);
//! ```

use mesh_graph::Entities;
use mesh_graph::progress::ProgressCallback;

use crate::error::ShellResult;
use crate::params::ShellParams;
use crate::shell::{ShellOutput, compute_shell_with_progress};

/// Chainable configuration of a single shell computation.
///
/// Starts from [`ShellParams::default`].
pub struct ShellBuilder<'a> {
    source: &'a Entities,
    params: ShellParams,
    progress_callback: Option<ProgressCallback>,
}

impl<'a> ShellBuilder<'a> {
    pub fn new(source: &'a Entities) -> Self {
        Self {
            source,
            params: ShellParams::default(),
            progress_callback: None,
        }
    }

    /// Signed shell thickness in mm.
    ///
    /// Positive values offset against the face normals.
    pub fn thickness(mut self, thickness: f64) -> Self {
        self.params.thickness = thickness;
        self
    }

    /// Name of the created group.
    pub fn group_name(mut self, name: impl Into<String>) -> Self {
        self.params.group_name = name.into();
        self
    }

    /// Distance under which shell points merge.
    pub fn merge_tolerance(mut self, tolerance: f64) -> Self {
        self.params.merge_tolerance = tolerance;
        self
    }

    /// Replace all parameters at once, e.g. ones loaded from TOML.
    pub fn params(mut self, params: ShellParams) -> Self {
        self.params = params;
        self
    }

    /// Report progress once per source face. Returning `false` cancels.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Compute the shell.
    ///
    /// # Errors
    ///
    /// See [`compute_shell`](crate::compute_shell).
    pub fn build(self) -> ShellResult<ShellOutput> {
        compute_shell_with_progress(self.source, &self.params, self.progress_callback.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellError;
    use mesh_graph::Point3;

    fn triangle() -> Entities {
        let mut entities = Entities::new();
        entities
            .add_face(&[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
                Point3::new(0.0, 4.0, 0.0),
            ])
            .unwrap();
        entities
    }

    #[test]
    fn test_builder_defaults() {
        let source = triangle();
        let builder = ShellBuilder::new(&source);
        assert_eq!(builder.params, ShellParams::default());
        assert!(builder.progress_callback.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let source = triangle();
        let builder = ShellBuilder::new(&source)
            .thickness(3.0)
            .group_name("Wall")
            .merge_tolerance(1e-3);
        assert_eq!(builder.params.thickness, 3.0);
        assert_eq!(builder.params.group_name, "Wall");
        assert_eq!(builder.params.merge_tolerance, 1e-3);

        let output = builder.build().unwrap();
        assert_eq!(output.group.name.as_deref(), Some("Wall"));
        assert_eq!(output.group.entities.face_count(), 4);
        for (_, vertex) in output.group.entities.vertices() {
            let z = vertex.position().z;
            assert!(z == 0.0 || (z + 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_builder_zero_thickness() {
        let source = triangle();
        let err = ShellBuilder::new(&source).thickness(0.0).build().unwrap_err();
        assert!(matches!(err, ShellError::ZeroThickness));
    }

    #[test]
    fn test_builder_progress_cancel() {
        let source = triangle();
        let err = ShellBuilder::new(&source)
            .thickness(1.0)
            .with_progress(Box::new(|_| false))
            .build()
            .unwrap_err();
        assert!(matches!(err.root_cause(), ShellError::Cancelled));
    }
}
