//! Shell parameters and their TOML configuration form.
//!
//! # Example TOML
//!
//! ```toml
//! thickness = -12.5
//! group_name = "Skin"
//! merge_tolerance = 1e-6
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::error::{ShellError, ShellResult};

/// Default shell thickness in millimetres.
pub const DEFAULT_THICKNESS: f64 = 500.0;

/// Parameters for one shell operation.
///
/// Owned by the caller and passed into every operation; nothing in this crate
/// keeps a global default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellParams {
    /// Signed distance between source and offset surface, in mm.
    ///
    /// Positive values offset against the face normals (inwards on a closed
    /// outward-facing solid), negative values along them.
    pub thickness: f64,

    /// Name given to each created shell group.
    pub group_name: String,

    /// Distance below which points of the shell merge into one vertex.
    pub merge_tolerance: f64,
}

impl Default for ShellParams {
    fn default() -> Self {
        Self {
            thickness: DEFAULT_THICKNESS,
            group_name: "Shell".to_string(),
            merge_tolerance: mesh_graph::geom::DEFAULT_TOLERANCE,
        }
    }
}

impl ShellParams {
    /// Default parameters with the given thickness.
    pub fn with_thickness(thickness: f64) -> Self {
        Self {
            thickness,
            ..Self::default()
        }
    }

    /// Check the parameters before running an operation.
    ///
    /// A zero thickness is reported as [`ShellError::ZeroThickness`], the
    /// no-op signal, rather than as invalid.
    pub fn validate(&self) -> ShellResult<()> {
        if !self.thickness.is_finite() {
            return Err(ShellError::invalid_param(
                "thickness",
                self.thickness.to_string(),
                "thickness must be a finite number",
            ));
        }
        if !(self.merge_tolerance.is_finite() && self.merge_tolerance > 0.0) {
            return Err(ShellError::invalid_param(
                "merge_tolerance",
                self.merge_tolerance.to_string(),
                "merge tolerance must be positive",
            ));
        }
        if self.merge_tolerance >= self.thickness.abs() && self.thickness != 0.0 {
            return Err(ShellError::invalid_param(
                "merge_tolerance",
                self.merge_tolerance.to_string(),
                "merge tolerance must be smaller than the thickness",
            ));
        }
        if self.thickness == 0.0 {
            return Err(ShellError::ZeroThickness);
        }
        Ok(())
    }

    /// Load parameters from a TOML string. Missing keys take their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ParamsConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load parameters from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ParamsConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ParamsConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save parameters to a TOML file.
    pub fn save_toml(&self, path: impl AsRef<Path>) -> Result<(), ParamsConfigError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

/// Errors that can occur when loading or saving parameter files.
#[derive(Debug, Error)]
pub enum ParamsConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
