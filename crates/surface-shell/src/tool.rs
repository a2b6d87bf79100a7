//! Interactive shell tool.
//!
//! The host application forwards its input events to a [`ShellTool`] and
//! draws [`ShellTool::polygons`] as the live preview. The thickness is either
//! typed in or measured between two picked points; a cancel reverts it to the
//! last confirmed value. Committing shells the whole selection in one
//! document operation.
//!
//! ```text
//!             click (start)              click (end): confirm distance
//!   Idle  ─────────────────────▶  PointPicked  ─────────────────────▶  Idle
//!    ▲                              │  mouse move: live distance
//!    └────────── cancel ────────────┘
//! ```

use mesh_graph::{Document, GroupId, Point3};
use tracing::{debug, info};

use crate::error::{ShellError, ShellResult};
use crate::params::ShellParams;
use crate::preview::{PreviewMesh, offset_polygons};
use crate::shell::{ShellRun, shell_groups};

/// Where the tool is in a two-click measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolState {
    /// No point picked.
    Idle,
    /// The first point is picked; the thickness follows the mouse.
    PointPicked { start: Point3<f64> },
}

/// Caller-side state of an interactive shell session over a selection of
/// groups.
#[derive(Debug)]
pub struct ShellTool {
    selection: Vec<GroupId>,
    meshes: Vec<PreviewMesh>,
    params: ShellParams,
    cached_thickness: f64,
    polygons: Vec<Vec<Point3<f64>>>,
    state: ToolState,
}

impl ShellTool {
    /// Start a session on the groups of `selection` found in `document`.
    ///
    /// Handles that are not groups of the document are ignored. The preview
    /// is computed immediately for `params.thickness`.
    pub fn new(document: &Document, selection: &[GroupId], params: ShellParams) -> ShellResult<Self> {
        let entities = document.entities();
        let mut groups = Vec::with_capacity(selection.len());
        let mut meshes = Vec::with_capacity(selection.len());
        for &id in selection {
            match entities.get_group(id) {
                Some(group) => {
                    groups.push(id);
                    meshes.push(PreviewMesh::from_group(group));
                }
                None => debug!(group = id.0, "Ignoring selected entity that is not a group"),
            }
        }

        let mut tool = Self {
            selection: groups,
            meshes,
            cached_thickness: params.thickness,
            params,
            polygons: Vec::new(),
            state: ToolState::Idle,
        };
        tool.cache_preview()?;
        Ok(tool)
    }

    /// Current thickness, to be persisted by the host as the next default.
    pub fn thickness(&self) -> f64 {
        self.params.thickness
    }

    pub fn state(&self) -> ToolState {
        self.state
    }

    /// Groups the tool will shell.
    pub fn selection(&self) -> &[GroupId] {
        &self.selection
    }

    /// Preview polygons in world space for the current thickness.
    pub fn polygons(&self) -> &[Vec<Point3<f64>>] {
        &self.polygons
    }

    /// Label and value for the host's measurement box.
    pub fn status(&self) -> (&'static str, String) {
        ("Thickness", format_length(self.params.thickness))
    }

    /// A thickness typed by the user, e.g. `"12"`, `"-3.5mm"` or `"2cm"`.
    ///
    /// # Errors
    ///
    /// [`ShellError::InvalidParams`] if the text is not a length; the tool
    /// state is left unchanged.
    pub fn on_user_text(&mut self, text: &str) -> ShellResult<()> {
        let thickness = parse_length(text).ok_or_else(|| {
            ShellError::invalid_param("thickness", text, "expected a length such as 12mm or 2cm")
        })?;
        self.state = ToolState::Idle;
        self.params.thickness = thickness;
        self.cached_thickness = thickness;
        self.cache_preview()?;
        Ok(())
    }

    /// A click at `point`: picks the start of a measurement, or ends it.
    pub fn on_click(&mut self, point: Point3<f64>) -> ShellResult<()> {
        match self.state {
            ToolState::Idle => {
                self.state = ToolState::PointPicked { start: point };
            }
            ToolState::PointPicked { start } => {
                self.measure(&start, &point)?;
                self.cached_thickness = self.params.thickness;
                self.state = ToolState::Idle;
            }
        }
        Ok(())
    }

    /// Mouse moved to `point`; updates the thickness while measuring.
    pub fn on_mouse_move(&mut self, point: Point3<f64>) -> ShellResult<()> {
        if let ToolState::PointPicked { start } = self.state {
            self.measure(&start, &point)?;
        }
        Ok(())
    }

    /// Abandon a measurement and go back to the last confirmed thickness.
    pub fn on_cancel(&mut self) -> ShellResult<()> {
        self.state = ToolState::Idle;
        self.params.thickness = self.cached_thickness;
        self.cache_preview()?;
        Ok(())
    }

    /// Shell the selection with the current thickness.
    ///
    /// Returns `None` without touching the document when the thickness is
    /// zero.
    pub fn commit(&self, document: &mut Document) -> ShellResult<Option<Vec<ShellRun>>> {
        match shell_groups(document, &self.selection, &self.params) {
            Ok(runs) => {
                info!(
                    groups = runs.len(),
                    thickness = self.params.thickness,
                    "Shell tool committed"
                );
                Ok(Some(runs))
            }
            Err(e) if e.is_no_op() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn measure(&mut self, start: &Point3<f64>, end: &Point3<f64>) -> ShellResult<()> {
        self.params.thickness = nalgebra::distance(start, end);
        self.cache_preview()?;
        Ok(())
    }

    /// Refresh the preview. A zero thickness keeps the previous polygons.
    fn cache_preview(&mut self) -> ShellResult<bool> {
        if self.params.thickness == 0.0 {
            return Ok(false);
        }
        self.polygons = offset_polygons(&self.meshes, self.params.thickness)?;
        Ok(true)
    }
}

/// Parse a length in millimetres.
///
/// A bare number is taken as millimetres; `mm`, `cm`, `m`, `in`/`"` and
/// `ft`/`'` suffixes are converted.
pub fn parse_length(text: &str) -> Option<f64> {
    const UNITS: [(&str, f64); 7] = [
        ("mm", 1.0),
        ("cm", 10.0),
        ("m", 1000.0),
        ("in", 25.4),
        ("\"", 25.4),
        ("ft", 304.8),
        ("'", 304.8),
    ];

    let text = text.trim();
    let (number, scale) = UNITS
        .iter()
        .find_map(|&(suffix, scale)| text.strip_suffix(suffix).map(|n| (n, scale)))
        .unwrap_or((text, 1.0));

    let value: f64 = number.trim().parse().ok()?;
    let length = value * scale;
    length.is_finite().then_some(length)
}

fn format_length(length: f64) -> String {
    format!("{}mm", length)
}
