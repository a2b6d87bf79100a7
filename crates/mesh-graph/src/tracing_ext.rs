//! Tracing helpers shared by the mesh crates.
//!
//! Targets:
//! - `mesh_graph::timing`: operation durations
//! - `mesh_graph::state`: container sizes after an edit
//! - `mesh_graph::io`: file reads and writes

use std::path::Path;
use std::time::Instant;

use nalgebra::Vector3;
use tracing::span::EnteredSpan;
use tracing::{debug, info, warn};

use crate::entities::Entities;

/// Enters an `operation` span for its lifetime and logs the elapsed time
/// when dropped.
///
/// ```
/// use mesh_graph::tracing_ext::OperationTimer;
///
/// let timer = OperationTimer::start("weld", 12, 8);
/// assert!(timer.elapsed_ms() >= 0.0);
/// ```
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    _span: EnteredSpan,
}

impl OperationTimer {
    /// `faces` and `vertices` describe the input and are recorded on the span.
    pub fn start(name: &'static str, faces: usize, vertices: usize) -> Self {
        let span = tracing::info_span!("operation", operation = name, faces, vertices).entered();
        debug!(target: "mesh_graph::timing", operation = name, "Started");
        Self {
            name,
            start: Instant::now(),
            _span: span,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        info!(
            target: "mesh_graph::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", self.elapsed_ms()),
            "Finished"
        );
    }
}

/// Debug-log the counts and extent of `entities`, labelled with `context`.
pub fn log_entities_stats(entities: &Entities, context: &str) {
    let extent = entities
        .bounds()
        .map(|(min, max)| max - min)
        .unwrap_or_else(Vector3::zeros);

    debug!(
        target: "mesh_graph::state",
        context,
        faces = entities.face_count(),
        edges = entities.edge_count(),
        vertices = entities.vertex_count(),
        open_edges = entities.boundary_edges().count(),
        nested_faces = entities.total_face_count() - entities.face_count(),
        extent = format!("{:.2} x {:.2} x {:.2}", extent.x, extent.y, extent.z),
        "Container state"
    );
}

/// Log a file read or write; the format is taken from the extension.
pub fn log_file_io(action: &str, path: &Path, ok: bool) {
    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("?");
    if ok {
        info!(target: "mesh_graph::io", action, path = %path.display(), format, "File done");
    } else {
        warn!(target: "mesh_graph::io", action, path = %path.display(), format, "File failed");
    }
}
