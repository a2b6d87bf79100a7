//! Shell construction.
//!
//! A shell is built into a fresh container: one offset face per source face
//! (wound the other way round), plus a wall along every open edge of the
//! source. Offset faces whose points are no longer coplanar are rebuilt from
//! triangles and reported as warnings. Any other failure discards the whole
//! container.

use mesh_graph::progress::{ProgressCallback, ProgressTracker};
use mesh_graph::tracing_ext::{OperationTimer, log_entities_stats};
use mesh_graph::{AddFace, Document, Entities, FaceId, Group, GroupId, MeshError, Point3};
use tracing::{debug, info, warn};

use super::attributes::copy_soft_smooth;
use super::border::{BorderFace, add_border_face};
use super::collect::collect_mesh;
use crate::error::{ShellError, ShellResult};
use crate::offset::OffsetMap;
use crate::params::ShellParams;

/// Counts gathered while building one shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellStats {
    /// Faces of the source container.
    pub source_faces: usize,
    /// Distinct vertices of those faces.
    pub unique_vertices: usize,
    /// Source faces rebuilt as a single offset face.
    pub offset_faces: usize,
    /// Source faces rebuilt from triangles.
    pub triangulated_faces: usize,
    /// Walls added as one quad.
    pub border_quads: usize,
    /// Walls split into two triangles.
    pub split_border_faces: usize,
    /// Recoverable problems reported.
    pub warnings: usize,
}

impl ShellStats {
    /// Number of walls along open edges.
    pub fn border_walls(&self) -> usize {
        self.border_quads + self.split_border_faces
    }
}

impl std::fmt::Display for ShellStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} faces offset ({} triangulated), {} border walls ({} split)",
            self.offset_faces + self.triangulated_faces,
            self.triangulated_faces,
            self.border_walls(),
            self.split_border_faces
        )
    }
}

/// A computed shell, not yet part of any document.
#[derive(Debug)]
pub struct ShellOutput {
    /// The new group holding the offset and border faces.
    pub group: Group,
    pub stats: ShellStats,
    /// Recoverable problems, one [`ShellError::NonPlanarFacePoints`] per
    /// triangulated face.
    pub warnings: Vec<ShellError>,
}

/// Result of shelling one group of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellRun {
    /// The selected group.
    pub source: GroupId,
    /// The shell group added inside it.
    pub shell: GroupId,
    pub stats: ShellStats,
}

/// Compute the shell of every face in `source`.
///
/// # Errors
///
/// - [`ShellError::ZeroThickness`] before anything is done when the
///   thickness is zero; callers should treat it as a no-op.
/// - [`ShellError::InvalidParams`] for unusable parameters.
/// - [`ShellError::TransactionAborted`] wrapping whatever stopped the
///   construction. Nothing is returned in that case.
///
/// # Example
///
/// ```
/// use mesh_graph::{Entities, Point3};
/// use surface_shell::{ShellParams, compute_shell};
///
/// let mut square = Entities::new();
/// square
///     .add_face(&[
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(10.0, 0.0, 0.0),
///         Point3::new(10.0, 10.0, 0.0),
///         Point3::new(0.0, 10.0, 0.0),
///     ])
///     .unwrap();
///
/// let output = compute_shell(&square, &ShellParams::with_thickness(2.0)).unwrap();
/// // One offset face and four walls.
/// assert_eq!(output.group.entities.face_count(), 5);
/// ```
pub fn compute_shell(source: &Entities, params: &ShellParams) -> ShellResult<ShellOutput> {
    compute_shell_with_progress(source, params, None)
}

/// [`compute_shell`] reporting once per source face.
///
/// Returning `false` from the callback stops the construction with a
/// rolled-back [`ShellError::Cancelled`].
pub fn compute_shell_with_progress(
    source: &Entities,
    params: &ShellParams,
    callback: Option<&ProgressCallback>,
) -> ShellResult<ShellOutput> {
    params.validate()?;
    build_shell(source, params, callback).map_err(|e| {
        warn!(error = %e, "Shell construction failed, discarding partial shell");
        ShellError::aborted(e)
    })
}

/// Shell each of `groups` inside `document` as one operation.
///
/// The shell of every group is added to that group's own entities, so it
/// shares its transformation. Either all shells are added or, on any
/// failure, the document is left exactly as it was.
pub fn shell_groups(
    document: &mut Document,
    groups: &[GroupId],
    params: &ShellParams,
) -> ShellResult<Vec<ShellRun>> {
    shell_groups_with_progress(document, groups, params, None)
}

/// [`shell_groups`] with a progress callback shared by all groups.
pub fn shell_groups_with_progress(
    document: &mut Document,
    groups: &[GroupId],
    params: &ShellParams,
    callback: Option<&ProgressCallback>,
) -> ShellResult<Vec<ShellRun>> {
    params.validate()?;
    let operation = operation_name(params.thickness);
    info!(operation = %operation, groups = groups.len(), "Shelling selection");

    document
        .transaction(operation, |entities| -> ShellResult<Vec<ShellRun>> {
            let mut runs = Vec::with_capacity(groups.len());
            for &source in groups {
                let group = entities
                    .get_group(source)
                    .ok_or_else(|| MeshError::invalid_handle("group", source.0))?;
                debug!(group = group.display_name(), "Shelling group");

                let output = build_shell(&group.entities, params, callback)?;
                let stats = output.stats;
                let shell = entities.group_mut(source).entities.add_group(output.group);
                runs.push(ShellRun {
                    source,
                    shell,
                    stats,
                });
            }
            Ok(runs)
        })
        .map_err(|e| {
            warn!(error = %e, "Shell operation rolled back");
            ShellError::aborted(e)
        })
}

/// Name of the document operation for a thickness.
pub fn operation_name(thickness: f64) -> String {
    format!("Shell {}", thickness)
}

fn build_shell(
    source: &Entities,
    params: &ShellParams,
    callback: Option<&ProgressCallback>,
) -> ShellResult<ShellOutput> {
    let _timer = OperationTimer::start("compute_shell", source.face_count(), source.vertex_count());
    let thickness = params.thickness;

    let collected = collect_mesh(source);
    let offsets = OffsetMap::build(source, &collected.vertices, thickness)?;

    let mut shell = Entities::with_tolerance(params.merge_tolerance);
    let mut stats = ShellStats {
        source_faces: collected.faces.len(),
        unique_vertices: collected.vertices.len(),
        ..ShellStats::default()
    };
    let mut warnings = Vec::new();

    let tracker = ProgressTracker::every_step(collected.faces.len() as u64);

    for &face in &collected.faces {
        if !tracker.step(callback, "Offsetting faces") {
            info!(face = face.0, "Shell cancelled");
            return Err(ShellError::Cancelled);
        }

        let points: Vec<Point3<f64>> = source
            .face(face)
            .outer_loop()
            .iter()
            .rev()
            .map(|&v| offsets.require(v))
            .collect::<ShellResult<_>>()?;

        match shell.try_add_face(&points)? {
            AddFace::Added(offset_face) => {
                copy_soft_smooth(source, face, &mut shell, offset_face)?;
                stats.offset_faces += 1;
            }
            AddFace::NonPlanar { deviation } => {
                add_triangulated(source, face, &offsets, &mut shell)?;
                stats.triangulated_faces += 1;
                let warning = ShellError::NonPlanarFacePoints {
                    face: face.0,
                    deviation,
                };
                warn!("{}", warning);
                warnings.push(warning);
                // Triangulated faces get no border walls.
                continue;
            }
        }

        for border in add_borders(source, face, &offsets, &mut shell)? {
            match border {
                BorderFace::Quad(_) => stats.border_quads += 1,
                BorderFace::Split { .. } => stats.split_border_faces += 1,
            }
        }
    }
    stats.warnings = warnings.len();

    info!(
        thickness,
        source_faces = stats.source_faces,
        offset_faces = stats.offset_faces,
        triangulated = stats.triangulated_faces,
        border_walls = stats.border_walls(),
        "Shell complete"
    );
    log_entities_stats(&shell, "shell");

    let mut group = Group::named(params.group_name.clone());
    group.entities = shell;
    Ok(ShellOutput {
        group,
        stats,
        warnings,
    })
}

/// Rebuild a face whose offset points are not coplanar from its
/// triangulation, keeping its materials.
fn add_triangulated(
    source: &Entities,
    face: FaceId,
    offsets: &OffsetMap,
    shell: &mut Entities,
) -> ShellResult<Vec<FaceId>> {
    let record = source.face(face);
    let mut mesh = source.face_mesh(face);
    for index in 0..mesh.point_count() as u32 {
        let position = mesh
            .point_at(index)
            .ok_or_else(|| MeshError::invalid_handle("mesh point", index))?;
        let offset = offsets
            .at_position(&position)
            .ok_or_else(|| ShellError::MissingOffset {
                vertex: record
                    .outer_loop()
                    .get(index as usize)
                    .map_or(index, |v| v.0),
            })?;
        mesh.set_point(index, offset)?;
    }
    mesh.reverse_winding();

    let created = shell.add_faces_from_mesh(
        &mesh,
        record.material.as_ref(),
        record.back_material.as_ref(),
    )?;
    debug!(
        face = face.0,
        triangles = created.len(),
        "Triangulated non-planar offset face"
    );
    Ok(created)
}

/// Walls along the open edges of `face`.
///
/// Each wall runs against the face's loop direction on the source side and
/// with it on the offset side, so it faces away from the face.
fn add_borders(
    source: &Entities,
    face: FaceId,
    offsets: &OffsetMap,
    shell: &mut Entities,
) -> ShellResult<Vec<BorderFace>> {
    let record = source.face(face);
    let ring = record.outer_loop();
    let n = ring.len();

    let mut borders = Vec::new();
    for (i, &edge) in record.edges().iter().enumerate() {
        if !source.edge(edge).is_boundary() {
            continue;
        }
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        let wall = [
            source.vertex(b).position(),
            source.vertex(a).position(),
            offsets.require(a)?,
            offsets.require(b)?,
        ];
        borders.push(add_border_face(shell, wall)?);
    }
    Ok(borders)
}
