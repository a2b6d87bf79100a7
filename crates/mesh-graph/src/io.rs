//! OBJ file I/O.
//!
//! Loading turns every OBJ object into a root-level [`Group`]. Polygons are
//! kept as n-gon faces; polygons that are not planar are triangulated.
//! `usemtl` names become face materials when the material library is found.
//!
//! Saving writes one `o` block per group (nested groups are flattened into
//! world space, named `parent/child`), polygon faces as n-gons, and a
//! companion `.mtl` file declaring every material used.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use hashbrown::HashMap;
use nalgebra::{Affine3, Point3};
use tracing::{debug, info, warn};

use crate::document::Document;
use crate::entities::{AddFace, Entities};
use crate::error::{MeshError, MeshResult};
use crate::geom;
use crate::polygon_mesh::PolygonMesh;
use crate::tracing_ext::log_file_io;
use crate::triangulate::triangulate_polygon;
use crate::types::{Group, GroupId, Material};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
}

impl MeshFormat {
    /// Detect format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .and_then(|ext| match ext.as_str() {
                "obj" => Some(MeshFormat::Obj),
                _ => None,
            })
    }

    fn require(path: &Path) -> MeshResult<Self> {
        Self::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
            extension: path.extension().and_then(|e| e.to_str()).map(String::from),
        })
    }
}

/// Load a document from file, detecting the format from the extension.
pub fn load_document(path: &Path) -> MeshResult<Document> {
    match MeshFormat::require(path)? {
        MeshFormat::Obj => load_obj(path).map(Document::with_entities),
    }
}

/// Save a document's entities, detecting the format from the extension.
pub fn save_document(document: &Document, path: &Path) -> MeshResult<()> {
    match MeshFormat::require(path)? {
        MeshFormat::Obj => save_obj(document.entities(), path),
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load an OBJ file into a new container of groups.
///
/// # Errors
///
/// [`MeshError::IoRead`] if the file cannot be accessed,
/// [`MeshError::ParseError`] if it is not valid OBJ,
/// [`MeshError::EmptyMesh`] if no face survives loading.
pub fn load_obj(path: &Path) -> MeshResult<Entities> {
    info!("Loading mesh from {:?} (OBJ format)", path);
    std::fs::metadata(path).map_err(|e| MeshError::io_read(path, e))?;

    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: false,
            single_index: false,
            ..Default::default()
        },
    )
    .map_err(|e| {
        log_file_io("load", path, false);
        MeshError::parse_error(path, e.to_string())
    })?;

    let material_names: Vec<String> = match materials {
        Ok(materials) => materials.into_iter().map(|m| m.name).collect(),
        Err(e) => {
            debug!("No material library loaded: {}", e);
            Vec::new()
        }
    };

    let mut root = Entities::new();
    let mut groups_by_name: HashMap<String, GroupId> = HashMap::new();
    let mut fallbacks = 0usize;
    let mut skipped = 0usize;

    for model in &models {
        // tobj starts a new model whenever the material changes, so models
        // sharing a name belong to the same OBJ object.
        let group_id = *groups_by_name
            .entry(model.name.clone())
            .or_insert_with(|| root.add_group(Group::named(model.name.clone())));
        let entities = &mut root.group_mut(group_id).entities;

        let mesh = &model.mesh;
        let material = mesh
            .material_id
            .and_then(|id| material_names.get(id))
            .map(|name| Material::new(name.clone()));

        let positions: Vec<Point3<f64>> = mesh
            .positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0] as f64, c[1] as f64, c[2] as f64))
            .collect();

        let arities: Vec<usize> = if mesh.face_arities.is_empty() {
            vec![3; mesh.indices.len() / 3]
        } else {
            mesh.face_arities.iter().map(|&a| a as usize).collect()
        };

        let mut start = 0usize;
        for arity in arities {
            let Some(indices) = mesh.indices.get(start..start + arity) else {
                return Err(MeshError::parse_error(
                    path,
                    format!("face index list of '{}' is truncated", model.name),
                ));
            };
            start += arity;

            let points = indices
                .iter()
                .map(|&i| {
                    positions.get(i as usize).copied().ok_or_else(|| {
                        MeshError::parse_error(path, format!("vertex index {} out of range", i))
                    })
                })
                .collect::<MeshResult<Vec<_>>>()?;

            match entities.try_add_face(&points) {
                Ok(AddFace::Added(face)) => {
                    entities.face_mut(face).material = material.clone();
                }
                Ok(AddFace::NonPlanar { deviation }) => {
                    warn!(
                        object = %model.name,
                        points = points.len(),
                        deviation,
                        "Non-planar polygon, triangulating"
                    );
                    let normal = geom::newell_normal(&points);
                    let triangles = triangulate_polygon(&points, &normal);
                    let polygon_mesh = PolygonMesh::from_parts(points, triangles);
                    entities.add_faces_from_mesh(&polygon_mesh, material.as_ref(), None)?;
                    fallbacks += 1;
                }
                Err(MeshError::DegenerateFace { details }) => {
                    debug!(object = %model.name, details = %details, "Skipped degenerate polygon");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    if root.total_face_count() == 0 {
        return Err(MeshError::empty_mesh("OBJ file contains no usable faces"));
    }

    info!(
        groups = root.group_count(),
        faces = root.total_face_count(),
        triangulated = fallbacks,
        skipped,
        "Loaded OBJ"
    );
    log_file_io("load", path, true);
    Ok(root)
}

// ============================================================================
// Saving
// ============================================================================

struct ObjObject {
    name: String,
    faces: Vec<(Vec<Point3<f64>>, Option<Material>)>,
}

/// Flatten `entities` and nested groups into world-space objects.
fn collect_objects(
    entities: &Entities,
    transformation: &Affine3<f64>,
    name: &str,
    out: &mut Vec<ObjObject>,
) {
    let faces: Vec<_> = entities
        .faces()
        .map(|(id, face)| {
            let points = entities
                .face_positions(id)
                .iter()
                .map(|p| transformation.transform_point(p))
                .collect();
            (points, face.material.clone())
        })
        .collect();
    if !faces.is_empty() {
        let name = if name.is_empty() { "Model" } else { name };
        out.push(ObjObject {
            name: name.to_string(),
            faces,
        });
    }

    for (_, group) in entities.groups() {
        let child = if name.is_empty() {
            group.display_name().to_string()
        } else {
            format!("{}/{}", name, group.display_name())
        };
        collect_objects(
            &group.entities,
            &(transformation * group.transformation),
            &child,
            out,
        );
    }
}

/// Save entities to an OBJ file, with a `.mtl` file next to it when any face
/// has a material.
pub fn save_obj(entities: &Entities, path: &Path) -> MeshResult<()> {
    info!("Saving mesh to {:?} (OBJ format)", path);

    let mut objects = Vec::new();
    collect_objects(entities, &Affine3::identity(), "", &mut objects);

    let mut material_names: Vec<String> = objects
        .iter()
        .flat_map(|o| o.faces.iter())
        .filter_map(|(_, m)| m.as_ref().map(|m| m.name().to_string()))
        .collect();
    material_names.sort();
    material_names.dedup();

    let mtl_path = (!material_names.is_empty()).then(|| path.with_extension("mtl"));
    if let Some(mtl_path) = &mtl_path {
        write_file(mtl_path, |w| write_mtl(w, &material_names))?;
    }

    write_file(path, |w| write_obj(w, &objects, mtl_path.as_deref()))?;

    debug!(
        objects = objects.len(),
        materials = material_names.len(),
        "Saved OBJ"
    );
    log_file_io("save", path, true);
    Ok(())
}

fn write_file(
    path: &Path,
    body: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
) -> MeshResult<()> {
    let file = File::create(path).map_err(|e| MeshError::io_write(path, e))?;
    let mut writer = BufWriter::new(file);
    body(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| MeshError::io_write(path, e))
}

fn write_mtl(w: &mut impl Write, names: &[String]) -> std::io::Result<()> {
    writeln!(w, "# Materials exported by mesh-graph")?;
    for name in names {
        writeln!(w)?;
        writeln!(w, "newmtl {}", name)?;
        writeln!(w, "Kd 0.800000 0.800000 0.800000")?;
    }
    Ok(())
}

fn write_obj(
    w: &mut impl Write,
    objects: &[ObjObject],
    mtl_path: Option<&Path>,
) -> std::io::Result<()> {
    let face_count: usize = objects.iter().map(|o| o.faces.len()).sum();
    writeln!(w, "# OBJ file exported by mesh-graph")?;
    writeln!(w, "# Objects: {}", objects.len())?;
    writeln!(w, "# Faces: {}", face_count)?;
    if let Some(file_name) = mtl_path.and_then(Path::file_name) {
        writeln!(w, "mtllib {}", file_name.to_string_lossy())?;
    }

    // OBJ indices are 1-based and global across objects.
    let mut next_index = 1usize;
    for object in objects {
        writeln!(w)?;
        writeln!(w, "o {}", object.name)?;

        let mut indices: HashMap<[u64; 3], usize> = HashMap::new();
        let mut face_indices = Vec::with_capacity(object.faces.len());
        for (points, _) in &object.faces {
            let mut face = Vec::with_capacity(points.len());
            for p in points {
                let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
                let index = match indices.get(&key) {
                    Some(&index) => index,
                    None => {
                        writeln!(w, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z)?;
                        indices.insert(key, next_index);
                        next_index += 1;
                        next_index - 1
                    }
                };
                face.push(index.to_string());
            }
            face_indices.push(face);
        }

        let mut current_material: Option<&str> = None;
        for ((_, material), face) in object.faces.iter().zip(&face_indices) {
            let name = material.as_ref().map(Material::name);
            if name != current_material {
                writeln!(w, "usemtl {}", name.unwrap_or("default"))?;
                current_material = name;
            }
            writeln!(w, "f {}", face.join(" "))?;
        }
    }
    Ok(())
}
