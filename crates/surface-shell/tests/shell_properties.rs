//! End-to-end checks of vertex offsets and shell construction.

use std::cell::Cell;
use std::rc::Rc;

use approx::assert_relative_eq;
use mesh_graph::progress::ProgressCallback;
use mesh_graph::{Document, Entities, Group, Point3, Vector3};
use surface_shell::{
    BorderFace, OffsetCase, ShellError, ShellParams, add_border_face, compute_shell,
    offset_vertex, offset_vertex_detailed, shell_groups, shell_groups_with_progress,
};

// =============================================================================
// Fixtures
// =============================================================================

/// Faces of an axis-aligned cube with outward normals.
fn cube_faces(size: f64) -> Vec<[Point3<f64>; 4]> {
    let p = |x: f64, y: f64, z: f64| Point3::new(x * size, y * size, z * size);
    vec![
        [p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)], // bottom
        [p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)], // top
        [p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)], // front
        [p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.), p(1., 1., 0.)], // back
        [p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.), p(0., 1., 0.)], // left
        [p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)], // right
    ]
}

fn cube(size: f64) -> Entities {
    let mut entities = Entities::new();
    for face in cube_faces(size) {
        entities.add_face(&face).unwrap();
    }
    entities
}

fn square(size: f64) -> Entities {
    let mut entities = Entities::new();
    entities
        .add_face(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(size, 0.0, 0.0),
            Point3::new(size, size, 0.0),
            Point3::new(0.0, size, 0.0),
        ])
        .unwrap();
    entities
}

/// Two unit squares side by side, sharing the edge x = 1.
fn two_squares() -> Entities {
    let mut entities = square(1.0);
    entities
        .add_face(&[
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ])
        .unwrap();
    entities
}

fn edge_flags(entities: &Entities, a: &Point3<f64>, b: &Point3<f64>) -> (bool, bool, bool) {
    let edge = entities
        .common_edge(
            entities.find_vertex(a).unwrap(),
            entities.find_vertex(b).unwrap(),
        )
        .unwrap();
    let edge = entities.edge(edge);
    (edge.soft, edge.smooth, edge.hidden)
}

// =============================================================================
// Vertex offsets
// =============================================================================

#[test]
fn test_cube_corners_move_inwards() {
    let size = 10.0;
    let t = 1.5;
    let entities = cube(size);

    for (id, vertex) in entities.vertices() {
        let p = vertex.position();
        let (q, case) = offset_vertex_detailed(&entities, id, t).unwrap();
        assert_eq!(case, OffsetCase::Miter);

        let toward_center = |c: f64| if c == 0.0 { t } else { -t };
        let expected = Point3::new(
            p.x + toward_center(p.x),
            p.y + toward_center(p.y),
            p.z + toward_center(p.z),
        );
        assert_relative_eq!(q, expected, epsilon = 1e-9);
    }
}

#[test]
fn test_cube_corners_negative_thickness_move_outwards() {
    let entities = cube(1.0);
    let corner = entities.find_vertex(&Point3::new(1.0, 1.0, 1.0)).unwrap();
    let q = offset_vertex(&entities, corner, -0.5).unwrap();
    assert_relative_eq!(q, Point3::new(1.5, 1.5, 1.5), epsilon = 1e-9);
}

#[test]
fn test_single_face_offset_is_exact() {
    let entities = square(4.0);
    for (id, vertex) in entities.vertices() {
        let q = offset_vertex(&entities, id, 0.75).unwrap();
        assert_eq!(q, vertex.position() - Vector3::z() * 0.75);
    }
}

#[test]
fn test_coplanar_neighbours_match_single_face() {
    let entities = two_squares();
    let shared = entities.find_vertex(&Point3::new(1.0, 1.0, 0.0)).unwrap();
    let (q, case) = offset_vertex_detailed(&entities, shared, 2.0).unwrap();
    assert_eq!(case, OffsetCase::Coplanar);
    assert_eq!(q, Point3::new(1.0, 1.0, -2.0));
}

#[test]
fn test_right_angle_crease() {
    // Floor facing up, wall facing +y, meeting along the x axis.
    let mut entities = square(2.0);
    entities
        .add_face(&[
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(2.0, 0.0, 2.0),
        ])
        .unwrap();

    let origin = entities.find_vertex(&Point3::origin()).unwrap();
    let (q, case) = offset_vertex_detailed(&entities, origin, 0.5).unwrap();
    assert_eq!(case, OffsetCase::TwoPlanes);
    assert_relative_eq!(q, Point3::new(0.0, -0.5, -0.5), epsilon = 1e-12);
}

#[test]
fn test_loose_vertex_has_no_offset() {
    let mut entities = square(1.0);
    let edge = entities
        .add_line(Point3::new(5.0, 0.0, 0.0), Point3::new(6.0, 0.0, 0.0))
        .unwrap();
    let loose = entities.edge(edge).start();
    assert!(matches!(
        offset_vertex(&entities, loose, 1.0),
        Err(ShellError::NoIncidentFaces { .. })
    ));
}

// =============================================================================
// Shell construction
// =============================================================================

#[test]
fn test_closed_cube_has_no_walls() {
    let entities = cube(10.0);
    let output = compute_shell(&entities, &ShellParams::with_thickness(1.0)).unwrap();

    assert_eq!(output.stats.source_faces, 6);
    assert_eq!(output.stats.unique_vertices, 8);
    assert_eq!(output.stats.offset_faces, 6);
    assert_eq!(output.stats.border_walls(), 0);

    let shell = &output.group.entities;
    assert_eq!(shell.face_count(), 6);
    assert_eq!(shell.vertex_count(), 8);
    assert_eq!(shell.boundary_edges().count(), 0);

    // The inner cube faces towards the centre.
    let center = Point3::new(5.0, 5.0, 5.0);
    for (id, face) in shell.faces() {
        let p = shell.face_positions(id)[0];
        assert!(face.normal().dot(&(center - p)) > 0.0);
    }
    let (min, max) = shell.bounds().unwrap();
    assert_relative_eq!(min, Point3::new(1.0, 1.0, 1.0), epsilon = 1e-9);
    assert_relative_eq!(max, Point3::new(9.0, 9.0, 9.0), epsilon = 1e-9);
}

#[test]
fn test_open_box_gets_walls() {
    let mut entities = Entities::new();
    for face in cube_faces(4.0).into_iter().filter(|f| f[0].z != 4.0) {
        entities.add_face(&face).unwrap();
    }
    assert_eq!(entities.face_count(), 5);

    let output = compute_shell(&entities, &ShellParams::with_thickness(0.5)).unwrap();
    assert_eq!(output.stats.offset_faces, 5);
    assert_eq!(output.stats.border_quads, 4);
    assert_eq!(output.stats.split_border_faces, 0);
    // The walls close the rim: offset surface and walls leave only the
    // source rim open.
    assert_eq!(output.group.entities.boundary_edges().count(), 4);
}

#[test]
fn test_zero_thickness_leaves_document_untouched() {
    let mut root = Entities::new();
    let group = root.add_group(Group::with_entities(square(1.0)));
    let mut document = Document::with_entities(root);

    let err = shell_groups(&mut document, &[group], &ShellParams::with_thickness(0.0)).unwrap_err();
    assert!(err.is_no_op());
    assert!(document.history().is_empty());
    assert_eq!(document.entities().total_face_count(), 1);
    assert_eq!(document.entities().total_group_count(), 1);

    let err = compute_shell(&square(1.0), &ShellParams::with_thickness(0.0)).unwrap_err();
    assert!(matches!(err, ShellError::ZeroThickness));
}

#[test]
fn test_opposite_thickness_mirrors_shell() {
    let source = square(3.0);
    let below = compute_shell(&source, &ShellParams::with_thickness(0.8)).unwrap();
    let above = compute_shell(&source, &ShellParams::with_thickness(-0.8)).unwrap();

    let offset_z = |output: &surface_shell::ShellOutput| {
        let shell = &output.group.entities;
        let (id, _) = shell.faces().next().unwrap();
        let positions = shell.face_positions(id);
        assert!(positions.iter().all(|p| p.z == positions[0].z));
        positions[0].z
    };
    assert_relative_eq!(offset_z(&below), -0.8);
    assert_relative_eq!(offset_z(&above), 0.8);

    let (min_below, max_below) = below.group.entities.bounds().unwrap();
    let (min_above, max_above) = above.group.entities.bounds().unwrap();
    assert_relative_eq!(min_below.z, -max_above.z);
    assert_relative_eq!(max_below.z, -min_above.z);
}

#[test]
fn test_hard_edges_stay_hard() {
    let source = square(2.0);
    let output = compute_shell(&source, &ShellParams::with_thickness(1.0)).unwrap();
    let shell = &output.group.entities;
    assert!(shell.edges().all(|(_, e)| !e.soft && !e.smooth && !e.hidden));
}

#[test]
fn test_soft_interior_edge_is_copied() {
    let mut source = two_squares();
    let a = Point3::new(1.0, 0.0, 0.0);
    let b = Point3::new(1.0, 1.0, 0.0);
    let shared = source
        .common_edge(source.find_vertex(&a).unwrap(), source.find_vertex(&b).unwrap())
        .unwrap();
    {
        let edge = source.edge_mut(shared);
        edge.soft = true;
        edge.smooth = true;
        edge.hidden = true;
    }

    let output = compute_shell(&source, &ShellParams::with_thickness(0.25)).unwrap();
    let shell = &output.group.entities;

    let down = Vector3::z() * 0.25;
    assert_eq!(edge_flags(shell, &(a - down), &(b - down)), (true, true, true));
    // Rim edges of the offset surface are walls' edges and stay hard.
    assert_eq!(
        edge_flags(shell, &Point3::new(0.0, 0.0, -0.25), &Point3::new(1.0, 0.0, -0.25)),
        (false, false, false)
    );
}

#[test]
fn test_border_wall_quad_or_split() {
    let mut entities = Entities::new();
    let quad = add_border_face(
        &mut entities,
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
        ],
    )
    .unwrap();
    assert!(matches!(quad, BorderFace::Quad(_)));
    assert_eq!(entities.face_count(), 1);
    assert!(entities.edges().all(|(_, e)| !e.soft && !e.smooth));

    let mut entities = Entities::new();
    let split = add_border_face(
        &mut entities,
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.5, 1.0),
            Point3::new(0.0, 0.0, 1.0),
        ],
    )
    .unwrap();
    let BorderFace::Split { divider, .. } = split else {
        panic!("expected a split wall, got {:?}", split);
    };
    assert_eq!(entities.face_count(), 2);
    let soft: Vec<_> = entities.edges().filter(|(_, e)| e.soft && e.smooth).collect();
    assert_eq!(soft.len(), 1);
    assert_eq!(soft[0].0, divider);
    assert_eq!(
        entities.edges().filter(|(_, e)| !e.soft && !e.smooth).count(),
        4
    );
}

// =============================================================================
// Rollback
// =============================================================================

#[test]
fn test_fault_in_second_group_rolls_back_everything() {
    let mut root = Entities::new();
    let first = root.add_group(Group::with_entities(square(1.0)));
    let second = root.add_group(Group::with_entities(two_squares()));
    let mut document = Document::with_entities(root);
    let faces_before = document.entities().total_face_count();
    let edges_before = document.entities().total_edge_count();

    // One report per source face: fail on the first face of the second group.
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let callback: ProgressCallback = Box::new(move |_| {
        counter.set(counter.get() + 1);
        counter.get() < 2
    });

    let err = shell_groups_with_progress(
        &mut document,
        &[first, second],
        &ShellParams::with_thickness(0.1),
        Some(&callback),
    )
    .unwrap_err();

    assert_eq!(calls.get(), 2);
    assert!(matches!(err, ShellError::TransactionAborted { .. }));
    assert!(matches!(err.root_cause(), ShellError::Cancelled));

    let entities = document.entities();
    assert_eq!(entities.total_face_count(), faces_before);
    assert_eq!(entities.total_edge_count(), edges_before);
    assert_eq!(entities.total_group_count(), 2);
    assert_eq!(entities.group(first).entities.group_count(), 0);
    assert!(document.history().is_empty());
    assert!(document.active_operation().is_none());

    // The document is usable again afterwards.
    shell_groups(&mut document, &[first, second], &ShellParams::with_thickness(0.1)).unwrap();
    assert_eq!(document.entities().total_group_count(), 4);
    assert_eq!(document.history(), ["Shell 0.1"]);
}
