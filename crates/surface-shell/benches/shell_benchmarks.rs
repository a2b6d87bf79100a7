//! Benchmarks for surface-shell operations.
//!
//! Run with: cargo bench -p surface-shell
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p surface-shell -- --save-baseline main
//! 2. After changes: cargo bench -p surface-shell -- --baseline main

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_graph::{Affine3, Entities, Point3};
use surface_shell::{PreviewMesh, ShellParams, compute_shell, offset_polygons, offset_vertex};

// =============================================================================
// Test Surface Generation
// =============================================================================

/// An open sheet of `n` x `n` unit quads, folded along every column line
/// when `corrugated` is set.
fn create_sheet(n: usize, corrugated: bool) -> Entities {
    let height = |i: usize| if corrugated && i % 2 == 1 { 0.5 } else { 0.0 };
    let mut entities = Entities::new();
    for i in 0..n {
        for j in 0..n {
            let (x0, x1) = (i as f64, (i + 1) as f64);
            let (y0, y1) = (j as f64, (j + 1) as f64);
            entities
                .add_face(&[
                    Point3::new(x0, y0, height(i)),
                    Point3::new(x1, y0, height(i + 1)),
                    Point3::new(x1, y1, height(i + 1)),
                    Point3::new(x0, y1, height(i)),
                ])
                .expect("sheet quads are planar");
        }
    }
    entities
}

/// A closed box of `n` x `n` quads per side.
fn create_box(n: usize) -> Entities {
    let mut entities = Entities::new();
    let s = n as f64;
    for i in 0..n {
        for j in 0..n {
            let (a0, a1) = (i as f64, (i + 1) as f64);
            let (b0, b1) = (j as f64, (j + 1) as f64);
            let quads = [
                // bottom, top
                [[a0, b0, 0.0], [a0, b1, 0.0], [a1, b1, 0.0], [a1, b0, 0.0]],
                [[a0, b0, s], [a1, b0, s], [a1, b1, s], [a0, b1, s]],
                // front, back
                [[a0, 0.0, b0], [a1, 0.0, b0], [a1, 0.0, b1], [a0, 0.0, b1]],
                [[a0, s, b0], [a0, s, b1], [a1, s, b1], [a1, s, b0]],
                // left, right
                [[0.0, a0, b0], [0.0, a0, b1], [0.0, a1, b1], [0.0, a1, b0]],
                [[s, a0, b0], [s, a1, b0], [s, a1, b1], [s, a0, b1]],
            ];
            for quad in quads {
                let points = quad.map(|[x, y, z]| Point3::new(x, y, z));
                entities.add_face(&points).expect("box quads are planar");
            }
        }
    }
    entities
}

// =============================================================================
// Shell Benchmarks
// =============================================================================

fn bench_compute_shell(c: &mut Criterion) {
    let mut group = c.benchmark_group("ComputeShell");
    group.sample_size(20);

    let test_cases = [
        ("flat_sheet_16", create_sheet(16, false)),
        ("corrugated_sheet_16", create_sheet(16, true)),
        ("corrugated_sheet_32", create_sheet(32, true)),
        ("box_8", create_box(8)),
    ];

    for (name, entities) in &test_cases {
        group.throughput(Throughput::Elements(entities.face_count() as u64));
        let params = ShellParams::with_thickness(0.1);

        group.bench_with_input(BenchmarkId::new("shell", name), entities, |b, entities| {
            b.iter(|| compute_shell(black_box(entities), black_box(&params)))
        });
    }

    group.finish();
}

fn bench_offset_vertex(c: &mut Criterion) {
    let mut group = c.benchmark_group("OffsetVertex");

    let flat = create_sheet(4, false);
    let sheet = create_sheet(4, true);
    let boxed = create_box(2);
    let cases = [
        ("single_face", &sheet, Point3::new(0.0, 0.0, 0.0)),
        ("coplanar", &flat, Point3::new(2.0, 2.0, 0.0)),
        ("crease", &sheet, Point3::new(1.0, 2.0, 0.5)),
        ("corner", &boxed, Point3::new(0.0, 0.0, 0.0)),
    ];

    for (name, entities, position) in cases {
        let vertex = entities.find_vertex(&position).expect("vertex exists");
        group.bench_function(name, |b| {
            b.iter(|| offset_vertex(black_box(entities), black_box(vertex), black_box(0.1)))
        });
    }

    group.finish();
}

fn bench_preview(c: &mut Criterion) {
    let mut group = c.benchmark_group("Preview");

    let meshes = [PreviewMesh::new(create_sheet(32, true), Affine3::identity())];
    group.throughput(Throughput::Elements(meshes[0].face_count() as u64));
    group.bench_function("corrugated_sheet_32", |b| {
        b.iter(|| offset_polygons(black_box(&meshes), black_box(0.1)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_compute_shell,
    bench_offset_vertex,
    bench_preview
);
criterion_main!(benches);
