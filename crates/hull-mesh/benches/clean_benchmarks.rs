//! Benchmarks for mesh cleanup and validation.
//!
//! Run with: cargo bench -p hull-mesh

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use hull_mesh::{Mesh, Vertex, clean_mesh, validate_mesh};

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// A subdivided height-field sheet of `n x n` quads, emitted as a triangle
/// soup so that cleanup has real merging work to do.
fn create_soup_sheet(n: usize) -> Mesh {
    let mut mesh = Mesh::with_capacity(n * n * 6, n * n * 2);
    let point = |i: usize, j: usize| {
        let x = i as f64 / n as f64;
        let y = j as f64 / n as f64;
        Vertex::from_coords(x, y, (x * 6.0).sin() * (y * 6.0).cos() * 0.1)
    };

    for i in 0..n {
        for j in 0..n {
            for (a, b, c) in [
                ((i, j), (i + 1, j), (i + 1, j + 1)),
                ((i, j), (i + 1, j + 1), (i, j + 1)),
            ] {
                let base = mesh.vertices.len() as u32;
                mesh.vertices.push(point(a.0, a.1));
                mesh.vertices.push(point(b.0, b.1));
                mesh.vertices.push(point(c.0, c.1));
                mesh.faces.push([base, base + 1, base + 2]);
            }
        }
    }
    mesh
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean_mesh");

    for n in [16, 64, 128] {
        let mesh = create_soup_sheet(n);
        group.throughput(Throughput::Elements(mesh.face_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &mesh, |b, mesh| {
            b.iter(|| {
                let mut m = mesh.clone();
                clean_mesh(black_box(&mut m)).unwrap()
            })
        });
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_mesh");

    for n in [64, 128] {
        let mut mesh = create_soup_sheet(n);
        clean_mesh(&mut mesh).unwrap();
        group.throughput(Throughput::Elements(mesh.face_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &mesh, |b, mesh| {
            b.iter(|| validate_mesh(black_box(mesh)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_clean, bench_validate);
criterion_main!(benches);
