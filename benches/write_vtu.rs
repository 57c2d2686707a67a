use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

use fem_vtk::prelude::*;

/// structured `n` by `n` grid of quads with random nodal coordinates and a random
/// temperature field
fn quad_grid(n: usize) -> Model {
    let nodes_per_side = n + 1;
    let node_count = nodes_per_side * nodes_per_side;

    let coords: Array2<f64> = Array2::random((node_count, 2), Uniform::new(0., 10.));
    let node_coords = coords.outer_iter().map(|row| row.to_vec()).collect();
    let node_tags = (1..=node_count as i64).collect();

    let mut connectivity = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            let first = (j * nodes_per_side + i + 1) as i64;
            let above = first + nodes_per_side as i64;
            connectivity.push(vec![first, first + 1, above + 1, above]);
        }
    }

    let element_tags = (1..=(n * n) as i64).collect();
    let element_types = vec![9; n * n];

    let mut model = Model::from_mesh(
        element_tags,
        connectivity,
        element_types,
        node_tags,
        node_coords,
    )
    .unwrap();

    let temperature = Array2::random((node_count, 1), Uniform::new(0., 100.));
    model
        .add_scalar_field(
            "temperature",
            FieldPosition::Nodes,
            temperature.iter().copied().collect(),
        )
        .unwrap();

    model
}

fn write_vtu_bench(c: &mut Criterion) {
    let model = quad_grid(200);

    c.bench_function("write appended 200x200", |b| {
        b.iter(|| {
            let mut sink = Vec::new();
            BinaryWriter::default()
                .write_to(black_box(&model), &mut sink)
                .unwrap();
            sink
        })
    });

    c.bench_function("write base64 200x200", |b| {
        b.iter(|| {
            let mut sink = Vec::new();
            Base64Writer::default()
                .write_to(black_box(&model), &mut sink)
                .unwrap();
            sink
        })
    });

    c.bench_function("write ascii 200x200", |b| {
        b.iter(|| {
            let mut sink = Vec::new();
            AsciiWriter::default()
                .write_to(black_box(&model), &mut sink)
                .unwrap();
            sink
        })
    });
}

criterion_group!(benches, write_vtu_bench);
criterion_main!(benches);
