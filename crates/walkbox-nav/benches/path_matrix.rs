use criterion::{black_box, criterion_group, criterion_main, Criterion};
use walkbox_nav::{
    BoxCoords, BoxId, BoxStore, CompileScratch, CostMatrix, PathMatrix, Point, Room, ScanOrder, WalkBox,
};

fn grid_store(width: i32, height: i32, cell: i32) -> BoxStore {
    let mut boxes = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let (x0, y0) = (x * cell, y * cell);
            boxes.push(WalkBox::new(BoxCoords::rect(x0, y0, x0 + cell, y0 + cell)));
        }
    }
    BoxStore::new(boxes, Vec::new()).expect("valid store")
}

fn bench_path_matrix(c: &mut Criterion) {
    let store = grid_store(12, 8, 40);
    let costs = CostMatrix::build(&store);

    let mut group = c.benchmark_group("walkbox-nav/matrix");

    group.bench_function("compile_alloc", |b| {
        b.iter(|| {
            let matrix = PathMatrix::compile(&store);
            black_box(matrix.len());
        })
    });

    let mut scratch = CompileScratch::default();
    group.bench_function("compile_reuse_scratch", |b| {
        b.iter(|| {
            let matrix = PathMatrix::compile_with(&store, &costs, &mut scratch);
            black_box(matrix.len());
        })
    });

    let room = Room::new(store.clone());
    let last = BoxId(store.len() as u16 - 1);
    group.bench_function("next_hop", |b| {
        b.iter(|| black_box(room.matrix().next_hop(BoxId(0), black_box(last))))
    });

    group.bench_function("find_closest_thresholded", |b| {
        b.iter(|| {
            black_box(room.find_closest_box_and_point(
                black_box(Point::new(700, 100)),
                ScanOrder::Thresholded,
                false,
            ))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_path_matrix);
criterion_main!(benches);
