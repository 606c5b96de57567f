#![allow(dead_code)]
use shared::*;

use criterion::{criterion_group, Criterion};
use grit::rtree::RTree;
use std::hint::black_box;

fn insert_points(count: usize) -> RTree {
    let points = generate_points(count, 0xA11CE);
    let mut tree = RTree::new();
    for point in points {
        tree.insert(point, point).expect("points are well-formed");
    }
    tree
}

fn insert_rects(count: usize) -> RTree {
    let rects = generate_rects(count, 0xB0B);
    let mut tree = RTree::new();
    for rect in rects {
        tree.insert(rect.bottom_left, rect.top_right)
            .expect("generated rectangles are well-formed");
    }
    tree
}

fn bench_insert_points(cc: &mut Criterion) {
    cc.bench_function("rtree_insert_points", |b| {
        b.iter(|| insert_points(black_box(BENCH_NUM_INSERT)))
    });
}

fn bench_insert_rects(cc: &mut Criterion) {
    cc.bench_function("rtree_insert_rects", |b| {
        b.iter(|| insert_rects(black_box(BENCH_NUM_INSERT)))
    });
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = bench_insert_points, bench_insert_rects
}
