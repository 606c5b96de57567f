#![allow(dead_code)]
use shared::*;

use criterion::{criterion_group, Criterion};
use grit::rtree::RTree;
use std::hint::black_box;

fn build_tree(count: usize) -> RTree {
    let rects = generate_rects(count, 0xCAFE);
    let mut tree = RTree::new();
    for rect in rects {
        tree.insert(rect.bottom_left, rect.top_right)
            .expect("generated rectangles are well-formed");
    }
    tree
}

fn bench_window_search(cc: &mut Criterion) {
    let tree = build_tree(BENCH_NUM_INSERT);
    let windows = generate_windows(BENCH_NUM_QUERIES, 0xFEED);
    cc.bench_function("rtree_window_search", |b| {
        b.iter(|| {
            let mut matches = 0usize;
            for window in &windows {
                tree.search(black_box(window), |_| matches += 1);
            }
            matches
        })
    });
}

fn bench_range_search_collect(cc: &mut Criterion) {
    let tree = build_tree(BENCH_NUM_INSERT);
    let windows = generate_windows(BENCH_NUM_QUERIES, 0xFEED);
    cc.bench_function("rtree_range_search_collect", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for window in &windows {
                total += tree.range_search(black_box(window)).len();
            }
            total
        })
    });
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = bench_window_search, bench_range_search_collect
}
