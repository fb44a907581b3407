//! Fill/empty cycle benchmarks
//!
//! Each iteration links every node of a fixed random batch and then unlinks
//! all of them again, either in input order or by repeatedly removing the top.
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench ordered_perf
//!
//! # Only the pairing heap at 1000 nodes
//! cargo bench --bench ordered_perf -- 'pairing.*/1000'
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_cartesian_heaps::cartesian::{CartesianTree, OrderedNode};
use rust_cartesian_heaps::pairing::{PairingHeap, PairingNode};

const SEED: u64 = 3141592653589793238;
const SIZES: [usize; 3] = [100, 1_000, 10_000];

fn random_keys(len: usize) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..len).map(|_| rng.gen()).collect()
}

fn cartesian_input_order(tree: &mut CartesianTree, nodes: &mut Vec<OrderedNode<u32>>) {
    for id in 0..nodes.len() {
        tree.insert(nodes, id);
    }
    for id in 0..nodes.len() {
        tree.remove(nodes, id);
    }
}

fn cartesian_by_top(tree: &mut CartesianTree, nodes: &mut Vec<OrderedNode<u32>>) -> u64 {
    for id in 0..nodes.len() {
        tree.insert(nodes, id);
    }
    let mut sum = 0u64;
    while let Some(top) = tree.top() {
        sum += u64::from(*nodes[top].key());
        tree.remove(nodes, top);
    }
    sum
}

fn pairing_input_order(heap: &mut PairingHeap, nodes: &mut Vec<PairingNode<u32>>) {
    for id in 0..nodes.len() {
        heap.insert(nodes, id);
    }
    for id in 0..nodes.len() {
        heap.remove(nodes, id);
    }
}

fn pairing_by_top(heap: &mut PairingHeap, nodes: &mut Vec<PairingNode<u32>>) -> u64 {
    for id in 0..nodes.len() {
        heap.insert(nodes, id);
    }
    let mut sum = 0u64;
    while let Some(top) = heap.pop(nodes) {
        sum += u64::from(*nodes[top].key());
    }
    sum
}

fn benchmark_fill_and_empty(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_and_empty");

    for size in SIZES {
        let keys = random_keys(size);

        let mut ordered: Vec<_> = keys.iter().copied().map(OrderedNode::new).collect();
        let mut tree = CartesianTree::new();
        group.bench_function(BenchmarkId::new("cartesian_input_order", size), |b| {
            b.iter(|| cartesian_input_order(&mut tree, black_box(&mut ordered)))
        });
        group.bench_function(BenchmarkId::new("cartesian_by_top", size), |b| {
            b.iter(|| black_box(cartesian_by_top(&mut tree, &mut ordered)))
        });

        let mut pairing: Vec<_> = keys.iter().copied().map(PairingNode::new).collect();
        let mut heap = PairingHeap::new();
        group.bench_function(BenchmarkId::new("pairing_input_order", size), |b| {
            b.iter(|| pairing_input_order(&mut heap, black_box(&mut pairing)))
        });
        group.bench_function(BenchmarkId::new("pairing_by_top", size), |b| {
            b.iter(|| black_box(pairing_by_top(&mut heap, &mut pairing)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_fill_and_empty);
criterion_main!(benches);
