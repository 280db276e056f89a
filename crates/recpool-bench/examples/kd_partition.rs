//! Build the node order of a 2-D k-d tree inside a pool.
//!
//! Demonstrates: declare a layout → fill a multi-array pool on the double
//! medium → partition nodes in place with `swap` → link children through
//! index fields → walk the tree with a single recycled proxy.

use std::ops::Range;

use recpool_arena::{ArenaConfig, HeapDoubles};
use recpool_bench::{kd_partition, Lcg};
use recpool_core::{RecordRead, RecordWrite};
use recpool_pool::PoolConfig;
use recpool_test_utils::{tree_pool, TreeNodeFields, TreePool};

const POINTS: usize = 1000;

/// Link each median to the medians of its two halves. Returns the root.
fn link(pool: &mut TreePool<HeapDoubles>, f: &TreeNodeFields, range: Range<usize>, depth: i8) -> Option<usize> {
    if range.is_empty() {
        return None;
    }
    let mid = range.start + range.len() / 2;
    let left = link(pool, f, range.start..mid, depth + 1);
    let right = link(pool, f, mid + 1..range.end, depth + 1);
    let mut rec = pool.record_at_mut(mid);
    rec.set_index(f.left, left);
    rec.set_index(f.right, right);
    rec.set(f.split_dim, depth % 2);
    Some(mid)
}

fn depth(pool: &TreePool<HeapDoubles>, f: &TreeNodeFields, node: Option<usize>) -> usize {
    let Some(i) = node else { return 0 };
    let rec = pool.record_at(i);
    let (left, right) = rec.get_index_pair(f.left, f.right);
    1 + depth(pool, f, left).max(depth(pool, f, right))
}

fn main() {
    println!("=== recpool k-d partition example ===\n");

    let config = PoolConfig::new(256).with_arena(ArenaConfig::multi_array(256, 256));
    let (mut pool, f) = tree_pool(config, HeapDoubles::new()).unwrap();

    let mut rng = Lcg::new(7);
    for _ in 0..POINTS {
        let node = pool.create_new().unwrap();
        let mut rec = pool.record_mut(&node);
        rec.set(f.x, rng.next_f64() * 100.0);
        rec.set(f.y, rng.next_f64() * 100.0);
        pool.release_ref(node);
    }
    println!(
        "{} nodes in {} arrays ({} bytes)",
        pool.size(),
        pool.arena().array_count(),
        pool.arena().memory_bytes()
    );

    kd_partition(&mut pool, 0..POINTS, &[f.x, f.y]);
    let root = link(&mut pool, &f, 0..POINTS, 0);
    println!("tree depth: {}", depth(&pool, &f, root));

    if let Some(root) = root {
        let rec = pool.record_at(root);
        println!(
            "root splits x at {:.2} (node {root}, y = {:.2})",
            rec.get(f.x),
            rec.get(f.y)
        );
    }

    // Count nodes left of the root along x with one proxy.
    let split = root.map_or(0.0, |r| pool.record_at(r).get(f.x));
    let mut cursor = pool.create_ref();
    let mut left_of_root = 0;
    pool.for_each_live(&mut cursor, |node| {
        if pool.record(node).get(f.x) < split {
            left_of_root += 1;
        }
    });
    pool.release_ref(cursor);
    println!("{left_of_root} nodes lie left of the root split");
}
