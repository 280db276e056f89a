//! Benchmark workloads and utilities for recpool.
//!
//! - [`Lcg`]: a small deterministic generator for reproducible inputs
//! - [`select_nth`]: in-place quickselect over pool slots using `swap`
//! - [`kd_partition`]: recursive median split, the order a k-d tree build
//!   leaves its nodes in

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::ops::Range;

use recpool_arena::Medium;
use recpool_core::{Field, RecordRead};
use recpool_pool::{ObjectPool, Proxy, ProxyFactory};

/// 64-bit linear congruential generator (Knuth's MMIX constants).
///
/// Not suitable for anything but reproducible benchmark inputs.
#[derive(Clone, Debug)]
pub struct Lcg(u64);

impl Lcg {
    /// Seeded generator.
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Next raw value.
    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    /// Uniform value in `[0, 1)`, from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Reorder slots `range` of `pool` so that slot `k` holds the value it
/// would hold if the range were sorted by `key`, with smaller keys before
/// it and larger or equal keys after.
///
/// Every slot in `range` must be live. Slot contents move; proxies keep
/// naming positions, not records. Does nothing if `k` is outside `range`.
pub fn select_nth<P, F, M>(
    pool: &mut ObjectPool<P, F, M>,
    range: Range<usize>,
    k: usize,
    key: Field<f64>,
) where
    P: Proxy,
    F: ProxyFactory<P>,
    M: Medium,
{
    if !range.contains(&k) {
        return;
    }
    let (mut lo, mut hi) = (range.start, range.end - 1);
    while lo < hi {
        let pivot = partition(pool, lo, hi, key);
        match k.cmp(&pivot) {
            std::cmp::Ordering::Equal => return,
            std::cmp::Ordering::Less => hi = pivot - 1,
            std::cmp::Ordering::Greater => lo = pivot + 1,
        }
    }
}

/// Lomuto partition of `lo..=hi` around the middle slot's key. Returns the
/// pivot's final position.
fn partition<P, F, M>(pool: &mut ObjectPool<P, F, M>, lo: usize, hi: usize, key: Field<f64>) -> usize
where
    P: Proxy,
    F: ProxyFactory<P>,
    M: Medium,
{
    pool.swap(lo + (hi - lo) / 2, hi);
    let pivot = pool.record_at(hi).get(key);
    let mut store = lo;
    for i in lo..hi {
        if pool.record_at(i).get(key) < pivot {
            pool.swap(i, store);
            store += 1;
        }
    }
    pool.swap(store, hi);
    store
}

/// Recursively split `range` at its median, cycling through `axes` by
/// depth. Afterwards each median slot separates its subrange along that
/// level's axis.
pub fn kd_partition<P, F, M>(
    pool: &mut ObjectPool<P, F, M>,
    range: Range<usize>,
    axes: &[Field<f64>],
) where
    P: Proxy,
    F: ProxyFactory<P>,
    M: Medium,
{
    kd_partition_at(pool, range, axes, 0);
}

fn kd_partition_at<P, F, M>(
    pool: &mut ObjectPool<P, F, M>,
    range: Range<usize>,
    axes: &[Field<f64>],
    depth: usize,
) where
    P: Proxy,
    F: ProxyFactory<P>,
    M: Medium,
{
    if range.len() < 2 || axes.is_empty() {
        return;
    }
    let mid = range.start + range.len() / 2;
    select_nth(pool, range.clone(), mid, axes[depth % axes.len()]);
    kd_partition_at(pool, range.start..mid, axes, depth + 1);
    kd_partition_at(pool, mid + 1..range.end, axes, depth + 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use recpool_arena::{ArenaConfig, HeapBytes, HeapDoubles};
    use recpool_core::RecordWrite;
    use recpool_pool::PoolConfig;
    use recpool_test_utils::{tree_pool, TreeNodeFields, TreePool};

    fn filled<M: Medium>(config: PoolConfig, medium: M, xs: &[f64]) -> (TreePool<M>, TreeNodeFields) {
        let (mut pool, f) = tree_pool(config, medium).unwrap();
        for &x in xs {
            let n = pool.create_new().unwrap();
            let mut rec = pool.record_mut(&n);
            rec.set(f.x, x);
            rec.set(f.y, -x);
        }
        (pool, f)
    }

    fn keys<M: Medium>(pool: &TreePool<M>, key: Field<f64>) -> Vec<f64> {
        pool.live_indices()
            .map(|i| pool.record_at(i).get(key))
            .collect()
    }

    #[test]
    fn lcg_is_deterministic() {
        let mut a = Lcg::new(7);
        let mut b = Lcg::new(7);
        for _ in 0..16 {
            let v = a.next_f64();
            assert_eq!(v, b.next_f64());
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn select_nth_places_the_median() {
        let xs = [5.0, 1.0, 9.0, 3.0, 7.0, 2.0, 8.0];
        let (mut pool, f) = filled(PoolConfig::new(8), HeapDoubles::new(), &xs);
        select_nth(&mut pool, 0..7, 3, f.x);
        let after = keys(&pool, f.x);
        assert_eq!(after[3], 5.0);
        assert!(after[..3].iter().all(|&x| x < 5.0));
        assert!(after[4..].iter().all(|&x| x >= 5.0));
        // Whole records move, not just the key.
        for i in 0..7 {
            let rec = pool.record_at(i);
            assert_eq!(rec.get(f.y), -rec.get(f.x));
        }
    }

    #[test]
    fn select_nth_outside_range_is_a_no_op() {
        let xs = [3.0, 1.0, 2.0];
        let (mut pool, f) = filled(PoolConfig::new(4), HeapBytes::new(), &xs);
        select_nth(&mut pool, 0..2, 2, f.x);
        assert_eq!(keys(&pool, f.x), xs.to_vec());
    }

    #[test]
    fn kd_partition_splits_across_arrays() {
        let mut rng = Lcg::new(42);
        let xs: Vec<f64> = (0..33).map(|_| rng.next_f64()).collect();
        let config = PoolConfig::new(8).with_arena(ArenaConfig::multi_array(8, 8));
        let (mut pool, f) = filled(config, HeapBytes::new(), &xs);
        assert!(pool.arena().array_count() > 1);

        kd_partition(&mut pool, 0..33, &[f.x, f.y]);
        let after = keys(&pool, f.x);
        let median = after[16];
        assert!(after[..16].iter().all(|&x| x < median));
        assert!(after[17..].iter().all(|&x| x >= median));

        let mut sorted = after.clone();
        sorted.sort_by(f64::total_cmp);
        let mut expected = xs.clone();
        expected.sort_by(f64::total_cmp);
        assert_eq!(sorted, expected);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn select_nth_matches_sorting(
                xs in prop::collection::vec(-1.0e6f64..1.0e6, 1..64),
                k_seed in any::<usize>(),
            ) {
                let k = k_seed % xs.len();
                let (mut pool, f) = filled(PoolConfig::new(xs.len()), HeapDoubles::new(), &xs);
                select_nth(&mut pool, 0..xs.len(), k, f.x);
                let mut sorted = xs.clone();
                sorted.sort_by(f64::total_cmp);
                prop_assert_eq!(pool.record_at(k).get(f.x), sorted[k]);
            }
        }
    }
}
