//! Integration test: proxy identity, lookup and in-place swapping.

use recpool_arena::{ArenaConfig, HeapBytes, HeapDoubles, NativeBytes};
use recpool_core::{PoolError, RecordRead, RecordWrite};
use recpool_pool::{PoolConfig, Proxy};
use recpool_test_utils::{tree_pool, vertex_pool, TreeNode};

#[test]
fn proxies_at_the_same_slot_are_equal() {
    let (mut pool, _) = vertex_pool(PoolConfig::new(4), HeapBytes::new()).unwrap();
    let a = pool.create_new().unwrap();
    let _b = pool.create_new().unwrap();

    let mut p = pool.create_ref();
    let mut q = pool.create_ref();
    pool.get_object(0, &mut p);
    pool.get_object(0, &mut q);
    assert_eq!(p, q);
    assert_eq!(p, a);

    let stale = p;
    pool.get_object(1, &mut p);
    assert_ne!(p, stale);
    pool.get_object(0, &mut p);
    assert_eq!(p, stale);
}

#[test]
fn equality_holds_across_multi_array_boundaries() {
    let config = PoolConfig::new(8).with_arena(ArenaConfig::multi_array(8, 4));
    let (mut pool, _) = vertex_pool(config, NativeBytes::new()).unwrap();
    let vs: Vec<_> = (0..8).map(|_| pool.create_new().unwrap()).collect();
    // Slots 1 and 5 share a byte base but live in different arrays.
    assert_ne!(vs[1], vs[5]);
    let mut p = pool.create_ref();
    assert_eq!(*pool.get_object(5, &mut p), vs[5]);
}

#[test]
fn ref_to_copies_position_within_a_pool() {
    let (mut pool, f) = vertex_pool(PoolConfig::new(4), HeapBytes::new()).unwrap();
    let a = pool.create_new().unwrap();
    pool.record_mut(&a).set(f.degree, 3);
    let mut p = pool.create_ref();
    p.ref_to(&a).unwrap();
    assert_eq!(p, a);
    assert_eq!(pool.record(&p).get(f.degree), 3);
}

#[test]
fn ref_to_refuses_proxies_from_another_pool() {
    let (mut first, _) = vertex_pool(PoolConfig::new(4), HeapBytes::new()).unwrap();
    let (mut second, _) = vertex_pool(PoolConfig::new(4), HeapBytes::new()).unwrap();
    let mine = first.create_new().unwrap();
    let theirs = second.create_new().unwrap();

    let mut p = mine;
    let err = p.ref_to(&theirs).unwrap_err();
    assert_eq!(
        err,
        PoolError::ForeignProxy {
            expected: first.id(),
            found: second.id(),
        }
    );
    assert_eq!(p, mine);
    assert!(matches!(
        first.delete(&theirs),
        Err(PoolError::ForeignProxy { .. })
    ));
    assert_eq!(second.size(), 1);
}

#[test]
fn get_object_if_exists_is_a_soft_lookup() {
    let (mut pool, _) = vertex_pool(PoolConfig::new(4), HeapBytes::new()).unwrap();
    let vs: Vec<_> = (0..3).map(|_| pool.create_new().unwrap()).collect();
    pool.delete(&vs[1]).unwrap();

    let mut p = pool.create_ref();
    assert!(pool.get_object_if_exists(1, &mut p).is_none());
    assert!(pool.get_object_if_exists(3, &mut p).is_none());
    assert!(pool.get_object_if_exists(4000, &mut p).is_none());
    let found = pool.get_object_if_exists(2, &mut p).copied();
    assert_eq!(found, Some(vs[2]));
}

#[test]
fn ref_type_identifies_the_proxy() {
    let (pool, _) = tree_pool(PoolConfig::new(1), HeapBytes::new()).unwrap();
    assert_eq!(pool.ref_type(), std::any::TypeId::of::<TreeNode>());
    assert!(pool.ref_type_name().contains("TreeNode"));
}

// ── Swap ────────────────────────────────────────────────────────────

#[test]
fn swap_exchanges_contents_under_fixed_proxies() {
    let (mut pool, f) = tree_pool(PoolConfig::new(4), HeapDoubles::new()).unwrap();
    let a = pool.create_new().unwrap();
    let b = pool.create_new().unwrap();
    let gone = pool.create_new().unwrap();
    pool.record_mut(&a).set(f.x, 1.0);
    pool.record_mut(&a).set_index(f.left, Some(2));
    pool.record_mut(&b).set(f.x, 2.0);
    pool.delete(&gone).unwrap();
    let size_before = pool.size();

    pool.swap(a.index(), b.index());

    assert_eq!(pool.record(&a).get(f.x), 2.0);
    assert_eq!(pool.record(&a).get_index(f.left), None);
    assert_eq!(pool.record(&b).get(f.x), 1.0);
    assert_eq!(pool.record(&b).get_index(f.left), Some(2));
    assert_eq!(pool.size(), size_before);
    assert_eq!(pool.create_new().unwrap().index(), 2);
}

#[test]
fn swap_across_arrays() {
    let config = PoolConfig::new(6).with_arena(ArenaConfig::multi_array(6, 4));
    let (mut pool, f) = vertex_pool(config, HeapBytes::new()).unwrap();
    let vs: Vec<_> = (0..6).map(|_| pool.create_new().unwrap()).collect();
    pool.record_mut(&vs[0]).set(f.y, -4.0);
    pool.record_mut(&vs[5]).set(f.y, 9.0);
    pool.swap(5, 0);
    assert_eq!(pool.record(&vs[0]).get(f.y), 9.0);
    assert_eq!(pool.record(&vs[5]).get(f.y), -4.0);
}

#[test]
fn adjacent_index_fields_read_as_a_pair() {
    let (mut edges, f) =
        recpool_test_utils::edge_pool(PoolConfig::new(2), NativeBytes::new()).unwrap();
    let e = edges.create_new().unwrap();
    edges.record_mut(&e).set_index(f.source, Some(17));
    assert_eq!(
        edges.record(&e).get_index_pair(f.source, f.target),
        (Some(17), None)
    );
    assert_eq!(
        edges.record(&e).get_index_pair(f.source, f.next_out),
        (Some(17), None)
    );
}
