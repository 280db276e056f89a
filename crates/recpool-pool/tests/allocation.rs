//! Integration test: slot allocation, reuse order, growth and slot reset
//! through the public pool API.

use std::sync::Arc;

use recpool_arena::{ArenaConfig, FreePolicy, Growth, HeapBytes, HeapDoubles, Medium, NativeBytes};
use recpool_core::{RecordRead, RecordWrite};
use recpool_pool::{PoolConfig, Proxy};
use recpool_test_utils::{
    edge_pool, vertex_pool, PropertyEvent, RecordingPropertyMap, Vertex, VertexFields, VertexPool,
};

fn small_vertices<M: Medium>(medium: M) -> (VertexPool<M>, VertexFields) {
    vertex_pool(PoolConfig::new(4), medium).unwrap()
}

fn create_n<M: Medium>(pool: &mut VertexPool<M>, n: usize) -> Vec<Vertex> {
    (0..n).map(|_| pool.create_new().unwrap()).collect()
}

// ── Reuse order ─────────────────────────────────────────────────────

#[test]
fn freed_slot_is_handed_out_again() {
    let (mut pool, _) = small_vertices(HeapBytes::new());
    let vs = create_n(&mut pool, 6);
    pool.delete(&vs[3]).unwrap();
    let again = pool.create_new().unwrap();
    assert_eq!(pool.get_id(&again), 3);
    assert_eq!(pool.allocated_size(), 6);
}

#[test]
fn reuse_is_last_in_first_out() {
    let (mut pool, _) = small_vertices(NativeBytes::new());
    let vs = create_n(&mut pool, 6);
    pool.delete(&vs[1]).unwrap();
    pool.delete(&vs[4]).unwrap();
    assert_eq!(pool.create_new().unwrap().index(), 4);
    assert_eq!(pool.create_new().unwrap().index(), 1);
    assert_eq!(pool.create_new().unwrap().index(), 6);
    assert_eq!(pool.size(), 7);
}

// ── Growth ──────────────────────────────────────────────────────────

fn growth_preserves_fields<M: Medium>(config: PoolConfig, medium: M) {
    let (mut pool, f) = vertex_pool(config, medium).unwrap();
    let initial = pool.capacity();
    let vs = create_n(&mut pool, 500);
    for (i, v) in vs.iter().enumerate() {
        let mut rec = pool.record_mut(v);
        rec.set(f.x, i as f64 * 1.5);
        rec.set(f.y, -(i as f64));
        rec.set(f.degree, i as i32);
    }
    // Growth while values are live.
    let more = create_n(&mut pool, 1500);
    assert!(pool.capacity() > initial);
    for (i, v) in vs.iter().enumerate() {
        let rec = pool.record(v);
        assert_eq!(rec.get(f.x), i as f64 * 1.5);
        assert_eq!(rec.get(f.y), -(i as f64));
        assert_eq!(rec.get(f.degree), i as i32);
    }
    assert_eq!(more.last().map(Vertex::index), Some(1999));
}

#[test]
fn single_array_growth_preserves_fields() {
    growth_preserves_fields(PoolConfig::new(2), HeapBytes::new());
    growth_preserves_fields(PoolConfig::new(2), NativeBytes::new());
    growth_preserves_fields(PoolConfig::new(2), HeapDoubles::new());
}

#[test]
fn multi_array_growth_preserves_fields() {
    let config = PoolConfig::new(3).with_arena(ArenaConfig::multi_array(3, 64));
    growth_preserves_fields(config.clone(), HeapBytes::new());
    growth_preserves_fields(config.clone(), NativeBytes::new());
    growth_preserves_fields(config, HeapDoubles::new());
}

#[test]
fn multi_array_passes_a_single_array_ceiling() {
    // One array of this medium holds 8 vertices; the pool holds more.
    let medium = HeapBytes::with_byte_limit(8 * 24);
    let config = PoolConfig::new(8).with_arena(ArenaConfig::new(8).with_growth(Growth::MultiArray {
        elements_per_array: None,
        max_arrays: None,
    }));
    let (mut pool, f) = vertex_pool(config, medium).unwrap();
    let vs = create_n(&mut pool, 40);
    for (i, v) in vs.iter().enumerate() {
        pool.record_mut(v).set(f.degree, i as i32 * 7);
    }
    assert_eq!(pool.arena().array_count(), 5);
    for (i, v) in vs.iter().enumerate() {
        assert_eq!(pool.record(v).get(f.degree), i as i32 * 7);
    }
}

#[test]
fn single_array_ceiling_is_reported() {
    let medium = HeapBytes::with_byte_limit(8 * 24);
    let (mut pool, _) = vertex_pool(PoolConfig::new(8), medium).unwrap();
    create_n(&mut pool, 8);
    let err = pool.create_new().unwrap_err();
    assert!(err.to_string().contains("capacity exceeded"), "{err}");
    assert_eq!(pool.size(), 8);
}

#[test]
fn initial_capacity_past_ceiling_is_a_config_error() {
    let medium = HeapBytes::with_byte_limit(8 * 24);
    assert!(vertex_pool(PoolConfig::new(9), medium).is_err());
}

// ── Uninitialized-state reset ───────────────────────────────────────

#[test]
fn reused_slot_links_are_reset_before_the_caller_sees_them() {
    for policy in [
        FreePolicy::Unchecked,
        FreePolicy::SentinelCheck,
        FreePolicy::FreeListScan,
    ] {
        let config = PoolConfig::new(4).with_arena(ArenaConfig::new(4).with_free_policy(policy));
        let (mut edges, f) = edge_pool(config, HeapBytes::new()).unwrap();
        let a = edges.create_new().unwrap();
        let b = edges.create_new().unwrap();
        {
            let mut rec = edges.record_mut(&b);
            rec.set_index(f.source, Some(a.index()));
            rec.set_index(f.target, Some(a.index()));
            rec.set_index(f.next_out, Some(0));
        }
        edges.delete(&b).unwrap();

        let mut reused = edges.create_ref();
        edges.create(&mut reused).unwrap();
        assert_eq!(reused, b, "{policy:?}");
        let rec = edges.record(&reused);
        assert_eq!(rec.get_index(f.source), None, "{policy:?}");
        assert_eq!(rec.get_index(f.target), None, "{policy:?}");
        assert_eq!(rec.get_index(f.next_out), None, "{policy:?}");
    }
}

#[test]
fn reset_runs_before_property_maps_hear_of_the_slot() {
    let (mut pool, f) = small_vertices(HeapBytes::new());
    let map = Arc::new(RecordingPropertyMap::new());
    pool.register_property_map(map.clone());
    let v = pool.create_new().unwrap();
    assert_eq!(pool.record(&v).get_index(f.first_edge), None);
    assert_eq!(map.created(), vec![0]);
}

// ── Property registry ───────────────────────────────────────────────

#[test]
fn lifecycle_events_reach_registered_maps() {
    let (mut pool, _) = small_vertices(HeapBytes::new());
    let map = Arc::new(RecordingPropertyMap::new());
    let id = pool.register_property_map(map.clone());
    let vs = create_n(&mut pool, 3);
    pool.delete(&vs[1]).unwrap();
    assert_eq!(
        map.events(),
        vec![
            PropertyEvent::Created(0),
            PropertyEvent::Created(1),
            PropertyEvent::Created(2),
            PropertyEvent::Deleted(1),
        ]
    );

    pool.unregister_property_map(id).unwrap();
    pool.create_new().unwrap();
    assert_eq!(map.created(), vec![0, 1, 2]);
}

#[test]
fn pause_guard_brackets_batch_work() {
    let (mut pool, f) = small_vertices(HeapBytes::new());
    let map = Arc::new(RecordingPropertyMap::new());
    pool.register_property_map(map.clone());
    {
        let mut batch = pool.pause_listeners();
        assert!(map.is_paused());
        for i in 0..3 {
            let v = batch.create_new().unwrap();
            batch.record_mut(&v).set(f.degree, i);
        }
        {
            let nested = batch.pause_listeners();
            assert!(nested.listeners_paused());
        }
        assert!(map.is_paused());
    }
    assert!(!map.is_paused());
    assert!(!pool.listeners_paused());
    assert_eq!(
        map.events(),
        vec![
            PropertyEvent::Paused,
            PropertyEvent::Created(0),
            PropertyEvent::Created(1),
            PropertyEvent::Created(2),
            PropertyEvent::Resumed,
        ]
    );
}

#[test]
fn map_registered_mid_pause_is_resumed_with_the_rest() {
    let (mut pool, _) = small_vertices(HeapBytes::new());
    let early = Arc::new(RecordingPropertyMap::new());
    let late = Arc::new(RecordingPropertyMap::new());
    pool.register_property_map(early.clone());
    let mut guard = pool.pause_listeners();
    guard.register_property_map(late.clone());
    assert!(late.is_paused());
    guard.resume();
    assert!(!early.is_paused());
    assert!(!late.is_paused());
}
