//! Integration test: checked versus unchecked field access.
//!
//! Debug builds (and any build with the `debug-checks` feature) reject
//! accesses that leave the record, frees outside the allocated range and
//! double frees. Plain release builds skip those checks.

use recpool_arena::HeapBytes;
use recpool_core::RecordRead;
#[cfg(any(debug_assertions, feature = "debug-checks"))]
use recpool_core::{ArenaError, PoolError};
use recpool_pool::PoolConfig;
use recpool_test_utils::vertex_pool;

#[test]
#[cfg(any(debug_assertions, feature = "debug-checks"))]
#[should_panic(expected = "field access out of bounds")]
fn checked_read_past_the_record_panics() {
    let (mut pool, _) = vertex_pool(PoolConfig::new(4), HeapBytes::new()).unwrap();
    let v = pool.create_new().unwrap();
    let _w = pool.create_new().unwrap();
    // Vertex records are 24 bytes.
    let _ = pool.record(&v).get_i64(20);
}

#[test]
#[cfg(any(debug_assertions, feature = "debug-checks"))]
#[should_panic(expected = "field access out of bounds")]
fn checked_lookup_past_the_array_panics() {
    let (mut pool, _) = vertex_pool(PoolConfig::new(2), HeapBytes::new()).unwrap();
    pool.create_new().unwrap();
    let mut p = pool.create_ref();
    pool.get_object(2, &mut p);
    let _ = pool.record(&p).get_i32(0);
}

#[test]
#[cfg(any(debug_assertions, feature = "debug-checks"))]
fn checked_double_free_is_an_error() {
    let (mut pool, _) = vertex_pool(PoolConfig::new(4), HeapBytes::new()).unwrap();
    let v = pool.create_new().unwrap();
    pool.create_new().unwrap();
    pool.delete(&v).unwrap();
    assert_eq!(
        pool.delete(&v),
        Err(PoolError::Arena(ArenaError::DoubleFree { index: 0 }))
    );
    assert_eq!(pool.size(), 1);
}

#[test]
#[cfg(any(debug_assertions, feature = "debug-checks"))]
fn rejected_free_is_not_announced() {
    use recpool_test_utils::{PropertyEvent, RecordingPropertyMap};
    use std::sync::Arc;

    let (mut pool, _) = vertex_pool(PoolConfig::new(4), HeapBytes::new()).unwrap();
    let map = Arc::new(RecordingPropertyMap::new());
    pool.register_property_map(map.clone());
    let v = pool.create_new().unwrap();
    pool.delete(&v).unwrap();
    assert!(pool.delete(&v).is_err());
    assert_eq!(
        map.events(),
        vec![PropertyEvent::Created(0), PropertyEvent::Deleted(0)]
    );
}

#[test]
#[cfg(any(debug_assertions, feature = "debug-checks"))]
fn checked_free_of_unallocated_index_is_an_error() {
    let (mut pool, _) = vertex_pool(PoolConfig::new(4), HeapBytes::new()).unwrap();
    pool.create_new().unwrap();
    let mut p = pool.create_ref();
    pool.get_object(3, &mut p);
    assert_eq!(
        pool.delete(&p),
        Err(PoolError::Arena(ArenaError::IndexOutOfRange {
            index: 3,
            allocated: 1
        }))
    );
}

#[test]
#[cfg(not(any(debug_assertions, feature = "debug-checks")))]
fn unchecked_read_past_the_record_does_not_panic() {
    use recpool_core::RecordWrite;

    let (mut pool, f) = vertex_pool(PoolConfig::new(4), HeapBytes::new()).unwrap();
    let v = pool.create_new().unwrap();
    let w = pool.create_new().unwrap();
    pool.record_mut(&w).set(f.x, 2.5);
    // Offset 24 of slot 0 is offset 0 of slot 1.
    assert_eq!(pool.record(&v).get_f64(24), 2.5);
}

#[test]
fn reads_inside_the_record_never_panic() {
    let (mut pool, f) = vertex_pool(PoolConfig::new(4), HeapBytes::new()).unwrap();
    let v = pool.create_new().unwrap();
    let rec = pool.record(&v);
    assert_eq!(rec.get(f.degree), 0);
    assert_eq!(rec.get_i64(16), rec.get_i64(16));
}
