//! Registry of per-field property maps attached to a pool.
//!
//! Property maps (attribute storage, undo logs, change listeners) live
//! outside the pool. The registry only forwards lifecycle events to them
//! and lets bulk mutations suppress their per-change notifications.
//! Pauses nest: maps are told to pause on the outermost pause and to
//! resume on the matching outermost resume.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// Hooks a pool calls on attached property maps.
///
/// Methods take `&self`; maps that record state use interior mutability.
pub trait PropertyMap: Send + Sync {
    /// Stop firing change notifications until resumed.
    fn pause_listeners(&self);

    /// Fire any deferred notifications and resume normal delivery.
    fn resume_listeners(&self);

    /// A slot was allocated (after its uninitialized-state reset).
    fn object_created(&self, index: usize) {
        let _ = index;
    }

    /// A slot is about to be freed.
    fn object_deleted(&self, index: usize) {
        let _ = index;
    }
}

/// Handle returned when a property map is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyMapId(u32);

impl PropertyMapId {
    /// The raw value.
    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Ordered set of property maps plus the pause nesting depth.
#[derive(Default)]
pub struct PropertyRegistry {
    maps: IndexMap<PropertyMapId, Arc<dyn PropertyMap>>,
    next_id: u32,
    pause_depth: usize,
}

impl PropertyRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `map`. A map registered while paused is paused immediately.
    pub fn register(&mut self, map: Arc<dyn PropertyMap>) -> PropertyMapId {
        let id = PropertyMapId(self.next_id);
        self.next_id += 1;
        if self.pause_depth > 0 {
            map.pause_listeners();
        }
        self.maps.insert(id, map);
        id
    }

    /// Detach a map. A map removed while paused is resumed first so it
    /// is never left suspended.
    pub fn unregister(&mut self, id: PropertyMapId) -> Option<Arc<dyn PropertyMap>> {
        let map = self.maps.shift_remove(&id)?;
        if self.pause_depth > 0 {
            map.resume_listeners();
        }
        Some(map)
    }

    /// Look up a registered map.
    pub fn get(&self, id: PropertyMapId) -> Option<&Arc<dyn PropertyMap>> {
        self.maps.get(&id)
    }

    /// Number of registered maps.
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Whether no map is registered.
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Current pause nesting depth.
    pub fn pause_depth(&self) -> usize {
        self.pause_depth
    }

    /// Whether notifications are currently suppressed.
    pub fn is_paused(&self) -> bool {
        self.pause_depth > 0
    }

    /// Enter a pause. Maps are told only on the outermost one.
    pub fn pause(&mut self) {
        if self.pause_depth == 0 {
            for map in self.maps.values() {
                map.pause_listeners();
            }
        }
        self.pause_depth += 1;
    }

    /// Leave a pause. Maps are resumed when the outermost pause ends; an
    /// unmatched resume is ignored.
    pub fn resume(&mut self) {
        match self.pause_depth {
            0 => tracing::debug!("Ignoring resume without a matching pause"),
            1 => {
                self.pause_depth = 0;
                for map in self.maps.values() {
                    map.resume_listeners();
                }
            }
            _ => self.pause_depth -= 1,
        }
    }

    /// Forward a creation to every map, in registration order.
    pub fn object_created(&self, index: usize) {
        for map in self.maps.values() {
            map.object_created(index);
        }
    }

    /// Forward a deletion to every map, in registration order.
    pub fn object_deleted(&self, index: usize) {
        for map in self.maps.values() {
            map.object_deleted(index);
        }
    }
}

impl fmt::Debug for PropertyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("maps", &self.maps.keys().collect::<Vec<_>>())
            .field("pause_depth", &self.pause_depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        paused: AtomicIsize,
        created: AtomicUsize,
    }

    impl PropertyMap for Counting {
        fn pause_listeners(&self) {
            self.paused.fetch_add(1, Ordering::SeqCst);
        }

        fn resume_listeners(&self) {
            self.paused.fetch_sub(1, Ordering::SeqCst);
        }

        fn object_created(&self, _index: usize) {
            self.created.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn paused(map: &Counting) -> isize {
        map.paused.load(Ordering::SeqCst)
    }

    #[test]
    fn nested_pauses_forward_once() {
        let map = Arc::new(Counting::default());
        let mut reg = PropertyRegistry::new();
        reg.register(map.clone());

        reg.pause();
        reg.pause();
        assert_eq!(paused(&map), 1);
        reg.resume();
        assert_eq!(paused(&map), 1);
        assert!(reg.is_paused());
        reg.resume();
        assert_eq!(paused(&map), 0);
        assert!(!reg.is_paused());
    }

    #[test]
    fn unmatched_resume_is_ignored() {
        let map = Arc::new(Counting::default());
        let mut reg = PropertyRegistry::new();
        reg.register(map.clone());
        reg.resume();
        assert_eq!(paused(&map), 0);
        assert_eq!(reg.pause_depth(), 0);
    }

    #[test]
    fn late_registration_joins_the_pause() {
        let early = Arc::new(Counting::default());
        let late = Arc::new(Counting::default());
        let mut reg = PropertyRegistry::new();
        reg.register(early.clone());
        reg.pause();
        let id = reg.register(late.clone());
        assert_eq!(paused(&late), 1);

        reg.unregister(id).unwrap();
        assert_eq!(paused(&late), 0);
        reg.resume();
        assert_eq!(paused(&early), 0);
        assert_eq!(paused(&late), 0);
    }

    #[test]
    fn events_reach_every_map() {
        let a = Arc::new(Counting::default());
        let b = Arc::new(Counting::default());
        let mut reg = PropertyRegistry::new();
        reg.register(a.clone());
        reg.register(b.clone());
        reg.object_created(3);
        reg.object_deleted(3);
        assert_eq!(a.created.load(Ordering::SeqCst), 1);
        assert_eq!(b.created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut reg = PropertyRegistry::new();
        let first = reg.register(Arc::new(Counting::default()));
        reg.unregister(first);
        let second = reg.register(Arc::new(Counting::default()));
        assert_ne!(first, second);
        assert_eq!(reg.len(), 1);
        assert!(reg.get(first).is_none());
        assert!(reg.get(second).is_some());
    }
}
