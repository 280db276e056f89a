//! The object pool: an arena of records addressed through flyweight
//! proxies.
//!
//! # Threading
//!
//! Slot allocation, deletion, swaps and writes take `&mut self` and are
//! therefore serialized by the borrow checker. Lookups, reads and
//! iteration take `&self`, and the pool is `Sync`, so any number of
//! reader threads can share `&ObjectPool`. Each reader obtains scratch
//! proxies from the pool's spare queue ([`ObjectPool::create_ref`]) and
//! hands them back with [`ObjectPool::release_ref`]; that queue is a
//! lock-free MPMC channel and never contends with slot state.

use std::any::TypeId;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError};

use recpool_arena::{Arena, LiveIter, Medium, Record, RecordMut};
use recpool_core::{ConfigError, PoolError, PoolId, RecordLayout, DEBUG_CHECKS};

use crate::config::PoolConfig;
use crate::iter::Iter;
use crate::proxy::{Proxy, ProxyFactory, Slot};
use crate::registry::{PropertyMap, PropertyMapId, PropertyRegistry};

/// Pool of fixed-layout records handed out through proxies of type `P`.
pub struct ObjectPool<P: Proxy, F: ProxyFactory<P>, M: Medium> {
    id: PoolId,
    arena: Arena<M>,
    layout: RecordLayout,
    factory: F,
    spare_tx: Sender<P>,
    spare_rx: Receiver<P>,
    registry: PropertyRegistry,
}

impl<P: Proxy, F: ProxyFactory<P>, M: Medium> ObjectPool<P, F, M> {
    /// Create a pool whose records follow `layout`, stored in `medium`.
    pub fn new(
        config: PoolConfig,
        layout: RecordLayout,
        factory: F,
        medium: M,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let arena = Arena::new(&layout, config.arena, medium)?;
        let (spare_tx, spare_rx) = match config.max_spare_refs {
            Some(cap) => crossbeam_channel::bounded(cap),
            None => crossbeam_channel::unbounded(),
        };
        Ok(Self {
            id: PoolId::next(),
            arena,
            layout,
            factory,
            spare_tx,
            spare_rx,
            registry: PropertyRegistry::new(),
        })
    }

    /// This pool's identity.
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// The record layout.
    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    /// The proxy factory.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Read-only access to the underlying arena.
    pub fn arena(&self) -> &Arena<M> {
        &self.arena
    }

    // ── Proxy recycling ─────────────────────────────────────────

    /// Take a spare proxy, or build a new one. Safe to call from any
    /// number of threads at once.
    ///
    /// A recycled proxy still names whatever it named when it was
    /// released; repoint it before use.
    pub fn create_ref(&self) -> P {
        self.spare_rx
            .try_recv()
            .unwrap_or_else(|_| self.factory.create_ref(Slot::detached(self.id)))
    }

    /// Return a proxy for reuse. Proxies from other pools, and proxies
    /// released into a full bounded queue, are dropped.
    pub fn release_ref(&self, proxy: P) {
        if proxy.slot().pool() != self.id {
            tracing::debug!(
                pool = %self.id,
                owner = %proxy.slot().pool(),
                "Dropping released proxy from another pool"
            );
            return;
        }
        if let Err(TrySendError::Full(_)) = self.spare_tx.try_send(proxy) {
            tracing::debug!(pool = %self.id, "Spare proxy queue full, dropping proxy");
        }
    }

    /// Number of idle proxies waiting in the spare queue.
    pub fn spare_refs(&self) -> usize {
        self.spare_rx.len()
    }

    // ── Allocation ──────────────────────────────────────────────

    /// Allocate a slot and point `proxy` at it.
    ///
    /// The factory's uninitialized-state reset runs before property maps
    /// hear about the new slot and before the caller sees it.
    pub fn create<'r>(&mut self, proxy: &'r mut P) -> Result<&'r mut P, PoolError> {
        self.check_owner(proxy)?;
        let index = self.arena.create()?;
        let access = self.arena.locate(index);
        proxy.slot_mut().point_to(index, access);
        self.factory
            .set_to_uninitialized_state(&mut self.arena.record_at_mut(access));
        self.registry.object_created(index);
        Ok(proxy)
    }

    /// Allocate a slot and return a proxy pointing at it.
    pub fn create_new(&mut self) -> Result<P, PoolError> {
        let mut proxy = self.create_ref();
        match self.create(&mut proxy) {
            Ok(_) => Ok(proxy),
            Err(e) => {
                self.release_ref(proxy);
                Err(e)
            }
        }
    }

    /// Free the slot `proxy` names. Property maps are notified first,
    /// and only once the free is known to be valid.
    pub fn delete(&mut self, proxy: &P) -> Result<(), PoolError> {
        self.check_owner(proxy)?;
        let index = proxy.index();
        self.arena.check_free(index)?;
        self.registry.object_deleted(index);
        self.arena.free(index)?;
        Ok(())
    }

    /// Exchange the bytes of slots `a` and `b`. Proxies keep their
    /// indices, so a proxy at `a` afterwards reads what `b` held.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.arena.swap(a, b);
    }

    // ── Lookup ──────────────────────────────────────────────────

    /// Point `proxy` at slot `index`, live or not.
    #[track_caller]
    pub fn get_object<'r>(&self, index: usize, proxy: &'r mut P) -> &'r mut P {
        if DEBUG_CHECKS {
            if let Err(e) = self.check_owner(proxy) {
                panic!("{e}");
            }
        }
        proxy.slot_mut().point_to(index, self.arena.locate(index));
        proxy
    }

    /// Point `proxy` at slot `index` if it is live; `None` for indices
    /// never handed out or currently free.
    pub fn get_object_if_exists<'r>(&self, index: usize, proxy: &'r mut P) -> Option<&'r mut P> {
        if !self.arena.contains(index) {
            return None;
        }
        Some(self.get_object(index, proxy))
    }

    /// Slot index `proxy` names.
    pub fn get_id(&self, proxy: &P) -> usize {
        proxy.index()
    }

    /// Type tag of the proxies this pool hands out.
    pub fn ref_type(&self) -> TypeId {
        TypeId::of::<P>()
    }

    /// Type name of the proxies this pool hands out.
    pub fn ref_type_name(&self) -> &'static str {
        std::any::type_name::<P>()
    }

    /// Whether `index` names a live slot.
    pub fn contains(&self, index: usize) -> bool {
        self.arena.contains(index)
    }

    // ── Record access ───────────────────────────────────────────

    /// Shared view of the record `proxy` names.
    #[track_caller]
    pub fn record(&self, proxy: &P) -> Record<'_, M::Array> {
        self.arena.record_at(proxy.slot().access())
    }

    /// Exclusive view of the record `proxy` names.
    #[track_caller]
    pub fn record_mut(&mut self, proxy: &P) -> RecordMut<'_, M::Array> {
        self.arena.record_at_mut(proxy.slot().access())
    }

    /// Shared view of slot `index`.
    #[track_caller]
    pub fn record_at(&self, index: usize) -> Record<'_, M::Array> {
        self.arena.record(index)
    }

    /// Exclusive view of slot `index`.
    #[track_caller]
    pub fn record_at_mut(&mut self, index: usize) -> RecordMut<'_, M::Array> {
        self.arena.record_mut(index)
    }

    // ── Traversal ───────────────────────────────────────────────

    /// A fresh proxy for every live slot, ascending.
    pub fn iter(&self) -> Iter<'_, P, F, M> {
        Iter::new(self)
    }

    /// Live slot indices, ascending.
    pub fn live_indices(&self) -> LiveIter<'_, M> {
        self.arena.live_indices()
    }

    /// Point `proxy` at every live slot in turn and call `f`. Allocates
    /// nothing beyond the free-list snapshot some policies take.
    pub fn for_each_live(&self, proxy: &mut P, mut f: impl FnMut(&mut P)) {
        for index in self.arena.live_indices() {
            f(self.get_object(index, proxy));
        }
    }

    /// Delete every live slot for which `keep` returns `false`, visiting
    /// in ascending order. Returns the number deleted.
    pub fn retain(
        &mut self,
        mut keep: impl FnMut(usize, Record<'_, M::Array>) -> bool,
    ) -> Result<usize, PoolError> {
        let mut cursor = self.arena.cursor();
        let mut removed = 0;
        while let Some(index) = cursor.advance(&self.arena) {
            if !keep(index, self.arena.record(index)) {
                self.registry.object_deleted(index);
                self.arena.free(index)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    // ── Property maps ───────────────────────────────────────────

    /// Attach a property map. It hears about every later create and
    /// delete, and about pauses.
    pub fn register_property_map(&mut self, map: Arc<dyn PropertyMap>) -> PropertyMapId {
        self.registry.register(map)
    }

    /// Detach a property map.
    pub fn unregister_property_map(&mut self, id: PropertyMapId) -> Option<Arc<dyn PropertyMap>> {
        self.registry.unregister(id)
    }

    /// The property registry.
    pub fn property_maps(&self) -> &PropertyRegistry {
        &self.registry
    }

    /// Suppress property-map notifications until the guard is dropped.
    /// The guard dereferences to the pool, so batch work goes through it.
    pub fn pause_listeners(&mut self) -> PauseGuard<'_, P, F, M> {
        self.registry.pause();
        PauseGuard { pool: self }
    }

    /// Whether notifications are currently suppressed.
    pub fn listeners_paused(&self) -> bool {
        self.registry.is_paused()
    }

    // ── Introspection ───────────────────────────────────────────

    /// Live slots.
    pub fn size(&self) -> usize {
        self.arena.size()
    }

    /// Whether no slot is live.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Slots available without growing.
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// High-water mark of slot indices.
    pub fn allocated_size(&self) -> usize {
        self.arena.allocated_size()
    }

    fn check_owner(&self, proxy: &P) -> Result<(), PoolError> {
        let found = proxy.slot().pool();
        if found != self.id {
            return Err(PoolError::ForeignProxy {
                expected: self.id,
                found,
            });
        }
        Ok(())
    }
}

impl<P: Proxy, F: ProxyFactory<P>, M: Medium> fmt::Debug for ObjectPool<P, F, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("id", &self.id)
            .field("ref_type", &self.ref_type_name())
            .field("arena", &self.arena)
            .field("spare_refs", &self.spare_refs())
            .field("registry", &self.registry)
            .finish()
    }
}

/// Keeps property-map notifications paused while alive.
///
/// Obtained from [`ObjectPool::pause_listeners`]. Dereferences to the
/// pool; dropping it resumes notification delivery.
pub struct PauseGuard<'a, P: Proxy, F: ProxyFactory<P>, M: Medium> {
    pool: &'a mut ObjectPool<P, F, M>,
}

impl<P: Proxy, F: ProxyFactory<P>, M: Medium> PauseGuard<'_, P, F, M> {
    /// Resume now rather than at end of scope.
    pub fn resume(self) {}
}

impl<P: Proxy, F: ProxyFactory<P>, M: Medium> Deref for PauseGuard<'_, P, F, M> {
    type Target = ObjectPool<P, F, M>;

    fn deref(&self) -> &Self::Target {
        self.pool
    }
}

impl<P: Proxy, F: ProxyFactory<P>, M: Medium> DerefMut for PauseGuard<'_, P, F, M> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.pool
    }
}

impl<P: Proxy, F: ProxyFactory<P>, M: Medium> Drop for PauseGuard<'_, P, F, M> {
    fn drop(&mut self) {
        self.pool.registry.resume();
    }
}

// Compile-time assertion: pools over the bundled media can be shared by
// reader threads.
const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ObjectPool<Slot, crate::SlotFactory, recpool_arena::HeapBytes>>();
    assert_send_sync::<ObjectPool<Slot, crate::SlotFactory, recpool_arena::NativeBytes>>();
    assert_send_sync::<ObjectPool<Slot, crate::SlotFactory, recpool_arena::HeapDoubles>>();
};
