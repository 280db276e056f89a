//! Flyweight proxies.
//!
//! A proxy is a small reusable handle that names one slot of one pool.
//! It never holds a borrow of the pool's storage: reads and writes go
//! through [`ObjectPool::record`](crate::ObjectPool::record) and friends,
//! which re-resolve the slot on every call. Repointing a proxy is a
//! couple of integer stores, so one proxy can walk an entire pool without
//! allocating.
//!
//! Equality is positional. Two proxies compare equal when they currently
//! name the same slot of the same pool; what they pointed at before does
//! not matter.

use recpool_arena::MappedRecord;
use recpool_core::{PoolError, PoolId, RecordWrite};

/// The position a proxy currently names: owning pool, slot index and the
/// mapped `(array, base)` of that slot.
#[derive(Clone, Copy, Debug)]
pub struct Slot {
    pool: PoolId,
    index: usize,
    access: MappedRecord,
}

impl Slot {
    /// A slot handle owned by `pool`, positioned at slot 0.
    pub(crate) fn detached(pool: PoolId) -> Self {
        Self {
            pool,
            index: 0,
            access: MappedRecord::default(),
        }
    }

    pub(crate) fn point_to(&mut self, index: usize, access: MappedRecord) {
        self.index = index;
        self.access = access;
    }

    /// The pool that created this handle.
    pub fn pool(&self) -> PoolId {
        self.pool
    }

    /// Slot index currently named.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Mapped position of the slot.
    pub fn access(&self) -> MappedRecord {
        self.access
    }

    /// Repoint at whatever `other` names.
    ///
    /// Fails with [`PoolError::ForeignProxy`] when `other` belongs to a
    /// different pool; `self` is left unchanged.
    pub fn ref_to(&mut self, other: &Slot) -> Result<(), PoolError> {
        if self.pool != other.pool {
            return Err(PoolError::ForeignProxy {
                expected: self.pool,
                found: other.pool,
            });
        }
        self.index = other.index;
        self.access = other.access;
        Ok(())
    }
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        self.pool == other.pool && self.access == other.access
    }
}

impl Eq for Slot {}

impl std::hash::Hash for Slot {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.pool.hash(state);
        self.access.hash(state);
    }
}

/// A typed handle wrapping a [`Slot`].
///
/// Record types implement this for a newtype around `Slot` and derive
/// `PartialEq` through it to get positional equality.
pub trait Proxy: Send + 'static {
    /// The wrapped slot handle.
    fn slot(&self) -> &Slot;

    /// The wrapped slot handle, mutably.
    fn slot_mut(&mut self) -> &mut Slot;

    /// Slot index currently named.
    fn index(&self) -> usize {
        self.slot().index()
    }

    /// Repoint at whatever `other` names. See [`Slot::ref_to`].
    fn ref_to(&mut self, other: &Self) -> Result<(), PoolError>
    where
        Self: Sized,
    {
        self.slot_mut().ref_to(other.slot())
    }
}

impl Proxy for Slot {
    fn slot(&self) -> &Slot {
        self
    }

    fn slot_mut(&mut self) -> &mut Slot {
        self
    }
}

/// Builds proxies and resets freshly allocated slots.
///
/// Slot bytes are not zeroed between a free and the next reuse, so
/// record types with index fields override
/// [`set_to_uninitialized_state`](Self::set_to_uninitialized_state) to
/// put those fields back to their "none" sentinel.
pub trait ProxyFactory<P: Proxy>: Send + Sync {
    /// Wrap `slot` in a new proxy.
    fn create_ref(&self, slot: Slot) -> P;

    /// Reset a slot just returned by `create`, before the caller sees it.
    /// The default leaves the bytes as they are.
    fn set_to_uninitialized_state<W: RecordWrite>(&self, record: &mut W) {
        let _ = record;
    }
}

/// Factory for pools that use bare [`Slot`]s as their proxy type.
#[derive(Clone, Copy, Debug, Default)]
pub struct SlotFactory;

impl ProxyFactory<Slot> for SlotFactory {
    fn create_ref(&self, slot: Slot) -> Slot {
        slot
    }
}
