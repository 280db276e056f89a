//! The slot allocator.
//!
//! [`Arena`] owns an [`ArrayChain`] of backing arrays and three counters:
//! `capacity ≥ allocated_size ≥ size`. Slots are handed out by index;
//! freed slots become nodes of an intrusive LIFO list stored in their own
//! bytes (see [`crate::freelist`]).
//!
//! All mutation takes `&mut self`. Record views borrow the arena, so no
//! view survives a `create` that might reallocate storage.

use std::fmt;

use recpool_core::{check_field_bounds, ArenaError, ConfigError, RecordLayout, DEBUG_CHECKS};

use crate::config::{ArenaConfig, FreePolicy, Growth};
use crate::freelist::{FreeSlotHeader, LinkWidth};
use crate::iter::{LiveCursor, LiveIter};
use crate::medium::{BackingArray, MappedRecord, Medium};
use crate::storage::ArrayChain;
use crate::view::{Record, RecordMut};

/// Fixed-size slot allocator over a storage medium.
pub struct Arena<M: Medium> {
    medium: M,
    storage: ArrayChain<M::Array>,
    /// Declared record size; the stride may be larger.
    record_bytes: usize,
    header: FreeSlotHeader,
    policy: FreePolicy,
    /// Live slots.
    size: usize,
    /// High-water mark of indices ever handed out.
    allocated_size: usize,
    /// Head of the free list.
    first_free: Option<usize>,
}

impl<M: Medium> Arena<M> {
    /// Create an arena for records of `layout`.
    pub fn new(layout: &RecordLayout, config: ArenaConfig, medium: M) -> Result<Self, ConfigError> {
        Self::with_record_bytes(layout.size_in_bytes(), config, medium)
    }

    /// Create an arena for records of `record_bytes` bytes.
    ///
    /// The slot stride is the record size, raised to fit the free-slot
    /// header and then to the medium's alignment.
    pub fn with_record_bytes(
        record_bytes: usize,
        config: ArenaConfig,
        medium: M,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if record_bytes == 0 {
            return Err(ConfigError::EmptyRecord);
        }
        let link = match config.growth {
            Growth::SingleArray => LinkWidth::Narrow,
            Growth::MultiArray { .. } => LinkWidth::Wide,
        };
        let header = FreeSlotHeader::new(config.free_policy, link);
        let stride = medium.stride(record_bytes.max(header.size_in_bytes()));
        let storage = ArrayChain::new(&medium, stride, config.initial_capacity, config.growth)?;

        tracing::debug!(
            medium = medium.name(),
            record_bytes = record_bytes,
            stride = stride,
            capacity = storage.capacity(),
            policy = ?config.free_policy,
            "Arena created"
        );

        Ok(Self {
            medium,
            storage,
            record_bytes,
            header,
            policy: config.free_policy,
            size: 0,
            allocated_size: 0,
            first_free: None,
        })
    }

    // ── Allocation ──────────────────────────────────────────────

    /// Allocate a slot and return its index.
    ///
    /// Pops the most recently freed slot if there is one, clearing its
    /// free marker. Otherwise appends at `allocated_size`, growing storage
    /// when needed. Slot bytes are not zeroed on reuse.
    pub fn create(&mut self) -> Result<usize, ArenaError> {
        let index = match self.first_free {
            Some(head) => {
                let at = self.storage.locate(head);
                let array = self.storage.array_mut(at.array);
                self.first_free = self.header.read_next(array, at.base);
                self.header.clear_marker(array, at.base);
                head
            }
            None => {
                let index = self.allocated_size;
                self.storage.grow_to_fit(&self.medium, index + 1)?;
                // The slot may hold a marker left over from before `clear`.
                let at = self.storage.locate(index);
                self.header
                    .clear_marker(self.storage.array_mut(at.array), at.base);
                self.allocated_size += 1;
                index
            }
        };
        self.size += 1;
        Ok(index)
    }

    /// Return slot `index` to the free list.
    ///
    /// With debug checks on, freeing an index outside
    /// `[0, allocated_size)` or one that is already free is rejected.
    /// Without them both are caller bugs that corrupt the free list; the
    /// one exception is a free with no live slots left, which is always
    /// reported as a double free.
    pub fn free(&mut self, index: usize) -> Result<(), ArenaError> {
        self.check_free(index)?;
        let Some(size) = self.size.checked_sub(1) else {
            return Err(ArenaError::DoubleFree { index });
        };
        let at = self.storage.locate(index);
        self.header
            .write(self.storage.array_mut(at.array), at.base, self.first_free);
        self.first_free = Some(index);
        self.size = size;
        Ok(())
    }

    /// The debug checks [`free`](Self::free) runs, without freeing.
    /// Always `Ok` when debug checks are off.
    pub fn check_free(&self, index: usize) -> Result<(), ArenaError> {
        if !DEBUG_CHECKS {
            return Ok(());
        }
        if index >= self.allocated_size {
            return Err(ArenaError::IndexOutOfRange {
                index,
                allocated: self.allocated_size,
            });
        }
        // A freed slot always carries the marker under the checked
        // policies, so the list walk only runs to rule out lookalikes.
        let suspect = match self.policy {
            FreePolicy::Unchecked => true,
            FreePolicy::SentinelCheck | FreePolicy::FreeListScan => self.has_free_marker(index),
        };
        if suspect && self.on_free_list(index) {
            return Err(ArenaError::DoubleFree { index });
        }
        Ok(())
    }

    /// Exchange the bytes of slots `a` and `b`.
    ///
    /// Counters and the free list are untouched, so callers normally swap
    /// only live slots.
    pub fn swap(&mut self, a: usize, b: usize) {
        if DEBUG_CHECKS {
            for index in [a, b] {
                assert!(
                    index < self.allocated_size,
                    "{}",
                    ArenaError::IndexOutOfRange {
                        index,
                        allocated: self.allocated_size,
                    }
                );
            }
        }
        self.storage.swap(a, b);
    }

    /// Forget every slot. Storage is kept; bytes are not zeroed.
    pub fn clear(&mut self) {
        self.size = 0;
        self.allocated_size = 0;
        self.first_free = None;
    }

    // ── Liveness ────────────────────────────────────────────────

    /// Whether `index` is on the free list, as far as the configured
    /// policy can tell.
    ///
    /// - `Unchecked` keeps no marker, so every allocated index reads as
    ///   live, matching what iteration visits.
    /// - `SentinelCheck` trusts the marker, so a live record starting with
    ///   [`FREE_SLOT_MARKER`](crate::FREE_SLOT_MARKER) reads as free.
    /// - `FreeListScan` confirms a marker hit by walking the list.
    ///
    /// Indices at or past `allocated_size` are not free (they were never
    /// handed out).
    pub fn is_free(&self, index: usize) -> bool {
        if index >= self.allocated_size {
            return false;
        }
        match self.policy {
            FreePolicy::Unchecked => false,
            FreePolicy::SentinelCheck => self.has_free_marker(index),
            FreePolicy::FreeListScan => self.has_free_marker(index) && self.on_free_list(index),
        }
    }

    /// Whether `index` names a live slot.
    pub fn contains(&self, index: usize) -> bool {
        index < self.allocated_size && !self.is_free(index)
    }

    /// Whether slot `index` begins with the free marker. Always `false`
    /// under [`FreePolicy::Unchecked`].
    #[inline]
    pub fn has_free_marker(&self, index: usize) -> bool {
        let at = self.storage.locate(index);
        self.header.has_marker(self.storage.array(at.array), at.base)
    }

    /// Free indices in list order (most recently freed first).
    pub fn free_indices(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.first_free, move |&i| self.next_free(i))
            .take(self.allocated_size)
    }

    fn next_free(&self, index: usize) -> Option<usize> {
        let at = self.storage.locate(index);
        self.header.read_next(self.storage.array(at.array), at.base)
    }

    fn on_free_list(&self, index: usize) -> bool {
        self.free_indices().any(|i| i == index)
    }

    // ── Iteration ───────────────────────────────────────────────

    /// Live indices in ascending order, skipping free slots per policy.
    pub fn live_indices(&self) -> LiveIter<'_, M> {
        LiveIter::new(self)
    }

    /// A detached cursor over live indices. Unlike [`live_indices`]
    /// it does not borrow the arena between steps, so slots can be freed
    /// mid-pass.
    ///
    /// [`live_indices`]: Self::live_indices
    pub fn cursor(&self) -> LiveCursor {
        LiveCursor::new(self)
    }

    // ── Record access ───────────────────────────────────────────

    /// Array and byte base of slot `index`.
    #[inline]
    pub fn locate(&self, index: usize) -> MappedRecord {
        self.storage.locate(index)
    }

    /// Shared view of slot `index`.
    #[inline]
    #[track_caller]
    pub fn record(&self, index: usize) -> Record<'_, M::Array> {
        self.record_at(self.storage.locate(index))
    }

    /// Exclusive view of slot `index`.
    #[inline]
    #[track_caller]
    pub fn record_mut(&mut self, index: usize) -> RecordMut<'_, M::Array> {
        self.record_at_mut(self.storage.locate(index))
    }

    /// Shared view of the slot at a mapped position.
    #[inline]
    #[track_caller]
    pub fn record_at(&self, access: MappedRecord) -> Record<'_, M::Array> {
        let array = self.storage.array(access.array);
        self.check_slot(array, access.base);
        Record::new(array, access.base, self.record_bytes)
    }

    /// Exclusive view of the slot at a mapped position.
    #[inline]
    #[track_caller]
    pub fn record_at_mut(&mut self, access: MappedRecord) -> RecordMut<'_, M::Array> {
        let record_bytes = self.record_bytes;
        let stride = self.storage.stride();
        let array = self.storage.array_mut(access.array);
        check_field_bounds(access.base, stride, array.size() * stride);
        RecordMut::new(array, access.base, record_bytes)
    }

    #[inline]
    #[track_caller]
    fn check_slot(&self, array: &M::Array, base: usize) {
        let stride = self.storage.stride();
        check_field_bounds(base, stride, array.size() * stride);
    }

    // ── Introspection ───────────────────────────────────────────

    /// Slots available without growing.
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Largest capacity growth can reach.
    pub fn max_capacity(&self) -> usize {
        self.storage.max_capacity()
    }

    /// Live slots.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether no slot is live.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// High-water mark of indices handed out.
    pub fn allocated_size(&self) -> usize {
        self.allocated_size
    }

    /// Declared record size in bytes.
    pub fn record_bytes(&self) -> usize {
        self.record_bytes
    }

    /// Bytes per slot after padding.
    pub fn bytes_per_element(&self) -> usize {
        self.storage.stride()
    }

    /// Number of backing arrays.
    pub fn array_count(&self) -> usize {
        self.storage.arrays().len()
    }

    /// The backing arrays in index order.
    pub fn arrays(&self) -> &[M::Array] {
        self.storage.arrays()
    }

    /// Slots per full backing array.
    pub fn elements_per_array(&self) -> usize {
        self.storage.elements_per_array()
    }

    /// Bytes of storage held.
    pub fn memory_bytes(&self) -> usize {
        self.storage.memory_bytes()
    }

    /// Free-slot policy.
    pub fn policy(&self) -> FreePolicy {
        self.policy
    }

    /// Layout of freed slots.
    pub fn free_slot_header(&self) -> FreeSlotHeader {
        self.header
    }

    /// The storage medium.
    pub fn medium(&self) -> &M {
        &self.medium
    }
}

impl<M: Medium> fmt::Debug for Arena<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("medium", &self.medium.name())
            .field("record_bytes", &self.record_bytes)
            .field("stride", &self.storage.stride())
            .field("policy", &self.policy)
            .field("capacity", &self.capacity())
            .field("allocated_size", &self.allocated_size)
            .field("size", &self.size)
            .field("first_free", &self.first_free)
            .finish()
    }
}

// Compile-time assertion: arenas over the bundled media can be shared
// with reader threads.
const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Arena<crate::HeapBytes>>();
    assert_send_sync::<Arena<crate::NativeBytes>>();
    assert_send_sync::<Arena<crate::HeapDoubles>>();
};
