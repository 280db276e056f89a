//! Storage media: the [`BackingArray`] contract and the [`Medium`] factory.
//!
//! A backing array holds `size()` slots of `bytes_per_element()` bytes
//! and exposes uniform little-endian primitive access at absolute byte
//! offsets. A medium knows how to create arrays of its kind and how many
//! slots one array can address.

/// Position of one slot inside an arena's storage.
///
/// This is the "mapped record" a proxy carries: which backing array the
/// slot lives in and the byte offset of its first byte. Repointing is
/// O(1): the offset is `element × bytes_per_element`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MappedRecord {
    /// Index of the backing array within the arena.
    pub array: usize,
    /// Byte offset of the slot within that array.
    pub base: usize,
}

/// One contiguous block of same-size slots.
///
/// Implementations must behave identically from the arena's point of
/// view: every byte written through `put_*` reads back unchanged through
/// `get_*`, `resize` preserves bytes `0..min(old, new)` slots, and the
/// swap operations exchange whole slots byte for byte.
pub trait BackingArray: Send + Sync + Sized {
    /// Bytes per slot.
    fn bytes_per_element(&self) -> usize;

    /// Number of slots currently held.
    fn size(&self) -> usize;

    /// Hard ceiling on `size()` imposed by the medium's addressing.
    fn max_size(&self) -> usize;

    /// Reallocate to `new_size` slots, keeping existing bytes. New slots
    /// are zeroed.
    ///
    /// # Panics
    ///
    /// Panics if `new_size > max_size()`.
    fn resize(&mut self, new_size: usize);

    /// Exchange slot `index` of this array with slot `other_index` of
    /// `other`. Both arrays must share `bytes_per_element`.
    fn swap_element(&mut self, index: usize, other: &mut Self, other_index: usize);

    /// Exchange two slots of this array.
    fn swap_within(&mut self, a: usize, b: usize);

    /// Bytes of storage held.
    fn memory_bytes(&self) -> usize;

    /// Read a signed byte at an absolute byte offset.
    fn get_i8(&self, offset: usize) -> i8;
    /// Read an `i16` at an absolute byte offset.
    fn get_i16(&self, offset: usize) -> i16;
    /// Read an `i32` at an absolute byte offset.
    fn get_i32(&self, offset: usize) -> i32;
    /// Read an `i64` at an absolute byte offset.
    fn get_i64(&self, offset: usize) -> i64;
    /// Read an `f32` at an absolute byte offset.
    fn get_f32(&self, offset: usize) -> f32;
    /// Read an `f64` at an absolute byte offset.
    fn get_f64(&self, offset: usize) -> f64;

    /// Write a signed byte at an absolute byte offset.
    fn put_i8(&mut self, offset: usize, value: i8);
    /// Write an `i16` at an absolute byte offset.
    fn put_i16(&mut self, offset: usize, value: i16);
    /// Write an `i32` at an absolute byte offset.
    fn put_i32(&mut self, offset: usize, value: i32);
    /// Write an `i64` at an absolute byte offset.
    fn put_i64(&mut self, offset: usize, value: i64);
    /// Write an `f32` at an absolute byte offset.
    fn put_f32(&mut self, offset: usize, value: f32);
    /// Write an `f64` at an absolute byte offset.
    fn put_f64(&mut self, offset: usize, value: f64);

    /// A new access positioned at slot 0 of this array.
    fn create_access(&self) -> MappedRecord {
        MappedRecord::default()
    }

    /// Repoint `access` at slot `index` of this array.
    #[inline]
    fn update_access(&self, access: &mut MappedRecord, index: usize) {
        access.base = index * self.bytes_per_element();
    }
}

/// Factory for backing arrays of one kind.
///
/// Passed to an arena at construction; the arena calls it again whenever
/// multi-array growth needs a fresh array.
pub trait Medium: Send + Sync {
    /// The array type this medium produces.
    type Array: BackingArray;

    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Bytes per slot for a record of `record_bytes` bytes. Media with
    /// alignment needs round up; the default is the record size itself.
    fn stride(&self, record_bytes: usize) -> usize {
        record_bytes
    }

    /// Largest slot count one array of this medium can hold at `stride`.
    fn max_elements(&self, stride: usize) -> usize;

    /// Create an array of `elements` zeroed slots.
    fn allocate(&self, stride: usize, elements: usize) -> Self::Array;
}

/// Byte ceiling of media addressed with a signed 32-bit byte offset.
pub const I32_ADDRESSABLE_BYTES: usize = i32::MAX as usize;
