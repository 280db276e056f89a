//! Native byte-buffer medium.
//!
//! Same addressing as [`HeapBytes`](crate::HeapBytes), but the storage is
//! a cache-line aligned block taken straight from the global allocator
//! and grown with `realloc`, so large arrays can often grow in place.

use crate::bytes;
use crate::medium::{BackingArray, Medium, I32_ADDRESSABLE_BYTES};
use crate::raw::RawBuffer;

/// Medium producing [`NativeByteArray`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NativeBytes {
    byte_limit: usize,
}

impl NativeBytes {
    /// Medium with the default signed-32-bit byte ceiling.
    pub fn new() -> Self {
        Self {
            byte_limit: I32_ADDRESSABLE_BYTES,
        }
    }

    /// Medium whose arrays never exceed `byte_limit` bytes.
    pub fn with_byte_limit(byte_limit: usize) -> Self {
        Self {
            byte_limit: byte_limit.min(I32_ADDRESSABLE_BYTES),
        }
    }
}

impl Default for NativeBytes {
    fn default() -> Self {
        Self::new()
    }
}

impl Medium for NativeBytes {
    type Array = NativeByteArray;

    fn name(&self) -> &'static str {
        "native-bytes"
    }

    fn max_elements(&self, stride: usize) -> usize {
        self.byte_limit / stride.max(1)
    }

    fn allocate(&self, stride: usize, elements: usize) -> NativeByteArray {
        NativeByteArray::new(stride, elements, self.max_elements(stride))
    }
}

/// A backing array in an allocator-owned aligned buffer.
pub struct NativeByteArray {
    buf: RawBuffer,
    stride: usize,
    max_size: usize,
}

impl NativeByteArray {
    /// Create an array of `elements` zeroed slots of `stride` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `elements > max_size`.
    pub fn new(stride: usize, elements: usize, max_size: usize) -> Self {
        assert!(
            elements <= max_size,
            "native byte array of {elements} slots exceeds limit {max_size}"
        );
        Self {
            buf: RawBuffer::zeroed(elements * stride),
            stride,
            max_size,
        }
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_slice()
    }
}

impl std::fmt::Debug for NativeByteArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeByteArray")
            .field("bytes", &self.buf.len())
            .field("stride", &self.stride)
            .field("max_size", &self.max_size)
            .finish()
    }
}

impl BackingArray for NativeByteArray {
    fn bytes_per_element(&self) -> usize {
        self.stride
    }

    fn size(&self) -> usize {
        self.buf.len() / self.stride.max(1)
    }

    fn max_size(&self) -> usize {
        self.max_size
    }

    fn resize(&mut self, new_size: usize) {
        assert!(
            new_size <= self.max_size,
            "native byte array of {new_size} slots exceeds limit {}",
            self.max_size
        );
        self.buf.resize(new_size * self.stride);
    }

    fn swap_element(&mut self, index: usize, other: &mut Self, other_index: usize) {
        debug_assert_eq!(self.stride, other.stride);
        bytes::swap_between(
            self.buf.as_mut_slice(),
            index,
            other.buf.as_mut_slice(),
            other_index,
            self.stride,
        );
    }

    fn swap_within(&mut self, a: usize, b: usize) {
        bytes::swap_within(self.buf.as_mut_slice(), self.stride, a, b);
    }

    fn memory_bytes(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    fn get_i8(&self, offset: usize) -> i8 {
        bytes::get_i8(self.buf.as_slice(), offset)
    }

    #[inline]
    fn get_i16(&self, offset: usize) -> i16 {
        bytes::get_i16(self.buf.as_slice(), offset)
    }

    #[inline]
    fn get_i32(&self, offset: usize) -> i32 {
        bytes::get_i32(self.buf.as_slice(), offset)
    }

    #[inline]
    fn get_i64(&self, offset: usize) -> i64 {
        bytes::get_i64(self.buf.as_slice(), offset)
    }

    #[inline]
    fn get_f32(&self, offset: usize) -> f32 {
        bytes::get_f32(self.buf.as_slice(), offset)
    }

    #[inline]
    fn get_f64(&self, offset: usize) -> f64 {
        bytes::get_f64(self.buf.as_slice(), offset)
    }

    #[inline]
    fn put_i8(&mut self, offset: usize, value: i8) {
        self.buf.as_mut_slice()[offset] = value as u8;
    }

    #[inline]
    fn put_i16(&mut self, offset: usize, value: i16) {
        bytes::put(self.buf.as_mut_slice(), offset, &value.to_le_bytes());
    }

    #[inline]
    fn put_i32(&mut self, offset: usize, value: i32) {
        bytes::put(self.buf.as_mut_slice(), offset, &value.to_le_bytes());
    }

    #[inline]
    fn put_i64(&mut self, offset: usize, value: i64) {
        bytes::put(self.buf.as_mut_slice(), offset, &value.to_le_bytes());
    }

    #[inline]
    fn put_f32(&mut self, offset: usize, value: f32) {
        bytes::put(self.buf.as_mut_slice(), offset, &value.to_le_bytes());
    }

    #[inline]
    fn put_f64(&mut self, offset: usize, value: f64) {
        bytes::put(self.buf.as_mut_slice(), offset, &value.to_le_bytes());
    }
}
