//! Heap byte-array medium.
//!
//! Each [`HeapByteArray`] is a zero-initialised `Vec<u8>` of
//! `size × bytes_per_element` bytes. Byte offsets are treated as signed
//! 32-bit quantities, so one array tops out just under 2 GiB unless a
//! smaller limit is configured.

use crate::bytes;
use crate::medium::{BackingArray, Medium, I32_ADDRESSABLE_BYTES};

/// Medium producing [`HeapByteArray`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeapBytes {
    byte_limit: usize,
}

impl HeapBytes {
    /// Medium with the default signed-32-bit byte ceiling.
    pub fn new() -> Self {
        Self {
            byte_limit: I32_ADDRESSABLE_BYTES,
        }
    }

    /// Medium whose arrays never exceed `byte_limit` bytes (capped at the
    /// default ceiling).
    pub fn with_byte_limit(byte_limit: usize) -> Self {
        Self {
            byte_limit: byte_limit.min(I32_ADDRESSABLE_BYTES),
        }
    }

    /// Per-array byte ceiling.
    pub fn byte_limit(&self) -> usize {
        self.byte_limit
    }
}

impl Default for HeapBytes {
    fn default() -> Self {
        Self::new()
    }
}

impl Medium for HeapBytes {
    type Array = HeapByteArray;

    fn name(&self) -> &'static str {
        "heap-bytes"
    }

    fn max_elements(&self, stride: usize) -> usize {
        self.byte_limit / stride.max(1)
    }

    fn allocate(&self, stride: usize, elements: usize) -> HeapByteArray {
        HeapByteArray::new(stride, elements, self.max_elements(stride))
    }
}

/// A backing array stored in a `Vec<u8>`.
#[derive(Clone, Debug)]
pub struct HeapByteArray {
    data: Vec<u8>,
    stride: usize,
    max_size: usize,
}

impl HeapByteArray {
    /// Create an array of `elements` zeroed slots of `stride` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `elements > max_size`.
    pub fn new(stride: usize, elements: usize, max_size: usize) -> Self {
        assert!(
            elements <= max_size,
            "heap byte array of {elements} slots exceeds limit {max_size}"
        );
        Self {
            data: vec![0; elements * stride],
            stride,
            max_size,
        }
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The raw bytes, mutably.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl BackingArray for HeapByteArray {
    fn bytes_per_element(&self) -> usize {
        self.stride
    }

    fn size(&self) -> usize {
        self.data.len() / self.stride.max(1)
    }

    fn max_size(&self) -> usize {
        self.max_size
    }

    fn resize(&mut self, new_size: usize) {
        assert!(
            new_size <= self.max_size,
            "heap byte array of {new_size} slots exceeds limit {}",
            self.max_size
        );
        self.data.resize(new_size * self.stride, 0);
    }

    fn swap_element(&mut self, index: usize, other: &mut Self, other_index: usize) {
        debug_assert_eq!(self.stride, other.stride);
        bytes::swap_between(&mut self.data, index, &mut other.data, other_index, self.stride);
    }

    fn swap_within(&mut self, a: usize, b: usize) {
        bytes::swap_within(&mut self.data, self.stride, a, b);
    }

    fn memory_bytes(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn get_i8(&self, offset: usize) -> i8 {
        bytes::get_i8(&self.data, offset)
    }

    #[inline]
    fn get_i16(&self, offset: usize) -> i16 {
        bytes::get_i16(&self.data, offset)
    }

    #[inline]
    fn get_i32(&self, offset: usize) -> i32 {
        bytes::get_i32(&self.data, offset)
    }

    #[inline]
    fn get_i64(&self, offset: usize) -> i64 {
        bytes::get_i64(&self.data, offset)
    }

    #[inline]
    fn get_f32(&self, offset: usize) -> f32 {
        bytes::get_f32(&self.data, offset)
    }

    #[inline]
    fn get_f64(&self, offset: usize) -> f64 {
        bytes::get_f64(&self.data, offset)
    }

    #[inline]
    fn put_i8(&mut self, offset: usize, value: i8) {
        self.data[offset] = value as u8;
    }

    #[inline]
    fn put_i16(&mut self, offset: usize, value: i16) {
        bytes::put(&mut self.data, offset, &value.to_le_bytes());
    }

    #[inline]
    fn put_i32(&mut self, offset: usize, value: i32) {
        bytes::put(&mut self.data, offset, &value.to_le_bytes());
    }

    #[inline]
    fn put_i64(&mut self, offset: usize, value: i64) {
        bytes::put(&mut self.data, offset, &value.to_le_bytes());
    }

    #[inline]
    fn put_f32(&mut self, offset: usize, value: f32) {
        bytes::put(&mut self.data, offset, &value.to_le_bytes());
    }

    #[inline]
    fn put_f64(&mut self, offset: usize, value: f64) {
        bytes::put(&mut self.data, offset, &value.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limit_is_signed_32_bit_addressing() {
        let medium = HeapBytes::new();
        assert_eq!(medium.max_elements(8), i32::MAX as usize / 8);
        assert_eq!(medium.max_elements(16), i32::MAX as usize / 16);
    }

    #[test]
    fn byte_limit_caps_elements() {
        let medium = HeapBytes::with_byte_limit(100);
        assert_eq!(medium.max_elements(8), 12);
        let array = medium.allocate(8, 12);
        assert_eq!(array.max_size(), 12);
    }

    #[test]
    fn resize_preserves_existing_bytes() {
        let mut array = HeapBytes::new().allocate(8, 2);
        array.put_i64(8, -42);
        array.resize(5);
        assert_eq!(array.size(), 5);
        assert_eq!(array.get_i64(8), -42);
        assert_eq!(array.get_i64(32), 0);
    }

    #[test]
    #[should_panic(expected = "exceeds limit")]
    fn resize_past_max_size_panics() {
        let mut array = HeapBytes::with_byte_limit(64).allocate(8, 1);
        array.resize(9);
    }

    #[test]
    fn access_repoints_by_stride() {
        let array = HeapBytes::new().allocate(12, 4);
        let mut access = array.create_access();
        assert_eq!(access.base, 0);
        array.update_access(&mut access, 3);
        assert_eq!(access.base, 36);
    }

    #[test]
    fn swap_element_between_arrays() {
        let medium = HeapBytes::new();
        let mut a = medium.allocate(4, 2);
        let mut b = medium.allocate(4, 2);
        a.put_i32(4, 11);
        b.put_i32(0, 22);
        a.swap_element(1, &mut b, 0);
        assert_eq!(a.get_i32(4), 22);
        assert_eq!(b.get_i32(0), 11);
    }
}
