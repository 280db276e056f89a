//! Low-level primitives for native (allocator-owned) memory.
//!
//! [`RawBuffer`] is the only place in this crate that touches raw
//! pointers. Every `unsafe` block carries a `// SAFETY:` comment; the
//! buffer hands out ordinary slices so all field access above it stays
//! bounds-checked safe code.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// Alignment of native buffers: one cache line.
pub(crate) const NATIVE_ALIGN: usize = 64;

/// A zero-initialised, 64-byte aligned byte buffer from the global allocator.
pub(crate) struct RawBuffer {
    /// Start of the allocation; dangling when `len == 0`.
    ptr: NonNull<u8>,
    /// Allocation size in bytes.
    len: usize,
}

impl RawBuffer {
    fn layout(len: usize) -> Layout {
        Layout::from_size_align(len, NATIVE_ALIGN)
            .unwrap_or_else(|_| panic!("native buffer of {len} bytes exceeds isize::MAX"))
    }

    /// Allocate `len` zeroed bytes.
    pub(crate) fn zeroed(len: usize) -> Self {
        if len == 0 {
            return Self {
                ptr: NonNull::dangling(),
                len: 0,
            };
        }
        let layout = Self::layout(len);
        // SAFETY: `layout` has non-zero size.
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(ptr).unwrap_or_else(|| alloc::handle_alloc_error(layout));
        Self { ptr, len }
    }

    /// Reallocate to `new_len` bytes, keeping the first `min(len, new_len)`
    /// bytes and zeroing any new tail.
    pub(crate) fn resize(&mut self, new_len: usize) {
        if new_len == self.len {
            return;
        }
        if self.len == 0 || new_len == 0 {
            let mut fresh = Self::zeroed(new_len);
            let keep = self.len.min(new_len);
            fresh.as_mut_slice()[..keep].copy_from_slice(&self.as_slice()[..keep]);
            *self = fresh;
            return;
        }
        let old_layout = Self::layout(self.len);
        let new_layout = Self::layout(new_len);
        // SAFETY: `ptr` was allocated by the global allocator with
        // `old_layout`, `new_len` is non-zero, and `new_layout` proved that
        // `new_len` rounded up to the alignment fits in `isize`.
        let ptr = unsafe { alloc::realloc(self.ptr.as_ptr(), old_layout, new_len) };
        let ptr = NonNull::new(ptr).unwrap_or_else(|| alloc::handle_alloc_error(new_layout));
        if new_len > self.len {
            // SAFETY: bytes `self.len..new_len` lie inside the new allocation.
            unsafe { std::ptr::write_bytes(ptr.as_ptr().add(self.len), 0, new_len - self.len) };
        }
        self.ptr = ptr;
        self.len = new_len;
    }

    /// Allocation size in bytes.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// The whole buffer as a byte slice.
    pub(crate) fn as_slice(&self) -> &[u8] {
        // SAFETY: `ptr` is valid for `len` initialised bytes (zeroed on
        // allocation and growth), or dangling-but-aligned with `len == 0`.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// The whole buffer as a mutable byte slice.
    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as for `as_slice`; `&mut self` guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        if self.len > 0 {
            // SAFETY: `ptr` was allocated with exactly this layout and is
            // not used after drop.
            unsafe { alloc::dealloc(self.ptr.as_ptr(), Self::layout(self.len)) };
        }
    }
}

// SAFETY: RawBuffer owns its allocation outright; nothing refers to
// thread-local state, and dealloc is safe from any thread.
unsafe impl Send for RawBuffer {}

// SAFETY: shared access only yields `&[u8]`; mutation requires `&mut self`.
unsafe impl Sync for RawBuffer {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_buffer_is_aligned_and_clear() {
        let buf = RawBuffer::zeroed(256);
        assert_eq!(buf.as_slice().as_ptr() as usize % NATIVE_ALIGN, 0);
        assert!(buf.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn grow_keeps_prefix_and_zeroes_tail() {
        let mut buf = RawBuffer::zeroed(8);
        buf.as_mut_slice().copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        buf.resize(32);
        assert_eq!(buf.len(), 32);
        assert_eq!(&buf.as_slice()[..8], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(buf.as_slice()[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn shrink_keeps_prefix() {
        let mut buf = RawBuffer::zeroed(16);
        buf.as_mut_slice()[3] = 9;
        buf.resize(4);
        assert_eq!(buf.as_slice(), &[0, 0, 0, 9]);
    }

    #[test]
    fn empty_buffer_round_trips_through_growth() {
        let mut buf = RawBuffer::zeroed(0);
        assert!(buf.as_slice().is_empty());
        buf.resize(10);
        assert_eq!(buf.len(), 10);
        buf.resize(0);
        assert!(buf.as_slice().is_empty());
    }
}
