//! Short-lived views of one record.
//!
//! A view borrows the backing array that holds its slot, so it cannot
//! outlive a growth step: the borrow checker rejects any attempt to keep
//! one across `Arena::create`. Offsets passed to the view are relative to
//! the record; the view adds the slot's base.

use recpool_core::{check_field_bounds, RecordRead, RecordWrite};

use crate::medium::BackingArray;

/// Shared view of one record.
#[derive(Debug)]
pub struct Record<'a, A> {
    array: &'a A,
    base: usize,
    record_bytes: usize,
}

impl<A> Clone for Record<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Record<'_, A> {}

impl<'a, A: BackingArray> Record<'a, A> {
    /// View the `record_bytes` bytes starting at `base` in `array`.
    pub fn new(array: &'a A, base: usize, record_bytes: usize) -> Self {
        Self {
            array,
            base,
            record_bytes,
        }
    }

    /// Byte offset of the record within its array.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Declared record size in bytes.
    pub fn record_bytes(&self) -> usize {
        self.record_bytes
    }

    /// The array holding the record.
    pub fn array(&self) -> &'a A {
        self.array
    }
}

macro_rules! read_impl {
    ($($name:ident -> $ty:ty),* $(,)?) => {
        $(
            #[inline]
            fn $name(&self, offset: usize) -> $ty {
                check_field_bounds(offset, std::mem::size_of::<$ty>(), self.record_bytes);
                self.array.$name(self.base + offset)
            }
        )*
    };
}

macro_rules! write_impl {
    ($($name:ident($ty:ty)),* $(,)?) => {
        $(
            #[inline]
            fn $name(&mut self, offset: usize, value: $ty) {
                check_field_bounds(offset, std::mem::size_of::<$ty>(), self.record_bytes);
                self.array.$name(self.base + offset, value)
            }
        )*
    };
}

impl<A: BackingArray> RecordRead for Record<'_, A> {
    read_impl! {
        get_i8 -> i8,
        get_i16 -> i16,
        get_i32 -> i32,
        get_i64 -> i64,
        get_f32 -> f32,
        get_f64 -> f64,
    }
}

/// Exclusive view of one record.
#[derive(Debug)]
pub struct RecordMut<'a, A> {
    array: &'a mut A,
    base: usize,
    record_bytes: usize,
}

impl<'a, A: BackingArray> RecordMut<'a, A> {
    /// View the `record_bytes` bytes starting at `base` in `array`.
    pub fn new(array: &'a mut A, base: usize, record_bytes: usize) -> Self {
        Self {
            array,
            base,
            record_bytes,
        }
    }

    /// Byte offset of the record within its array.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Declared record size in bytes.
    pub fn record_bytes(&self) -> usize {
        self.record_bytes
    }

    /// A shared view of the same record.
    pub fn as_record(&self) -> Record<'_, A> {
        Record::new(self.array, self.base, self.record_bytes)
    }

    /// Reborrow for a shorter lifetime.
    pub fn reborrow(&mut self) -> RecordMut<'_, A> {
        RecordMut::new(self.array, self.base, self.record_bytes)
    }

    /// Zero every declared byte of the record.
    pub fn zero(&mut self) {
        let words = self.record_bytes / 8;
        for w in 0..words {
            self.array.put_i64(self.base + w * 8, 0);
        }
        for b in words * 8..self.record_bytes {
            self.array.put_i8(self.base + b, 0);
        }
    }
}

impl<A: BackingArray> RecordRead for RecordMut<'_, A> {
    read_impl! {
        get_i8 -> i8,
        get_i16 -> i16,
        get_i32 -> i32,
        get_i64 -> i64,
        get_f32 -> f32,
        get_f64 -> f64,
    }
}

impl<A: BackingArray> RecordWrite for RecordMut<'_, A> {
    write_impl! {
        put_i8(i8),
        put_i16(i16),
        put_i32(i32),
        put_i64(i64),
        put_f32(f32),
        put_f64(f64),
    }
}
