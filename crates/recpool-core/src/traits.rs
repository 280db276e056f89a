//! Field access traits implemented by record views.
//!
//! All offsets are relative to the start of one record. Implementors only
//! supply the primitive get/put methods; the typed helpers are provided.

use crate::layout::{ArrayField, Field, IndexArrayField, IndexField};
use crate::primitive::Primitive;

/// Read access to the bytes of one record.
pub trait RecordRead {
    /// Read a signed byte.
    fn get_i8(&self, offset: usize) -> i8;
    /// Read a little-endian `i16`.
    fn get_i16(&self, offset: usize) -> i16;
    /// Read a little-endian `i32`.
    fn get_i32(&self, offset: usize) -> i32;
    /// Read a little-endian `i64`.
    fn get_i64(&self, offset: usize) -> i64;
    /// Read a little-endian `f32`.
    fn get_f32(&self, offset: usize) -> f32;
    /// Read a little-endian `f64`.
    fn get_f64(&self, offset: usize) -> f64;

    /// Read a scalar field.
    #[inline]
    fn get<T: Primitive>(&self, field: Field<T>) -> T {
        T::load(self, field.offset())
    }

    /// Read element `i` of an array field.
    #[inline]
    fn get_elem<T: Primitive>(&self, field: ArrayField<T>, i: usize) -> T {
        T::load(self, field.element_offset(i))
    }

    /// Copy an array field into `out` (up to the shorter of the two lengths).
    fn read_array<T: Primitive>(&self, field: ArrayField<T>, out: &mut [T]) {
        for (i, slot) in out.iter_mut().take(field.len()).enumerate() {
            *slot = self.get_elem(field, i);
        }
    }

    /// Read an index field; the field's sentinel reads as `None`.
    #[inline]
    fn get_index(&self, field: IndexField) -> Option<usize> {
        field.decode(self.get_i32(field.offset()))
    }

    /// Read the raw stored value of an index field.
    #[inline]
    fn get_index_raw(&self, field: IndexField) -> i32 {
        self.get_i32(field.offset())
    }

    /// Read element `i` of an index array.
    #[inline]
    fn get_index_elem(&self, field: IndexArrayField, i: usize) -> Option<usize> {
        self.get_index(field.element(i))
    }

    /// Read two index fields at once.
    ///
    /// When `second` directly follows `first` the pair is fetched as a
    /// single little-endian 8-byte load; otherwise two 4-byte loads.
    #[inline]
    fn get_index_pair(&self, first: IndexField, second: IndexField) -> (Option<usize>, Option<usize>) {
        if second.offset() == first.offset() + 4 {
            let packed = self.get_i64(first.offset());
            (first.decode(packed as i32), second.decode((packed >> 32) as i32))
        } else {
            (self.get_index(first), self.get_index(second))
        }
    }
}

/// Write access to the bytes of one record.
pub trait RecordWrite: RecordRead {
    /// Write a signed byte.
    fn put_i8(&mut self, offset: usize, value: i8);
    /// Write a little-endian `i16`.
    fn put_i16(&mut self, offset: usize, value: i16);
    /// Write a little-endian `i32`.
    fn put_i32(&mut self, offset: usize, value: i32);
    /// Write a little-endian `i64`.
    fn put_i64(&mut self, offset: usize, value: i64);
    /// Write a little-endian `f32`.
    fn put_f32(&mut self, offset: usize, value: f32);
    /// Write a little-endian `f64`.
    fn put_f64(&mut self, offset: usize, value: f64);

    /// Write a scalar field.
    #[inline]
    fn set<T: Primitive>(&mut self, field: Field<T>, value: T) {
        T::store(self, field.offset(), value);
    }

    /// Write element `i` of an array field.
    #[inline]
    fn set_elem<T: Primitive>(&mut self, field: ArrayField<T>, i: usize, value: T) {
        T::store(self, field.element_offset(i), value);
    }

    /// Copy `values` into an array field (up to the shorter of the two lengths).
    fn write_array<T: Primitive>(&mut self, field: ArrayField<T>, values: &[T]) {
        for (i, &v) in values.iter().take(field.len()).enumerate() {
            self.set_elem(field, i, v);
        }
    }

    /// Write an index field; `None` stores the field's sentinel.
    #[inline]
    #[track_caller]
    fn set_index(&mut self, field: IndexField, index: Option<usize>) {
        let raw = field.encode(index);
        self.put_i32(field.offset(), raw);
    }

    /// Write the raw stored value of an index field.
    #[inline]
    fn set_index_raw(&mut self, field: IndexField, raw: i32) {
        self.put_i32(field.offset(), raw);
    }

    /// Write element `i` of an index array.
    #[inline]
    #[track_caller]
    fn set_index_elem(&mut self, field: IndexArrayField, i: usize, index: Option<usize>) {
        self.set_index(field.element(i), index);
    }

    /// Set every element of an index array to "no link".
    fn clear_index_array(&mut self, field: IndexArrayField) {
        for i in 0..field.len() {
            self.set_index(field.element(i), None);
        }
    }
}
