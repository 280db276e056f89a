//! Primitive codecs connecting typed field handles to byte-offset access.

use crate::layout::FieldKind;
use crate::traits::{RecordRead, RecordWrite};

mod sealed {
    pub trait Sealed {}
    impl Sealed for bool {}
    impl Sealed for i8 {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A value type that can live in a record field.
///
/// Sealed: the set of storable primitives is fixed by the record contract
/// (all multi-byte values are little-endian).
pub trait Primitive: Copy + sealed::Sealed + 'static {
    /// Field kind tag used in layout descriptions.
    const KIND: FieldKind;
    /// Bytes per value.
    const SIZE: usize;

    /// Read a value at `offset` within the record.
    fn load<R: RecordRead + ?Sized>(record: &R, offset: usize) -> Self;

    /// Write a value at `offset` within the record.
    fn store<W: RecordWrite + ?Sized>(record: &mut W, offset: usize, value: Self);
}

impl Primitive for bool {
    const KIND: FieldKind = FieldKind::Bool;
    const SIZE: usize = 1;

    #[inline]
    fn load<R: RecordRead + ?Sized>(record: &R, offset: usize) -> Self {
        record.get_i8(offset) != 0
    }

    #[inline]
    fn store<W: RecordWrite + ?Sized>(record: &mut W, offset: usize, value: Self) {
        record.put_i8(offset, value as i8);
    }
}

macro_rules! primitive {
    ($ty:ty, $kind:ident, $get:ident, $put:ident) => {
        impl Primitive for $ty {
            const KIND: FieldKind = FieldKind::$kind;
            const SIZE: usize = std::mem::size_of::<$ty>();

            #[inline]
            fn load<R: RecordRead + ?Sized>(record: &R, offset: usize) -> Self {
                record.$get(offset)
            }

            #[inline]
            fn store<W: RecordWrite + ?Sized>(record: &mut W, offset: usize, value: Self) {
                record.$put(offset, value);
            }
        }
    };
}

primitive!(i8, Byte, get_i8, put_i8);
primitive!(i16, Short, get_i16, put_i16);
primitive!(i32, Int, get_i32, put_i32);
primitive!(i64, Long, get_i64, put_i64);
primitive!(f32, Float, get_f32, put_f32);
primitive!(f64, Double, get_f64, put_f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_kinds() {
        assert_eq!(<bool as Primitive>::SIZE, FieldKind::Bool.size_in_bytes());
        assert_eq!(<i16 as Primitive>::SIZE, FieldKind::Short.size_in_bytes());
        assert_eq!(<i64 as Primitive>::SIZE, FieldKind::Long.size_in_bytes());
        assert_eq!(<f32 as Primitive>::SIZE, FieldKind::Float.size_in_bytes());
    }
}
