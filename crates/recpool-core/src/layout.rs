//! Declarative record layouts.
//!
//! A [`RecordLayoutBuilder`] hands out one typed field handle per declared
//! field. Offsets are issued strictly in declaration order with no padding
//! or alignment, so callers control the byte layout exactly: two index
//! fields declared back to back can later be read as one 8-byte unit with
//! [`RecordRead::get_index_pair`](crate::RecordRead::get_index_pair).
//!
//! ```
//! use recpool_core::RecordLayoutBuilder;
//!
//! let mut b = RecordLayoutBuilder::new();
//! let first_edge = b.index_field();
//! let x = b.double_field();
//! let y = b.double_field();
//! let layout = b.build();
//!
//! assert_eq!(first_edge.offset(), 0);
//! assert_eq!(x.offset(), 4);
//! assert_eq!(y.offset(), 12);
//! assert_eq!(layout.size_in_bytes(), 20);
//! ```

use std::fmt;
use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::id::NO_INDEX;
use crate::primitive::Primitive;

/// The primitive type stored by a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// One byte, zero is `false`.
    Bool,
    /// Signed 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Short,
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Another slot's index, encoded as a 4-byte integer.
    Index,
}

impl FieldKind {
    /// Bytes occupied by one element of this kind.
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::Bool | Self::Byte => 1,
            Self::Short => 2,
            Self::Int | Self::Float | Self::Index => 4,
            Self::Long | Self::Double => 8,
        }
    }
}

/// One declared field: its kind, position and element count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Element type.
    pub kind: FieldKind,
    /// Byte offset from the start of the record.
    pub offset: usize,
    /// Number of elements; 1 for scalar fields.
    pub len: usize,
    /// Whether the field was declared as a fixed-length array.
    pub array: bool,
}

impl FieldSpec {
    /// Total bytes reserved for this field.
    pub fn size_in_bytes(&self) -> usize {
        self.kind.size_in_bytes() * self.len
    }
}

/// Handle to a scalar field of primitive type `T`.
pub struct Field<T> {
    offset: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Primitive> Field<T> {
    pub(crate) fn new(offset: usize) -> Self {
        Self {
            offset,
            _marker: PhantomData,
        }
    }

    /// Byte offset within the record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes occupied by the field.
    pub fn size_in_bytes(&self) -> usize {
        T::SIZE
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

impl<T> PartialEq for Field<T> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
    }
}

impl<T> Eq for Field<T> {}

impl<T: Primitive> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field<{:?}>@{}", T::KIND, self.offset)
    }
}

/// Handle to a fixed-length array of primitive type `T`.
pub struct ArrayField<T> {
    offset: usize,
    len: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Primitive> ArrayField<T> {
    pub(crate) fn new(offset: usize, len: usize) -> Self {
        Self {
            offset,
            len,
            _marker: PhantomData,
        }
    }

    /// Byte offset of element 0 within the record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes occupied by the whole array.
    pub fn size_in_bytes(&self) -> usize {
        T::SIZE * self.len
    }

    /// Byte offset of element `i` within the record.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len` while [`DEBUG_CHECKS`](crate::DEBUG_CHECKS) is on.
    #[inline]
    #[track_caller]
    pub fn element_offset(&self, i: usize) -> usize {
        if crate::DEBUG_CHECKS {
            assert!(
                i < self.len,
                "array element {i} out of bounds (len {})",
                self.len
            );
        }
        self.offset + i * T::SIZE
    }
}

impl<T> Clone for ArrayField<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArrayField<T> {}

impl<T: Primitive> fmt::Debug for ArrayField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArrayField<{:?}; {}>@{}", T::KIND, self.len, self.offset)
    }
}

/// Handle to an index ("pointer") field.
///
/// Stored exactly like a 4-byte integer. The caller-chosen `none` value
/// (usually [`NO_INDEX`]) stands for "no link" and reads back as `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexField {
    offset: usize,
    none: i32,
}

impl IndexField {
    /// Byte offset within the record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The raw value that encodes "no link".
    pub fn none(&self) -> i32 {
        self.none
    }

    /// Bytes occupied by the field.
    pub fn size_in_bytes(&self) -> usize {
        4
    }

    /// Encode an optional slot index into its stored form.
    ///
    /// # Panics
    ///
    /// Panics if the index does not fit in 31 bits or collides with the
    /// `none` sentinel.
    #[inline]
    #[track_caller]
    pub fn encode(&self, index: Option<usize>) -> i32 {
        match index {
            None => self.none,
            Some(i) => {
                let raw = i32::try_from(i)
                    .unwrap_or_else(|_| panic!("slot index {i} does not fit an index field"));
                assert!(raw != self.none, "slot index {i} collides with the none sentinel");
                raw
            }
        }
    }

    /// Decode a stored value.
    ///
    /// The `none` sentinel reads as `None`. So does every negative value,
    /// whatever the sentinel: a negative raw value cannot name a slot, and
    /// [`encode`](Self::encode) never produces one for `Some`.
    #[inline]
    pub fn decode(&self, raw: i32) -> Option<usize> {
        if raw == self.none || raw < 0 {
            None
        } else {
            Some(raw as usize)
        }
    }
}

/// Handle to a fixed-length array of index fields sharing one sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexArrayField {
    offset: usize,
    len: usize,
    none: i32,
}

impl IndexArrayField {
    /// Byte offset of element 0 within the record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes occupied by the whole array.
    pub fn size_in_bytes(&self) -> usize {
        4 * self.len
    }

    /// The scalar index field for element `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len` while [`DEBUG_CHECKS`](crate::DEBUG_CHECKS) is on.
    #[inline]
    #[track_caller]
    pub fn element(&self, i: usize) -> IndexField {
        if crate::DEBUG_CHECKS {
            assert!(
                i < self.len,
                "index array element {i} out of bounds (len {})",
                self.len
            );
        }
        IndexField {
            offset: self.offset + 4 * i,
            none: self.none,
        }
    }
}

/// Accumulates field declarations and assigns offsets.
///
/// Every `*_field` method appends one field at the current end of the
/// record and returns its handle. [`size_in_bytes`](Self::size_in_bytes)
/// reports the running total; [`build`](Self::build) freezes the layout.
#[derive(Clone, Debug, Default)]
pub struct RecordLayoutBuilder {
    fields: SmallVec<[FieldSpec; 8]>,
    size: usize,
}

impl RecordLayoutBuilder {
    /// Start an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: FieldKind, len: usize, array: bool) -> usize {
        let offset = self.size;
        let spec = FieldSpec {
            kind,
            offset,
            len,
            array,
        };
        self.size += spec.size_in_bytes();
        self.fields.push(spec);
        offset
    }

    fn scalar<T: Primitive>(&mut self) -> Field<T> {
        Field::new(self.push(T::KIND, 1, false))
    }

    fn array<T: Primitive>(&mut self, len: usize) -> ArrayField<T> {
        ArrayField::new(self.push(T::KIND, len, true), len)
    }

    /// Declare a boolean field.
    pub fn bool_field(&mut self) -> Field<bool> {
        self.scalar()
    }

    /// Declare a signed byte field.
    pub fn byte_field(&mut self) -> Field<i8> {
        self.scalar()
    }

    /// Declare a 16-bit integer field.
    pub fn short_field(&mut self) -> Field<i16> {
        self.scalar()
    }

    /// Declare a 32-bit integer field.
    pub fn int_field(&mut self) -> Field<i32> {
        self.scalar()
    }

    /// Declare a 64-bit integer field.
    pub fn long_field(&mut self) -> Field<i64> {
        self.scalar()
    }

    /// Declare a 32-bit float field.
    pub fn float_field(&mut self) -> Field<f32> {
        self.scalar()
    }

    /// Declare a 64-bit float field.
    pub fn double_field(&mut self) -> Field<f64> {
        self.scalar()
    }

    /// Declare an index field whose "no link" value is [`NO_INDEX`].
    pub fn index_field(&mut self) -> IndexField {
        self.index_field_with_none(NO_INDEX)
    }

    /// Declare an index field with a caller-chosen "no link" value.
    pub fn index_field_with_none(&mut self, none: i32) -> IndexField {
        let offset = self.push(FieldKind::Index, 1, false);
        IndexField { offset, none }
    }

    /// Declare a fixed-length boolean array.
    pub fn bool_array(&mut self, len: usize) -> ArrayField<bool> {
        self.array(len)
    }

    /// Declare a fixed-length signed byte array.
    pub fn byte_array(&mut self, len: usize) -> ArrayField<i8> {
        self.array(len)
    }

    /// Declare a fixed-length 16-bit integer array.
    pub fn short_array(&mut self, len: usize) -> ArrayField<i16> {
        self.array(len)
    }

    /// Declare a fixed-length 32-bit integer array.
    pub fn int_array(&mut self, len: usize) -> ArrayField<i32> {
        self.array(len)
    }

    /// Declare a fixed-length 64-bit integer array.
    pub fn long_array(&mut self, len: usize) -> ArrayField<i64> {
        self.array(len)
    }

    /// Declare a fixed-length 32-bit float array.
    pub fn float_array(&mut self, len: usize) -> ArrayField<f32> {
        self.array(len)
    }

    /// Declare a fixed-length 64-bit float array.
    pub fn double_array(&mut self, len: usize) -> ArrayField<f64> {
        self.array(len)
    }

    /// Declare a fixed-length array of index fields using [`NO_INDEX`].
    pub fn index_array(&mut self, len: usize) -> IndexArrayField {
        let offset = self.push(FieldKind::Index, len, true);
        IndexArrayField {
            offset,
            len,
            none: NO_INDEX,
        }
    }

    /// Running total of declared bytes.
    pub fn size_in_bytes(&self) -> usize {
        self.size
    }

    /// Fields declared so far, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Freeze the layout.
    pub fn build(self) -> RecordLayout {
        RecordLayout {
            fields: self.fields,
            size: self.size,
        }
    }
}

/// A frozen record layout shared by every slot of one arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordLayout {
    fields: SmallVec<[FieldSpec; 8]>,
    size: usize,
}

impl RecordLayout {
    /// Record size in bytes: the sum of all field sizes.
    pub fn size_in_bytes(&self) -> usize {
        self.size
    }

    /// Declared fields in offset order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields were declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
