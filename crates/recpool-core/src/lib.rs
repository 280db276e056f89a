//! Core types for the recpool record allocator.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! pieces every other recpool crate builds on: the declarative
//! [`RecordLayoutBuilder`], typed field handles, the primitive codecs that
//! turn a field handle into a byte-offset access, the [`RecordRead`] /
//! [`RecordWrite`] traits implemented by arena record views, pool identity,
//! error types, and the process-wide [`DEBUG_CHECKS`] flag.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod layout;
pub mod primitive;
pub mod traits;

pub use error::{ArenaError, ConfigError, PoolError};
pub use id::{PoolId, NO_INDEX};
pub use layout::{
    ArrayField, Field, FieldKind, FieldSpec, IndexArrayField, IndexField, RecordLayout,
    RecordLayoutBuilder,
};
pub use primitive::Primitive;
pub use traits::{RecordRead, RecordWrite};

/// Whether bounds-checked field access and free/double-free assertions
/// are compiled in.
///
/// Fixed at compile time: on for debug builds and for any build with the
/// `debug-checks` feature, off for plain release builds. There is no way
/// to flip it at runtime.
pub const DEBUG_CHECKS: bool = cfg!(any(debug_assertions, feature = "debug-checks"));

/// Panic with an [`ArenaError::OutOfBounds`] if `offset + width` does not
/// fit inside a record of `limit` bytes.
///
/// A no-op when [`DEBUG_CHECKS`] is off.
#[inline]
#[track_caller]
pub fn check_field_bounds(offset: usize, width: usize, limit: usize) {
    if DEBUG_CHECKS && offset.checked_add(width).is_none_or(|end| end > limit) {
        panic!(
            "{}",
            ArenaError::OutOfBounds {
                offset,
                width,
                limit,
            }
        );
    }
}
