//! Fixed-size slot arenas over pluggable storage media.
//!
//! An [`Arena`] hands out integer slot indices in O(1), recycles freed
//! slots through an intrusive free list written into the freed slots'
//! own bytes, and grows its storage on demand. Slot contents are read and
//! written through short-lived [`Record`] / [`RecordMut`] views that are
//! re-derived from the arena on every access, so growth never leaves a
//! dangling view behind.
//!
//! # Architecture
//!
//! ```text
//! Arena<M: Medium>
//! ├── ArrayChain<M::Array>   (one array, or many for multi-array growth)
//! │   └── BackingArray[]     (HeapByteArray | NativeByteArray | HeapDoubleArray)
//! ├── FreeSlotHeader         (marker + next-link layout inside freed slots)
//! └── counters               (capacity ≥ allocated_size ≥ size)
//! ```
//!
//! # Media
//!
//! - [`HeapBytes`]: a `Vec<u8>` per array.
//! - [`NativeBytes`]: a 64-byte aligned buffer from the global allocator.
//! - [`HeapDoubles`]: a `Vec<f64>` per array, for consumers that want to
//!   scan packed coordinates directly.
//!
//! All three behave identically from the arena's point of view.
//!
//! # Unsafe code
//!
//! Only `raw.rs` (the native buffer) contains `unsafe`, each block with a
//! `// SAFETY:` comment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
mod bytes;
pub mod config;
pub mod freelist;
pub mod heap_bytes;
pub mod heap_doubles;
pub mod iter;
pub mod medium;
pub mod native;
mod raw;
pub mod storage;
pub mod view;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use config::{ArenaConfig, FreePolicy, Growth};
pub use freelist::{FreeSlotHeader, LinkWidth, FREE_SLOT_MARKER};
pub use heap_bytes::{HeapByteArray, HeapBytes};
pub use heap_doubles::{HeapDoubleArray, HeapDoubles};
pub use iter::{LiveCursor, LiveIter};
pub use medium::{BackingArray, MappedRecord, Medium};
pub use native::{NativeByteArray, NativeBytes};
pub use view::{Record, RecordMut};
