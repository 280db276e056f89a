//! Recpool: pooled fixed-layout records in flat storage.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the recpool sub-crates. Records are declared as a layout of primitive
//! fields, stored back to back in a slot arena, and reached through small
//! reusable proxies instead of one heap object per record.
//!
//! # Quick start
//!
//! ```rust
//! use recpool::prelude::*;
//!
//! // A proxy type naming one node slot.
//! #[derive(Clone, Copy, Debug, PartialEq, Eq)]
//! struct Node(Slot);
//! impl Proxy for Node {
//!     fn slot(&self) -> &Slot { &self.0 }
//!     fn slot_mut(&mut self) -> &mut Slot { &mut self.0 }
//! }
//!
//! // Layout: a weight and a link to the next node.
//! let mut b = RecordLayoutBuilder::new();
//! let weight = b.double_field();
//! let next = b.index_field();
//! let layout = b.build();
//!
//! struct NodeFactory { next: IndexField }
//! impl ProxyFactory<Node> for NodeFactory {
//!     fn create_ref(&self, slot: Slot) -> Node { Node(slot) }
//!     fn set_to_uninitialized_state<W: RecordWrite>(&self, record: &mut W) {
//!         record.set_index(self.next, None);
//!     }
//! }
//!
//! let mut pool = ObjectPool::new(
//!     PoolConfig::new(16),
//!     layout,
//!     NodeFactory { next },
//!     HeapBytes::new(),
//! )
//! .unwrap();
//!
//! let a = pool.create_new().unwrap();
//! let b = pool.create_new().unwrap();
//! pool.record_mut(&a).set(weight, 1.5);
//! pool.record_mut(&a).set_index(next, Some(b.index()));
//!
//! assert_eq!(pool.record(&a).get(weight), 1.5);
//! assert_eq!(pool.record(&a).get_index(next), Some(1));
//! assert_eq!(pool.record(&b).get_index(next), None);
//!
//! pool.delete(&a).unwrap();
//! assert_eq!(pool.size(), 1);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `recpool-core` | Layouts, field handles, record access traits, errors |
//! | [`arena`] | `recpool-arena` | Storage media, slot arenas, free lists, live traversal |
//! | [`pool`] | `recpool-pool` | Object pools, proxies, property map registry |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Layouts, field handles and record access traits (`recpool-core`).
///
/// Declare records with [`types::RecordLayoutBuilder`] and read or write
/// them through [`types::RecordRead`] and [`types::RecordWrite`].
pub use recpool_core as types;

/// Slot arenas and storage media (`recpool-arena`).
///
/// [`arena::Arena`] manages slots over a [`arena::Medium`]:
/// [`arena::HeapBytes`], [`arena::NativeBytes`] or [`arena::HeapDoubles`].
pub use recpool_arena as arena;

/// Object pools and flyweight proxies (`recpool-pool`).
///
/// [`pool::ObjectPool`] hands out slots through [`pool::Proxy`] handles
/// and forwards lifecycle events to registered [`pool::PropertyMap`]s.
pub use recpool_pool as pool;

/// Common imports for typical recpool usage.
///
/// ```rust
/// use recpool::prelude::*;
/// ```
pub mod prelude {
    // Layouts and record access
    pub use recpool_core::{
        ArrayField, Field, IndexArrayField, IndexField, RecordLayout, RecordLayoutBuilder,
        RecordRead, RecordWrite,
    };

    // Errors
    pub use recpool_core::{ArenaError, ConfigError, PoolError};

    // Storage
    pub use recpool_arena::{ArenaConfig, FreePolicy, Growth, HeapBytes, HeapDoubles, NativeBytes};

    // Pool
    pub use recpool_pool::{
        ObjectPool, PoolConfig, PropertyMap, Proxy, ProxyFactory, Slot, SlotFactory,
    };
}
