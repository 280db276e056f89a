//! Object pools of flyweight proxies over recpool arenas.
//!
//! An [`ObjectPool`] combines a [`RecordLayout`](recpool_core::RecordLayout),
//! an [`Arena`](recpool_arena::Arena) and a [`ProxyFactory`]. Callers
//! allocate and look up records through small reusable [`Proxy`] handles
//! and read or write fields through short-lived record views.
//!
//! ```text
//! ObjectPool<P, F, M>
//! ├── Arena<M>             slot allocation, free list, growth
//! ├── ProxyFactory F       builds P, resets reused slots
//! ├── spare queue          crossbeam MPMC channel of idle P
//! └── PropertyRegistry     lifecycle + pause/resume fan-out
//! ```
//!
//! Proxies are positional: equality means "names the same slot of the
//! same pool right now". A proxy created by one pool is refused by every
//! other pool.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod iter;
pub mod pool;
pub mod proxy;
pub mod registry;

pub use config::PoolConfig;
pub use iter::Iter;
pub use pool::{ObjectPool, PauseGuard};
pub use proxy::{Proxy, ProxyFactory, Slot, SlotFactory};
pub use registry::{PropertyMap, PropertyMapId, PropertyRegistry};
