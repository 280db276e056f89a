//! Pool identity and the "no index" sentinel.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// The conventional "points nowhere" value for index fields.
///
/// Index fields store another slot's index as a 4-byte integer. Links that
/// lead nowhere hold this value instead of a real index.
pub const NO_INDEX: i32 = -1;

/// Counter for unique [`PoolId`] allocation.
static POOL_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for an object pool.
///
/// Every proxy remembers the pool that created it, so that a proxy can
/// never be repointed at (or allocate from) a different pool's storage.
/// Two pools never share an ID within one process, even if one is dropped
/// and another is created at the same address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(u64);

impl PoolId {
    /// Allocate a fresh, unique pool ID. Thread-safe.
    pub fn next() -> Self {
        Self(POOL_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_ids_are_unique() {
        let a = PoolId::next();
        let b = PoolId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }
}
