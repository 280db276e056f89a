//! Proxy-yielding traversal of a pool.

use recpool_arena::{LiveIter, Medium};

use crate::pool::ObjectPool;
use crate::proxy::{Proxy, ProxyFactory};

/// Iterator yielding one proxy per live slot, in ascending index order.
///
/// Proxies come from the pool's spare queue when one is available.
/// Callers that only need to look at each record should prefer
/// [`ObjectPool::for_each_live`], which reuses a single proxy.
pub struct Iter<'a, P: Proxy, F: ProxyFactory<P>, M: Medium> {
    pool: &'a ObjectPool<P, F, M>,
    indices: LiveIter<'a, M>,
}

impl<'a, P: Proxy, F: ProxyFactory<P>, M: Medium> Iter<'a, P, F, M> {
    pub(crate) fn new(pool: &'a ObjectPool<P, F, M>) -> Self {
        Self {
            pool,
            indices: pool.live_indices(),
        }
    }
}

impl<P: Proxy, F: ProxyFactory<P>, M: Medium> Iterator for Iter<'_, P, F, M> {
    type Item = P;

    fn next(&mut self) -> Option<P> {
        let index = self.indices.next()?;
        let mut proxy = self.pool.create_ref();
        self.pool.get_object(index, &mut proxy);
        Some(proxy)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use crate::{ObjectPool, PoolConfig, Proxy, SlotFactory};
    use recpool_arena::{ArenaConfig, FreePolicy, NativeBytes};
    use recpool_core::RecordLayoutBuilder;

    #[test]
    fn yields_live_slots_in_order() {
        let mut b = RecordLayoutBuilder::new();
        b.int_field();
        let config = PoolConfig::new(10)
            .with_arena(ArenaConfig::new(10).with_free_policy(FreePolicy::FreeListScan));
        let mut pool = ObjectPool::new(config, b.build(), SlotFactory, NativeBytes::new()).unwrap();
        let slots: Vec<_> = (0..10).map(|_| pool.create_new().unwrap()).collect();
        for i in [2, 5, 7] {
            pool.delete(&slots[i]).unwrap();
        }
        let seen: Vec<usize> = pool.iter().map(|p| p.index()).collect();
        assert_eq!(seen, vec![0, 1, 3, 4, 6, 8, 9]);
    }
}
