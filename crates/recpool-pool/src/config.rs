//! Pool configuration.

use recpool_arena::ArenaConfig;
use recpool_core::ConfigError;

/// Configuration for an [`ObjectPool`](crate::ObjectPool).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolConfig {
    /// Slot storage settings.
    pub arena: ArenaConfig,
    /// Cap on idle proxies kept for reuse. `None` keeps every released
    /// proxy; with a cap, proxies released into a full queue are dropped.
    pub max_spare_refs: Option<usize>,
}

impl PoolConfig {
    /// Default arena settings with `initial_capacity` slots and an
    /// unbounded spare queue.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            arena: ArenaConfig::new(initial_capacity),
            max_spare_refs: None,
        }
    }

    /// Replace the arena settings.
    pub fn with_arena(mut self, arena: ArenaConfig) -> Self {
        self.arena = arena;
        self
    }

    /// Bound the spare proxy queue.
    pub fn with_max_spare_refs(mut self, max: usize) -> Self {
        self.max_spare_refs = Some(max);
        self
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_spare_refs == Some(0) {
            return Err(ConfigError::ZeroSpareRefCapacity);
        }
        self.arena.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recpool_arena::FreePolicy;

    #[test]
    fn default_queue_is_unbounded() {
        let config = PoolConfig::default();
        assert_eq!(config.max_spare_refs, None);
        assert_eq!(config.arena, ArenaConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_spare_cap_is_rejected() {
        let config = PoolConfig::new(8).with_max_spare_refs(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroSpareRefCapacity));
    }

    #[test]
    fn arena_errors_surface() {
        let config = PoolConfig::new(8).with_arena(ArenaConfig::multi_array(8, 0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMultiArray { .. })
        ));
    }

    #[test]
    fn builder_keeps_arena_policy() {
        let arena = ArenaConfig::new(4).with_free_policy(FreePolicy::FreeListScan);
        let config = PoolConfig::new(1).with_arena(arena.clone()).with_max_spare_refs(3);
        assert_eq!(config.arena, arena);
        assert_eq!(config.max_spare_refs, Some(3));
    }
}
