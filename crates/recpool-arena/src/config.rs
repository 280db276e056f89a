//! Arena configuration parameters.

use recpool_core::ConfigError;

/// How an arena grows when it runs out of slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Growth {
    /// One backing array whose capacity doubles up to the medium's
    /// `max_size()`. Passing that limit is a fatal error.
    SingleArray,
    /// A list of backing arrays. The last array grows toward the cap; once
    /// full, a new full-size array is appended. Used to hold more slots
    /// than a single array of the medium can address.
    MultiArray {
        /// Per-array element cap. `None` uses the medium's `max_size()`;
        /// larger values are clamped to it.
        elements_per_array: Option<usize>,
        /// Maximum number of arrays. `None` is unbounded.
        max_arrays: Option<usize>,
    },
}

/// How iteration (and `is_free`) tells freed slots from live ones.
///
/// Trades safety against speed. The choice also decides whether freed
/// slots carry the [`FREE_SLOT_MARKER`](crate::FREE_SLOT_MARKER).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FreePolicy {
    /// Visit every allocated index. Only correct if the caller never
    /// frees slots during the pool's lifetime. Freed slots carry no marker.
    Unchecked,
    /// Skip slots whose first four bytes equal the free marker. Requires
    /// that no live record ever starts with that exact value.
    #[default]
    SentinelCheck,
    /// Walk the free list before each pass and skip exactly those indices.
    /// Slowest, never fooled by record contents.
    FreeListScan,
}

/// Configuration for an [`Arena`](crate::Arena).
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Number of slots allocated up front.
    pub initial_capacity: usize,
    /// Growth strategy.
    pub growth: Growth,
    /// Free-slot detection policy.
    pub free_policy: FreePolicy,
}

impl ArenaConfig {
    /// Default initial capacity in slots.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

    /// Single-array growth with sentinel-checked iteration.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            growth: Growth::SingleArray,
            free_policy: FreePolicy::default(),
        }
    }

    /// Replace the growth strategy.
    pub fn with_growth(mut self, growth: Growth) -> Self {
        self.growth = growth;
        self
    }

    /// Replace the free-slot policy.
    pub fn with_free_policy(mut self, free_policy: FreePolicy) -> Self {
        self.free_policy = free_policy;
        self
    }

    /// Shorthand for multi-array growth with the given per-array cap.
    pub fn multi_array(initial_capacity: usize, elements_per_array: usize) -> Self {
        Self::new(initial_capacity).with_growth(Growth::MultiArray {
            elements_per_array: Some(elements_per_array),
            max_arrays: None,
        })
    }

    /// Check the values that do not depend on the medium.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Growth::MultiArray {
            elements_per_array,
            max_arrays,
        } = self.growth
        {
            if elements_per_array == Some(0) {
                return Err(ConfigError::InvalidMultiArray {
                    reason: "elements_per_array must be > 0".into(),
                });
            }
            if max_arrays == Some(0) {
                return Err(ConfigError::InvalidMultiArray {
                    reason: "max_arrays must be > 0".into(),
                });
            }
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_single_array_sentinel() {
        let config = ArenaConfig::default();
        assert_eq!(config.initial_capacity, 1024);
        assert_eq!(config.growth, Growth::SingleArray);
        assert_eq!(config.free_policy, FreePolicy::SentinelCheck);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_element_cap_is_rejected() {
        let config = ArenaConfig::multi_array(16, 0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMultiArray { .. })
        ));
    }

    #[test]
    fn zero_max_arrays_is_rejected() {
        let config = ArenaConfig::new(16).with_growth(Growth::MultiArray {
            elements_per_array: None,
            max_arrays: Some(0),
        });
        assert!(config.validate().is_err());
    }
}
