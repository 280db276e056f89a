//! The list of backing arrays behind one arena, and its growth strategies.
//!
//! An [`ArrayChain`] maps a flat slot index to `(array, element)` by
//! dividing by a fixed per-array element count. Every array except the
//! last is always full, so the mapping never needs a search.
//!
//! - Single-array growth keeps exactly one array and doubles it up to the
//!   medium's ceiling.
//! - Multi-array growth first grows the last, partial array toward the
//!   per-array cap, then appends fresh full-size arrays until the
//!   configured array count is reached.

use recpool_core::{ArenaError, ConfigError};

use crate::config::Growth;
use crate::medium::{BackingArray, MappedRecord, Medium};

/// Growable list of same-stride backing arrays.
#[derive(Debug)]
pub struct ArrayChain<A: BackingArray> {
    arrays: Vec<A>,
    stride: usize,
    /// Slots per full array. For single-array growth this is the medium's
    /// ceiling, so every index maps to array 0.
    elements_per_array: usize,
    max_arrays: usize,
    multi: bool,
}

impl<A: BackingArray> ArrayChain<A> {
    /// Allocate the initial arrays for `initial_capacity` slots.
    pub fn new<M: Medium<Array = A>>(
        medium: &M,
        stride: usize,
        initial_capacity: usize,
        growth: Growth,
    ) -> Result<Self, ConfigError> {
        let medium_max = medium.max_elements(stride);
        if medium_max == 0 {
            return Err(ConfigError::StrideTooLarge { stride });
        }

        match growth {
            Growth::SingleArray => {
                if initial_capacity > medium_max {
                    return Err(ConfigError::InitialCapacityTooLarge {
                        requested: initial_capacity,
                        max: medium_max,
                    });
                }
                Ok(Self {
                    arrays: vec![medium.allocate(stride, initial_capacity)],
                    stride,
                    elements_per_array: medium_max,
                    max_arrays: 1,
                    multi: false,
                })
            }
            Growth::MultiArray {
                elements_per_array,
                max_arrays,
            } => {
                let per = elements_per_array.unwrap_or(medium_max).min(medium_max);
                if per == 0 {
                    return Err(ConfigError::InvalidMultiArray {
                        reason: "elements_per_array must be > 0".into(),
                    });
                }
                let max_arrays = max_arrays.unwrap_or(usize::MAX);
                let needed = initial_capacity.div_ceil(per).max(1);
                if needed > max_arrays {
                    return Err(ConfigError::InitialCapacityTooLarge {
                        requested: initial_capacity,
                        max: per.saturating_mul(max_arrays),
                    });
                }
                let mut arrays = Vec::with_capacity(needed);
                for _ in 1..needed {
                    arrays.push(medium.allocate(stride, per));
                }
                arrays.push(medium.allocate(stride, initial_capacity - per * (needed - 1)));
                Ok(Self {
                    arrays,
                    stride,
                    elements_per_array: per,
                    max_arrays,
                    multi: true,
                })
            }
        }
    }

    /// Total slots across all arrays.
    pub fn capacity(&self) -> usize {
        let full = (self.arrays.len() - 1) * self.elements_per_array;
        full + self.arrays.last().map_or(0, BackingArray::size)
    }

    /// Largest capacity growth can ever reach.
    pub fn max_capacity(&self) -> usize {
        self.elements_per_array.saturating_mul(self.max_arrays)
    }

    /// Bytes per slot.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Slots per full array.
    pub fn elements_per_array(&self) -> usize {
        self.elements_per_array
    }

    /// Whether this chain uses multi-array growth.
    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// The backing arrays in index order.
    pub fn arrays(&self) -> &[A] {
        &self.arrays
    }

    /// Bytes of storage held across all arrays.
    pub fn memory_bytes(&self) -> usize {
        self.arrays.iter().map(BackingArray::memory_bytes).sum()
    }

    /// Map a flat slot index to `(array, element)`.
    #[inline]
    pub fn split(&self, index: usize) -> (usize, usize) {
        (index / self.elements_per_array, index % self.elements_per_array)
    }

    /// Map a flat slot index to its array and byte base.
    #[inline]
    pub fn locate(&self, index: usize) -> MappedRecord {
        let (array, element) = self.split(index);
        MappedRecord {
            array,
            base: element * self.stride,
        }
    }

    /// Shared access to array `i`.
    #[inline]
    pub fn array(&self, i: usize) -> &A {
        &self.arrays[i]
    }

    /// Exclusive access to array `i`.
    #[inline]
    pub fn array_mut(&mut self, i: usize) -> &mut A {
        &mut self.arrays[i]
    }

    /// Exchange the contents of slots `a` and `b`, which may live in
    /// different arrays.
    pub fn swap(&mut self, a: usize, b: usize) {
        let (array_a, elem_a) = self.split(a);
        let (array_b, elem_b) = self.split(b);
        if array_a == array_b {
            self.arrays[array_a].swap_within(elem_a, elem_b);
            return;
        }
        let (lo, hi, elem_lo, elem_hi) = if array_a < array_b {
            (array_a, array_b, elem_a, elem_b)
        } else {
            (array_b, array_a, elem_b, elem_a)
        };
        let (left, right) = self.arrays.split_at_mut(hi);
        left[lo].swap_element(elem_lo, &mut right[0], elem_hi);
    }

    /// Grow until at least `required` slots exist.
    ///
    /// Existing bytes are preserved; new slots are zeroed.
    pub fn grow_to_fit<M: Medium<Array = A>>(
        &mut self,
        medium: &M,
        required: usize,
    ) -> Result<(), ArenaError> {
        let before = self.capacity();
        if required <= before {
            return Ok(());
        }
        let max = self.max_capacity();
        if required > max {
            tracing::warn!(
                medium = medium.name(),
                requested = required,
                max = max,
                "Arena growth refused: medium limit reached"
            );
            return Err(ArenaError::CapacityExceeded {
                requested: required,
                max,
            });
        }

        while self.capacity() < required {
            let full_before = (self.arrays.len() - 1) * self.elements_per_array;
            let per = self.elements_per_array;
            let last = self
                .arrays
                .last_mut()
                .ok_or(ArenaError::CapacityExceeded {
                    requested: required,
                    max,
                })?;
            let size = last.size();
            if size < per {
                let new_size = (size * 2).max(required - full_before).max(1).min(per);
                last.resize(new_size);
            } else {
                self.arrays.push(medium.allocate(self.stride, per));
            }
        }

        tracing::debug!(
            medium = medium.name(),
            strategy = if self.multi { "multi-array" } else { "single-array" },
            old_capacity = before,
            new_capacity = self.capacity(),
            arrays = self.arrays.len(),
            "Arena storage grew"
        );
        Ok(())
    }
}
