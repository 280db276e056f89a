//! Error types for the recpool allocator.
//!
//! Split by when the mistake is detected: [`ConfigError`] at construction,
//! [`ArenaError`] during slot management, and [`PoolError`] at the proxy
//! and pool layer. None of these are retried internally; each one means
//! the caller asked for something the allocator cannot do.

use std::error::Error;
use std::fmt;

use crate::id::PoolId;

/// Invalid arena or pool configuration, rejected before any storage is
/// handed out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The record layout declares no bytes at all.
    EmptyRecord,
    /// The initial capacity cannot be represented by the backing medium.
    InitialCapacityTooLarge {
        /// Requested number of slots.
        requested: usize,
        /// Largest slot count the medium (and growth strategy) allows.
        max: usize,
    },
    /// A multi-array arena was configured with a zero element cap or a
    /// zero array count.
    InvalidMultiArray {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// A bounded spare-proxy queue was requested with capacity zero.
    ZeroSpareRefCapacity,
    /// The medium cannot hold even one slot of the requested stride.
    StrideTooLarge {
        /// Bytes per slot after padding.
        stride: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRecord => write!(f, "record layout declares no fields"),
            Self::InitialCapacityTooLarge { requested, max } => {
                write!(
                    f,
                    "initial capacity {requested} exceeds the medium limit of {max} slots"
                )
            }
            Self::InvalidMultiArray { reason } => {
                write!(f, "invalid multi-array configuration: {reason}")
            }
            Self::ZeroSpareRefCapacity => write!(f, "spare proxy queue capacity must be > 0"),
            Self::StrideTooLarge { stride } => {
                write!(f, "medium cannot hold a single {stride}-byte slot")
            }
        }
    }
}

impl Error for ConfigError {}

/// Errors raised by arena slot management and checked field access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// Growing storage would pass the medium's addressable limit.
    CapacityExceeded {
        /// Number of slots that were needed.
        requested: usize,
        /// Largest slot count the arena can ever hold.
        max: usize,
    },
    /// An index outside `[0, allocated_size)` was freed.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// High-water mark of indices handed out so far.
        allocated: usize,
    },
    /// An index that is already on the free list was freed again.
    DoubleFree {
        /// The offending index.
        index: usize,
    },
    /// A field access reached past the end of its record.
    OutOfBounds {
        /// Byte offset of the access within the record.
        offset: usize,
        /// Width of the access in bytes.
        width: usize,
        /// Size of the record in bytes.
        limit: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded { requested, max } => {
                write!(
                    f,
                    "arena capacity exceeded: {requested} slots requested, limit {max}"
                )
            }
            Self::IndexOutOfRange { index, allocated } => {
                write!(
                    f,
                    "slot index {index} out of range (allocated size {allocated})"
                )
            }
            Self::DoubleFree { index } => write!(f, "slot {index} freed twice"),
            Self::OutOfBounds {
                offset,
                width,
                limit,
            } => {
                write!(
                    f,
                    "field access out of bounds: {width} bytes at offset {offset}, record is {limit} bytes"
                )
            }
        }
    }
}

impl Error for ArenaError {}

/// Errors from the object pool and its proxies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// The underlying arena rejected the operation.
    Arena(ArenaError),
    /// A proxy created by one pool was used with another.
    ForeignProxy {
        /// The pool the operation belongs to.
        expected: PoolId,
        /// The pool that created the proxy.
        found: PoolId,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arena(e) => write!(f, "arena error: {e}"),
            Self::ForeignProxy { expected, found } => {
                write!(f, "proxy from pool {found} used with pool {expected}")
            }
        }
    }
}

impl Error for PoolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            Self::ForeignProxy { .. } => None,
        }
    }
}

impl From<ArenaError> for PoolError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_error_exposes_arena_source() {
        let err = PoolError::from(ArenaError::DoubleFree { index: 7 });
        let source = err.source().expect("arena errors carry a source");
        assert_eq!(source.to_string(), "slot 7 freed twice");
    }

    #[test]
    fn foreign_proxy_has_no_source() {
        let err = PoolError::ForeignProxy {
            expected: PoolId::next(),
            found: PoolId::next(),
        };
        assert!(err.source().is_none());
        assert!(err.to_string().contains("used with pool"));
    }

    #[test]
    fn out_of_bounds_message_names_all_parts() {
        let msg = ArenaError::OutOfBounds {
            offset: 12,
            width: 8,
            limit: 16,
        }
        .to_string();
        assert!(msg.contains("offset 12"));
        assert!(msg.contains("8 bytes"));
        assert!(msg.contains("16 bytes"));
    }
}
