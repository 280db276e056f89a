//! Layout of the intrusive free list stored inside freed slots.
//!
//! A freed slot's own bytes hold the list: an optional 4-byte
//! [`FREE_SLOT_MARKER`] at offset 0 followed by the index of the next free
//! slot (`-1` terminates). No side allocation is needed, which is what
//! keeps `free` and `create` O(1) with zero heap traffic.
//!
//! ```text
//! marked:    [ 0xDEADBEEF (i32) | next (i32 or i64) | ...stale record bytes ]
//! unmarked:  [ next (i32 or i64) | ...stale record bytes ]
//! ```

use crate::config::FreePolicy;
use crate::medium::BackingArray;

/// Value written at offset 0 of every freed slot under the marking
/// policies. A live record whose first four bytes equal this value is
/// indistinguishable from a freed slot under [`FreePolicy::SentinelCheck`].
pub const FREE_SLOT_MARKER: i32 = 0xDEAD_BEEF_u32 as i32;

/// Terminator stored in the last free slot's link.
const NO_NEXT: i64 = -1;

/// Width of the next-free link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkWidth {
    /// 4-byte link; enough for any single array.
    Narrow,
    /// 8-byte link, for multi-array arenas whose indices can pass `i32::MAX`.
    Wide,
}

impl LinkWidth {
    /// Bytes occupied by the link.
    pub fn bytes(self) -> usize {
        match self {
            Self::Narrow => 4,
            Self::Wide => 8,
        }
    }
}

/// Where the marker and link live inside a freed slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreeSlotHeader {
    marked: bool,
    link: LinkWidth,
}

impl FreeSlotHeader {
    /// Header for the given policy and link width.
    pub fn new(policy: FreePolicy, link: LinkWidth) -> Self {
        Self {
            marked: policy != FreePolicy::Unchecked,
            link,
        }
    }

    /// Whether freed slots carry the marker.
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// Width of the next link.
    pub fn link_width(&self) -> LinkWidth {
        self.link
    }

    /// Bytes a slot needs to hold this header.
    pub fn size_in_bytes(&self) -> usize {
        self.link_offset() + self.link.bytes()
    }

    fn link_offset(&self) -> usize {
        if self.marked {
            4
        } else {
            0
        }
    }

    /// Turn the slot at `base` into a free-list node pointing at `next`.
    #[inline]
    pub fn write<A: BackingArray>(&self, array: &mut A, base: usize, next: Option<usize>) {
        if self.marked {
            array.put_i32(base, FREE_SLOT_MARKER);
        }
        let raw = next.map_or(NO_NEXT, |n| n as i64);
        let at = base + self.link_offset();
        match self.link {
            LinkWidth::Narrow => array.put_i32(at, raw as i32),
            LinkWidth::Wide => array.put_i64(at, raw),
        }
    }

    /// The next free index stored in the node at `base`.
    #[inline]
    pub fn read_next<A: BackingArray>(&self, array: &A, base: usize) -> Option<usize> {
        let at = base + self.link_offset();
        let raw = match self.link {
            LinkWidth::Narrow => i64::from(array.get_i32(at)),
            LinkWidth::Wide => array.get_i64(at),
        };
        usize::try_from(raw).ok()
    }

    /// Whether the slot at `base` starts with the marker. Always `false`
    /// for unmarked headers.
    #[inline]
    pub fn has_marker<A: BackingArray>(&self, array: &A, base: usize) -> bool {
        self.marked && array.get_i32(base) == FREE_SLOT_MARKER
    }

    /// Zero the marker so a reused slot no longer reads as free.
    #[inline]
    pub fn clear_marker<A: BackingArray>(&self, array: &mut A, base: usize) {
        if self.marked {
            array.put_i32(base, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap_bytes::HeapBytes;
    use crate::medium::Medium;

    #[test]
    fn marker_is_deadbeef() {
        assert_eq!(FREE_SLOT_MARKER as u32, 0xDEAD_BEEF);
    }

    #[test]
    fn header_sizes() {
        let narrow = FreeSlotHeader::new(FreePolicy::SentinelCheck, LinkWidth::Narrow);
        let wide = FreeSlotHeader::new(FreePolicy::FreeListScan, LinkWidth::Wide);
        let bare = FreeSlotHeader::new(FreePolicy::Unchecked, LinkWidth::Narrow);
        assert_eq!(narrow.size_in_bytes(), 8);
        assert_eq!(wide.size_in_bytes(), 12);
        assert_eq!(bare.size_in_bytes(), 4);
    }

    #[test]
    fn marked_node_round_trips() {
        let header = FreeSlotHeader::new(FreePolicy::SentinelCheck, LinkWidth::Narrow);
        let mut array = HeapBytes::new().allocate(8, 2);
        header.write(&mut array, 8, Some(0));
        assert!(header.has_marker(&array, 8));
        assert!(!header.has_marker(&array, 0));
        assert_eq!(header.read_next(&array, 8), Some(0));

        header.clear_marker(&mut array, 8);
        assert!(!header.has_marker(&array, 8));
    }

    #[test]
    fn terminator_reads_as_none() {
        let header = FreeSlotHeader::new(FreePolicy::FreeListScan, LinkWidth::Wide);
        let mut array = HeapBytes::new().allocate(16, 1);
        header.write(&mut array, 0, None);
        assert_eq!(header.read_next(&array, 0), None);
    }

    #[test]
    fn wide_links_hold_large_indices() {
        let header = FreeSlotHeader::new(FreePolicy::SentinelCheck, LinkWidth::Wide);
        let mut array = HeapBytes::new().allocate(16, 1);
        let big = i32::MAX as usize + 7;
        header.write(&mut array, 0, Some(big));
        assert_eq!(header.read_next(&array, 0), Some(big));
    }

    #[test]
    fn unmarked_header_never_reports_marker() {
        let header = FreeSlotHeader::new(FreePolicy::Unchecked, LinkWidth::Narrow);
        let mut array = HeapBytes::new().allocate(4, 1);
        array.put_i32(0, FREE_SLOT_MARKER);
        assert!(!header.has_marker(&array, 0));
        header.write(&mut array, 0, Some(3));
        assert_eq!(array.get_i32(0), 3);
    }
}
