//! Ascending traversal of live slots.
//!
//! [`LiveCursor`] holds only plain state, so it can be advanced against an
//! arena that is mutated between steps (e.g. freeing the slot just
//! visited). [`LiveIter`] wraps a cursor and a shared borrow into an
//! ordinary `Iterator`.

use smallvec::SmallVec;

use crate::arena::Arena;
use crate::config::FreePolicy;
use crate::medium::Medium;

/// Resumable position in a live-slot traversal.
#[derive(Clone, Debug)]
pub struct LiveCursor {
    next: usize,
    /// Free indices captured when the cursor was created, ascending.
    /// Only filled under [`FreePolicy::FreeListScan`].
    skip: SmallVec<[usize; 16]>,
    skip_pos: usize,
}

impl LiveCursor {
    /// Start a traversal at index 0.
    ///
    /// Under [`FreePolicy::FreeListScan`] this walks the free list once and
    /// keeps the result; slots freed later in the pass are not re-checked.
    pub fn new<M: Medium>(arena: &Arena<M>) -> Self {
        let skip = match arena.policy() {
            FreePolicy::FreeListScan => {
                let mut skip: SmallVec<[usize; 16]> = arena.free_indices().collect();
                skip.sort_unstable();
                skip
            }
            FreePolicy::Unchecked | FreePolicy::SentinelCheck => SmallVec::new(),
        };
        Self {
            next: 0,
            skip,
            skip_pos: 0,
        }
    }

    /// The next live index, or `None` once `allocated_size` is reached.
    pub fn advance<M: Medium>(&mut self, arena: &Arena<M>) -> Option<usize> {
        while self.next < arena.allocated_size() {
            let index = self.next;
            self.next += 1;
            match arena.policy() {
                FreePolicy::Unchecked => return Some(index),
                FreePolicy::SentinelCheck => {
                    if !arena.has_free_marker(index) {
                        return Some(index);
                    }
                }
                FreePolicy::FreeListScan => {
                    while self.skip.get(self.skip_pos).is_some_and(|&s| s < index) {
                        self.skip_pos += 1;
                    }
                    if self.skip.get(self.skip_pos) == Some(&index) {
                        self.skip_pos += 1;
                    } else {
                        return Some(index);
                    }
                }
            }
        }
        None
    }

    /// Index the next call to [`advance`](Self::advance) starts from.
    pub fn position(&self) -> usize {
        self.next
    }
}

/// Iterator over live slot indices in ascending order.
pub struct LiveIter<'a, M: Medium> {
    arena: &'a Arena<M>,
    cursor: LiveCursor,
}

impl<'a, M: Medium> LiveIter<'a, M> {
    pub(crate) fn new(arena: &'a Arena<M>) -> Self {
        Self {
            arena,
            cursor: LiveCursor::new(arena),
        }
    }
}

impl<M: Medium> Iterator for LiveIter<'_, M> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.cursor.advance(self.arena)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .arena
            .allocated_size()
            .saturating_sub(self.cursor.position());
        (0, Some(remaining))
    }
}

impl<M: Medium> std::iter::FusedIterator for LiveIter<'_, M> {}
