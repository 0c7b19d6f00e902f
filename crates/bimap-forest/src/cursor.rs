//! Cursors over one side of a [`Bimap`](crate::Bimap) and the iterator
//! adapters built on them.
//!
//! A cursor is a thin handle: either a record's arena index or the end
//! position one past the side's maximum. Copying is a handle copy and
//! equality is position identity, never key comparison. A cursor stays
//! valid exactly as long as the record it references stays in the map.

use crate::avl;
use crate::node::Arena;
use crate::types::{LeftSide, RightSide};

/// Position in left-key order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LeftCursor(Option<u32>);

/// Position in right-key order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RightCursor(Option<u32>);

impl LeftCursor {
    pub(crate) fn at(idx: u32) -> Self {
        Self(Some(idx))
    }

    pub(crate) fn end() -> Self {
        Self(None)
    }

    pub(crate) fn index(self) -> Option<u32> {
        self.0
    }

    /// True for the one-past-the-maximum position.
    pub fn is_end(self) -> bool {
        self.0.is_none()
    }

    /// The cursor referencing the same record in right-key order.
    ///
    /// O(1) and size-independent; the end cursor flips to the other side's
    /// end cursor, so `c.flip().flip() == c` holds everywhere, on an empty
    /// map included.
    pub fn flip(self) -> RightCursor {
        RightCursor(self.0)
    }
}

impl RightCursor {
    pub(crate) fn at(idx: u32) -> Self {
        Self(Some(idx))
    }

    pub(crate) fn end() -> Self {
        Self(None)
    }

    pub(crate) fn index(self) -> Option<u32> {
        self.0
    }

    /// True for the one-past-the-maximum position.
    pub fn is_end(self) -> bool {
        self.0.is_none()
    }

    /// The cursor referencing the same record in left-key order. O(1).
    pub fn flip(self) -> LeftCursor {
        LeftCursor(self.0)
    }
}

/// Double-ended iterator over left keys in left-comparator order.
pub struct LeftIter<'a, L, R> {
    arena: &'a Arena<L, R>,
    front: Option<u32>,
    back: Option<u32>,
}

impl<'a, L, R> LeftIter<'a, L, R> {
    pub(crate) fn new(arena: &'a Arena<L, R>, root: Option<u32>) -> Self {
        Self {
            arena,
            front: avl::first::<LeftSide, L, R>(arena, root),
            back: avl::last::<LeftSide, L, R>(arena, root),
        }
    }
}

impl<'a, L, R> Iterator for LeftIter<'a, L, R> {
    type Item = &'a L;

    fn next(&mut self) -> Option<&'a L> {
        let i = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = avl::next::<LeftSide, L, R>(self.arena, i);
        }
        Some(&self.arena.node(i).left)
    }
}

impl<'a, L, R> DoubleEndedIterator for LeftIter<'a, L, R> {
    fn next_back(&mut self) -> Option<&'a L> {
        let i = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = avl::prev::<LeftSide, L, R>(self.arena, i);
        }
        Some(&self.arena.node(i).left)
    }
}

/// Double-ended iterator over right keys in right-comparator order.
pub struct RightIter<'a, L, R> {
    arena: &'a Arena<L, R>,
    front: Option<u32>,
    back: Option<u32>,
}

impl<'a, L, R> RightIter<'a, L, R> {
    pub(crate) fn new(arena: &'a Arena<L, R>, root: Option<u32>) -> Self {
        Self {
            arena,
            front: avl::first::<RightSide, L, R>(arena, root),
            back: avl::last::<RightSide, L, R>(arena, root),
        }
    }
}

impl<'a, L, R> Iterator for RightIter<'a, L, R> {
    type Item = &'a R;

    fn next(&mut self) -> Option<&'a R> {
        let i = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = avl::next::<RightSide, L, R>(self.arena, i);
        }
        Some(&self.arena.node(i).right)
    }
}

impl<'a, L, R> DoubleEndedIterator for RightIter<'a, L, R> {
    fn next_back(&mut self) -> Option<&'a R> {
        let i = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = avl::prev::<RightSide, L, R>(self.arena, i);
        }
        Some(&self.arena.node(i).right)
    }
}
