//! The bidirectional ordered map façade.

use std::fmt;

use crate::avl;
use crate::cursor::{LeftCursor, LeftIter, RightCursor, RightIter};
use crate::error::NotFound;
use crate::node::{Arena, BimapNode};
use crate::print;
use crate::types::{LeftSide, RightSide, Side};

fn default_comparator<K: PartialOrd>(a: &K, b: &K) -> i32 {
    if a == b {
        0
    } else if a < b {
        -1
    } else {
        1
    }
}

/// Outcome of a comparator descent: an order-equivalent record, or the slot
/// where a new record would attach.
enum Probe {
    Found(u32),
    /// `None` means the tree is empty; otherwise `(parent, to_left)`.
    Miss(Option<(u32, bool)>),
}

/// Ordered 1:1 map between a "left" and a "right" key universe.
///
/// Each record is stored once, in a slab arena, and is threaded through two
/// AVL trees at the same time: one ordered by `cmp_left` over left keys, one
/// by `cmp_right` over right keys. Both directions resolve in O(log n); each
/// side iterates in its own sorted order; a cursor on either side flips to
/// the same record's cursor on the other side in O(1).
///
/// Keys are compared exclusively through the stored comparators, so the key
/// types never need `Eq` or `Ord` of their own: two keys are "the same" iff
/// the comparator reports neither less than the other. Uniqueness is
/// enforced per side, which is what keeps the mapping 1:1.
///
/// Every mutating operation performs all of its comparator calls (and any
/// other user code, such as `Default::default`) before its first structural
/// change, so a panic out of user code leaves the map exactly as it was.
/// [`Clone`] is available when both key types and both comparators are
/// `Clone`; a panic out of a key clone discards the partial copy and leaves
/// the original untouched.
pub struct Bimap<L, R, Cl = fn(&L, &L) -> i32, Cr = fn(&R, &R) -> i32>
where
    Cl: Fn(&L, &L) -> i32,
    Cr: Fn(&R, &R) -> i32,
{
    arena: Arena<L, R>,
    root: Option<u32>,
    root2: Option<u32>,
    cmp_left: Cl,
    cmp_right: Cr,
    len: usize,
}

impl<L, R> Bimap<L, R>
where
    L: PartialOrd,
    R: PartialOrd,
{
    pub fn new() -> Self {
        Self::with_comparators(default_comparator::<L>, default_comparator::<R>)
    }
}

impl<L, R> Default for Bimap<L, R>
where
    L: PartialOrd,
    R: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<L, R, Cl, Cr> Bimap<L, R, Cl, Cr>
where
    Cl: Fn(&L, &L) -> i32,
    Cr: Fn(&R, &R) -> i32,
{
    /// Build an empty map with one orderer per side. The orderers must be
    /// strict weak: `cmp(a, b) < 0` iff `a` sorts before `b`, `0` iff the
    /// keys are order-equivalent.
    pub fn with_comparators(cmp_left: Cl, cmp_right: Cr) -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            root2: None,
            cmp_left,
            cmp_right,
            len: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.root2 = None;
        self.len = 0;
    }

    fn probe_left(&self, key: &L) -> Probe {
        let Some(mut curr) = self.root else {
            return Probe::Miss(None);
        };
        loop {
            let cmp = (self.cmp_left)(key, &self.arena.node(curr).left);
            if cmp == 0 {
                return Probe::Found(curr);
            }
            let child = if cmp < 0 {
                LeftSide::l(&self.arena, curr)
            } else {
                LeftSide::r(&self.arena, curr)
            };
            match child {
                Some(next) => curr = next,
                None => return Probe::Miss(Some((curr, cmp < 0))),
            }
        }
    }

    fn probe_right(&self, key: &R) -> Probe {
        let Some(mut curr) = self.root2 else {
            return Probe::Miss(None);
        };
        loop {
            let cmp = (self.cmp_right)(key, &self.arena.node(curr).right);
            if cmp == 0 {
                return Probe::Found(curr);
            }
            let child = if cmp < 0 {
                RightSide::l(&self.arena, curr)
            } else {
                RightSide::r(&self.arena, curr)
            };
            match child {
                Some(next) => curr = next,
                None => return Probe::Miss(Some((curr, cmp < 0))),
            }
        }
    }

    fn attach_left(&mut self, n: u32, slot: Option<(u32, bool)>) {
        self.root = Some(match slot {
            None => n,
            Some((p, true)) => {
                avl::link_left::<LeftSide, L, R>(&mut self.arena, self.root.expect("root exists"), n, p)
            }
            Some((p, false)) => {
                avl::link_right::<LeftSide, L, R>(&mut self.arena, self.root.expect("root exists"), n, p)
            }
        });
    }

    fn attach_right(&mut self, n: u32, slot: Option<(u32, bool)>) {
        self.root2 = Some(match slot {
            None => n,
            Some((p, true)) => avl::link_left::<RightSide, L, R>(
                &mut self.arena,
                self.root2.expect("root exists"),
                n,
                p,
            ),
            Some((p, false)) => avl::link_right::<RightSide, L, R>(
                &mut self.arena,
                self.root2.expect("root exists"),
                n,
                p,
            ),
        });
    }

    /// Unlink a record from both trees and free its slot.
    fn detach_record(&mut self, n: u32) {
        self.root = avl::detach::<LeftSide, L, R>(&mut self.arena, self.root.expect("root exists"), n);
        self.root2 =
            avl::detach::<RightSide, L, R>(&mut self.arena, self.root2.expect("root exists"), n);
        self.arena.release(n);
        self.len -= 1;
    }

    /// Add a pairing. Succeeds only when `left` is order-equivalent to no
    /// stored left key and `right` to no stored right key; on success the
    /// record lands in both trees and its left-side cursor is returned. On
    /// conflict nothing is mutated and the left end cursor is returned.
    pub fn insert(&mut self, left: L, right: R) -> LeftCursor {
        let slot_l = match self.probe_left(&left) {
            Probe::Found(_) => return LeftCursor::end(),
            Probe::Miss(slot) => slot,
        };
        let slot_r = match self.probe_right(&right) {
            Probe::Found(_) => return LeftCursor::end(),
            Probe::Miss(slot) => slot,
        };
        // No user code below this point: the mutation cannot be interrupted.
        let n = self.arena.alloc(BimapNode::new(left, right));
        self.attach_left(n, slot_l);
        self.attach_right(n, slot_r);
        self.len += 1;
        LeftCursor::at(n)
    }

    /// Remove the record a cursor references, from both trees. Returns the
    /// cursor to its left-order successor (end if none). Calling this with
    /// the end cursor or a cursor whose record was already erased is a
    /// contract violation.
    pub fn erase_left(&mut self, it: LeftCursor) -> LeftCursor {
        let n = it.index().expect("erase on the end cursor");
        let succ = avl::next::<LeftSide, L, R>(&self.arena, n);
        self.detach_record(n);
        succ.map_or(LeftCursor::end(), LeftCursor::at)
    }

    /// Right-side analogue of [`Bimap::erase_left`].
    pub fn erase_right(&mut self, it: RightCursor) -> RightCursor {
        let n = it.index().expect("erase on the end cursor");
        let succ = avl::next::<RightSide, L, R>(&self.arena, n);
        self.detach_record(n);
        succ.map_or(RightCursor::end(), RightCursor::at)
    }

    /// Remove the record whose left key is order-equivalent to `key`.
    /// Reports whether anything was removed.
    pub fn del_left(&mut self, key: &L) -> bool {
        match self.probe_left(key) {
            Probe::Found(n) => {
                self.detach_record(n);
                true
            }
            Probe::Miss(_) => false,
        }
    }

    pub fn del_right(&mut self, key: &R) -> bool {
        match self.probe_right(key) {
            Probe::Found(n) => {
                self.detach_record(n);
                true
            }
            Probe::Miss(_) => false,
        }
    }

    /// Remove every record in `[first, last)` on the left side and return
    /// `last`, which still references the first surviving position.
    pub fn erase_left_range(&mut self, first: LeftCursor, last: LeftCursor) -> LeftCursor {
        let mut curr = first;
        while curr != last {
            curr = self.erase_left(curr);
        }
        last
    }

    pub fn erase_right_range(&mut self, first: RightCursor, last: RightCursor) -> RightCursor {
        let mut curr = first;
        while curr != last {
            curr = self.erase_right(curr);
        }
        last
    }

    /// Cursor to the record whose left key is order-equivalent to `key`,
    /// or the end cursor.
    pub fn find_left(&self, key: &L) -> LeftCursor {
        match self.probe_left(key) {
            Probe::Found(n) => LeftCursor::at(n),
            Probe::Miss(_) => LeftCursor::end(),
        }
    }

    pub fn find_right(&self, key: &R) -> RightCursor {
        match self.probe_right(key) {
            Probe::Found(n) => RightCursor::at(n),
            Probe::Miss(_) => RightCursor::end(),
        }
    }

    /// The right key paired with `key`, or [`NotFound`].
    pub fn at_left(&self, key: &L) -> Result<&R, NotFound> {
        match self.probe_left(key) {
            Probe::Found(n) => Ok(&self.arena.node(n).right),
            Probe::Miss(_) => Err(NotFound),
        }
    }

    /// The left key paired with `key`, or [`NotFound`].
    pub fn at_right(&self, key: &R) -> Result<&L, NotFound> {
        match self.probe_right(key) {
            Probe::Found(n) => Ok(&self.arena.node(n).left),
            Probe::Miss(_) => Err(NotFound),
        }
    }

    /// The right key paired with `key`, inserting `(key, R::default())` when
    /// absent. The default right value is unique-owned: if some other record
    /// already holds it, that record's left key is discarded and the default
    /// migrates to `key`. The replacement is structural (the new record takes
    /// over the old record's exact right-tree position), so stored keys are
    /// never assigned to, and all user code runs before the first mutation.
    pub fn at_left_or_default(&mut self, key: L) -> &R
    where
        R: Default,
    {
        let slot_l = match self.probe_left(&key) {
            Probe::Found(n) => return &self.arena.node(n).right,
            Probe::Miss(slot) => slot,
        };
        let right = R::default();
        match self.probe_right(&right) {
            Probe::Miss(slot_r) => {
                // Same shape as insert: every comparison is already done.
                let n = self.arena.alloc(BimapNode::new(key, right));
                self.attach_left(n, slot_l);
                self.attach_right(n, slot_r);
                self.len += 1;
                &self.arena.node(n).right
            }
            Probe::Found(old) => {
                let n = self.arena.alloc(BimapNode::new(key, right));
                self.attach_left(n, slot_l);
                self.root = avl::detach::<LeftSide, L, R>(
                    &mut self.arena,
                    self.root.expect("root exists"),
                    old,
                );
                self.substitute_right(old, n);
                self.arena.release(old);
                &self.arena.node(n).right
            }
        }
    }

    /// Left-side analogue of [`Bimap::at_left_or_default`].
    pub fn at_right_or_default(&mut self, key: R) -> &L
    where
        L: Default,
    {
        let slot_r = match self.probe_right(&key) {
            Probe::Found(n) => return &self.arena.node(n).left,
            Probe::Miss(slot) => slot,
        };
        let left = L::default();
        match self.probe_left(&left) {
            Probe::Miss(slot_l) => {
                let n = self.arena.alloc(BimapNode::new(left, key));
                self.attach_left(n, slot_l);
                self.attach_right(n, slot_r);
                self.len += 1;
                &self.arena.node(n).left
            }
            Probe::Found(old) => {
                let n = self.arena.alloc(BimapNode::new(left, key));
                self.attach_right(n, slot_r);
                self.root2 = avl::detach::<RightSide, L, R>(
                    &mut self.arena,
                    self.root2.expect("root exists"),
                    old,
                );
                self.substitute_left(old, n);
                self.arena.release(old);
                &self.arena.node(n).left
            }
        }
    }

    /// Place `n` into `old`'s exact right-tree position. Purely structural;
    /// valid because the two records' right keys are order-equivalent.
    fn substitute_right(&mut self, old: u32, n: u32) {
        let (p2, l2, r2, bf2) = {
            let o = self.arena.node(old);
            (o.p2, o.l2, o.r2, o.bf2)
        };
        {
            let node = self.arena.node_mut(n);
            node.p2 = p2;
            node.l2 = l2;
            node.r2 = r2;
            node.bf2 = bf2;
        }
        match p2 {
            Some(p) => {
                if RightSide::l(&self.arena, p) == Some(old) {
                    RightSide::set_l(&mut self.arena, p, Some(n));
                } else {
                    RightSide::set_r(&mut self.arena, p, Some(n));
                }
            }
            None => self.root2 = Some(n),
        }
        if let Some(l) = l2 {
            RightSide::set_p(&mut self.arena, l, Some(n));
        }
        if let Some(r) = r2 {
            RightSide::set_p(&mut self.arena, r, Some(n));
        }
    }

    /// Place `n` into `old`'s exact left-tree position.
    fn substitute_left(&mut self, old: u32, n: u32) {
        let (p, l, r, bf) = {
            let o = self.arena.node(old);
            (o.p, o.l, o.r, o.bf)
        };
        {
            let node = self.arena.node_mut(n);
            node.p = p;
            node.l = l;
            node.r = r;
            node.bf = bf;
        }
        match p {
            Some(p) => {
                if LeftSide::l(&self.arena, p) == Some(old) {
                    LeftSide::set_l(&mut self.arena, p, Some(n));
                } else {
                    LeftSide::set_r(&mut self.arena, p, Some(n));
                }
            }
            None => self.root = Some(n),
        }
        if let Some(l) = l {
            LeftSide::set_p(&mut self.arena, l, Some(n));
        }
        if let Some(r) = r {
            LeftSide::set_p(&mut self.arena, r, Some(n));
        }
    }

    /// First record whose left key is not less than `key`, or end.
    pub fn lower_bound_left(&self, key: &L) -> LeftCursor {
        let mut curr = self.root;
        let mut res = None;
        while let Some(i) = curr {
            if (self.cmp_left)(key, &self.arena.node(i).left) <= 0 {
                res = Some(i);
                curr = LeftSide::l(&self.arena, i);
            } else {
                curr = LeftSide::r(&self.arena, i);
            }
        }
        res.map_or(LeftCursor::end(), LeftCursor::at)
    }

    /// First record whose left key is strictly greater than `key`, or end.
    pub fn upper_bound_left(&self, key: &L) -> LeftCursor {
        let mut curr = self.root;
        let mut res = None;
        while let Some(i) = curr {
            if (self.cmp_left)(key, &self.arena.node(i).left) < 0 {
                res = Some(i);
                curr = LeftSide::l(&self.arena, i);
            } else {
                curr = LeftSide::r(&self.arena, i);
            }
        }
        res.map_or(LeftCursor::end(), LeftCursor::at)
    }

    pub fn lower_bound_right(&self, key: &R) -> RightCursor {
        let mut curr = self.root2;
        let mut res = None;
        while let Some(i) = curr {
            if (self.cmp_right)(key, &self.arena.node(i).right) <= 0 {
                res = Some(i);
                curr = RightSide::l(&self.arena, i);
            } else {
                curr = RightSide::r(&self.arena, i);
            }
        }
        res.map_or(RightCursor::end(), RightCursor::at)
    }

    pub fn upper_bound_right(&self, key: &R) -> RightCursor {
        let mut curr = self.root2;
        let mut res = None;
        while let Some(i) = curr {
            if (self.cmp_right)(key, &self.arena.node(i).right) < 0 {
                res = Some(i);
                curr = RightSide::l(&self.arena, i);
            } else {
                curr = RightSide::r(&self.arena, i);
            }
        }
        res.map_or(RightCursor::end(), RightCursor::at)
    }

    pub fn begin_left(&self) -> LeftCursor {
        avl::first::<LeftSide, L, R>(&self.arena, self.root).map_or(LeftCursor::end(), LeftCursor::at)
    }

    pub fn end_left(&self) -> LeftCursor {
        LeftCursor::end()
    }

    pub fn begin_right(&self) -> RightCursor {
        avl::first::<RightSide, L, R>(&self.arena, self.root2)
            .map_or(RightCursor::end(), RightCursor::at)
    }

    pub fn end_right(&self) -> RightCursor {
        RightCursor::end()
    }

    /// The left key a cursor references. Dereferencing the end cursor is a
    /// contract violation.
    pub fn left_key(&self, it: LeftCursor) -> &L {
        &self
            .arena
            .node(it.index().expect("dereference of the end cursor"))
            .left
    }

    /// The right key a cursor references.
    pub fn right_key(&self, it: RightCursor) -> &R {
        &self
            .arena
            .node(it.index().expect("dereference of the end cursor"))
            .right
    }

    /// Left-order successor. Incrementing the end cursor is a contract
    /// violation.
    pub fn next_left(&self, it: LeftCursor) -> LeftCursor {
        let n = it.index().expect("increment of the end cursor");
        avl::next::<LeftSide, L, R>(&self.arena, n).map_or(LeftCursor::end(), LeftCursor::at)
    }

    /// Left-order predecessor; the end cursor steps back to the maximum.
    /// Decrementing the begin cursor is a contract violation.
    pub fn prev_left(&self, it: LeftCursor) -> LeftCursor {
        let idx = match it.index() {
            Some(n) => avl::prev::<LeftSide, L, R>(&self.arena, n),
            None => avl::last::<LeftSide, L, R>(&self.arena, self.root),
        };
        LeftCursor::at(idx.expect("decrement of the begin cursor"))
    }

    pub fn next_right(&self, it: RightCursor) -> RightCursor {
        let n = it.index().expect("increment of the end cursor");
        avl::next::<RightSide, L, R>(&self.arena, n).map_or(RightCursor::end(), RightCursor::at)
    }

    pub fn prev_right(&self, it: RightCursor) -> RightCursor {
        let idx = match it.index() {
            Some(n) => avl::prev::<RightSide, L, R>(&self.arena, n),
            None => avl::last::<RightSide, L, R>(&self.arena, self.root2),
        };
        RightCursor::at(idx.expect("decrement of the begin cursor"))
    }

    pub fn iter_left(&self) -> LeftIter<'_, L, R> {
        LeftIter::new(&self.arena, self.root)
    }

    pub fn iter_right(&self) -> RightIter<'_, L, R> {
        RightIter::new(&self.arena, self.root2)
    }

    /// Verify both trees and the record bookkeeping.
    pub fn assert_valid(&self) -> Result<(), String> {
        avl::assert_balanced::<LeftSide, L, R, _>(&self.arena, self.root, &|a, b| {
            (self.cmp_left)(&self.arena.node(a).left, &self.arena.node(b).left)
        })?;
        avl::assert_balanced::<RightSide, L, R, _>(&self.arena, self.root2, &|a, b| {
            (self.cmp_right)(&self.arena.node(a).right, &self.arena.node(b).right)
        })?;

        let mut lefts = Vec::new();
        let mut curr = avl::first::<LeftSide, L, R>(&self.arena, self.root);
        while let Some(i) = curr {
            lefts.push(i);
            curr = avl::next::<LeftSide, L, R>(&self.arena, i);
        }
        let mut rights = Vec::new();
        let mut curr = avl::first::<RightSide, L, R>(&self.arena, self.root2);
        while let Some(i) = curr {
            rights.push(i);
            curr = avl::next::<RightSide, L, R>(&self.arena, i);
        }

        if lefts.len() != self.len {
            return Err(format!(
                "left tree holds {} records, size says {}",
                lefts.len(),
                self.len
            ));
        }
        if rights.len() != self.len {
            return Err(format!(
                "right tree holds {} records, size says {}",
                rights.len(),
                self.len
            ));
        }
        if self.arena.occupied() != self.len {
            return Err(format!(
                "arena holds {} records, size says {}",
                self.arena.occupied(),
                self.len
            ));
        }
        lefts.sort_unstable();
        rights.sort_unstable();
        if lefts != rights {
            return Err("left and right trees disagree on the record set".to_string());
        }
        Ok(())
    }
}

impl<L, R, Cl, Cr> Bimap<L, R, Cl, Cr>
where
    L: fmt::Debug,
    R: fmt::Debug,
    Cl: Fn(&L, &L) -> i32,
    Cr: Fn(&R, &R) -> i32,
{
    /// Render the left tree for diagnostics.
    pub fn print_left(&self) -> String {
        print::print_tree::<LeftSide, L, R>(&self.arena, self.root, "")
    }

    /// Render the right tree for diagnostics.
    pub fn print_right(&self) -> String {
        print::print_tree::<RightSide, L, R>(&self.arena, self.root2, "")
    }
}

impl<L, R, Cl, Cr> Clone for Bimap<L, R, Cl, Cr>
where
    L: Clone,
    R: Clone,
    Cl: Clone + Fn(&L, &L) -> i32,
    Cr: Clone + Fn(&R, &R) -> i32,
{
    fn clone(&self) -> Self {
        // Indices are positions in the slab, so cloning the slab clones the
        // whole structure. A panicking key clone drops the partial slab and
        // never touches `self`.
        Self {
            arena: self.arena.clone(),
            root: self.root,
            root2: self.root2,
            cmp_left: self.cmp_left.clone(),
            cmp_right: self.cmp_right.clone(),
            len: self.len,
        }
    }
}

impl<L, R, Cl, Cr> PartialEq for Bimap<L, R, Cl, Cr>
where
    Cl: Fn(&L, &L) -> i32,
    Cr: Fn(&R, &R) -> i32,
{
    /// Equal iff the sizes match and a lockstep left-order walk finds every
    /// pair order-equivalent on both sides, judged by `self`'s comparators.
    /// Key-type equality is never consulted.
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }
        let mut a = avl::first::<LeftSide, L, R>(&self.arena, self.root);
        let mut b = avl::first::<LeftSide, L, R>(&other.arena, other.root);
        while let (Some(i), Some(j)) = (a, b) {
            let x = self.arena.node(i);
            let y = other.arena.node(j);
            if (self.cmp_left)(&x.left, &y.left) != 0 || (self.cmp_right)(&x.right, &y.right) != 0 {
                return false;
            }
            a = avl::next::<LeftSide, L, R>(&self.arena, i);
            b = avl::next::<LeftSide, L, R>(&other.arena, j);
        }
        true
    }
}

impl<L, R, Cl, Cr> fmt::Debug for Bimap<L, R, Cl, Cr>
where
    L: fmt::Debug,
    R: fmt::Debug,
    Cl: Fn(&L, &L) -> i32,
    Cr: Fn(&R, &R) -> i32,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        let mut curr = avl::first::<LeftSide, L, R>(&self.arena, self.root);
        while let Some(i) = curr {
            let node = self.arena.node(i);
            map.entry(&node.left, &node.right);
            curr = avl::next::<LeftSide, L, R>(&self.arena, i);
        }
        map.finish()
    }
}
