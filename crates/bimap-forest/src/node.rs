//! Record storage: the dual-linked node and the slab arena that owns it.

/// One stored pairing plus the structural state placing it in both trees.
///
/// The left tree orders records by `left` through `p` / `l` / `r` / `bf`;
/// the right tree orders the same records by `right` through `p2` / `l2` /
/// `r2` / `bf2`. A record is linked into both trees or into neither.
#[derive(Clone, Debug)]
pub(crate) struct BimapNode<L, R> {
    pub left: L,
    pub right: R,
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    /// Left-tree balance factor, `height(l) - height(r)`.
    pub bf: i32,
    pub p2: Option<u32>,
    pub l2: Option<u32>,
    pub r2: Option<u32>,
    /// Right-tree balance factor.
    pub bf2: i32,
}

impl<L, R> BimapNode<L, R> {
    pub fn new(left: L, right: R) -> Self {
        Self {
            left,
            right,
            p: None,
            l: None,
            r: None,
            bf: 0,
            p2: None,
            l2: None,
            r2: None,
            bf2: 0,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Slot<L, R> {
    Occupied(BimapNode<L, R>),
    Vacant(Option<u32>),
}

/// Slab of record slots with an intrusive free list.
///
/// Indices stay stable for the whole lifetime of a record; releasing a slot
/// drops its keys immediately and queues the slot for reuse.
#[derive(Clone, Debug)]
pub(crate) struct Arena<L, R> {
    slots: Vec<Slot<L, R>>,
    free: Option<u32>,
}

impl<L, R> Arena<L, R> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: None,
        }
    }

    pub fn node(&self, idx: u32) -> &BimapNode<L, R> {
        match &self.slots[idx as usize] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("vacant arena slot {idx}"),
        }
    }

    pub fn node_mut(&mut self, idx: u32) -> &mut BimapNode<L, R> {
        match &mut self.slots[idx as usize] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("vacant arena slot {idx}"),
        }
    }

    pub fn alloc(&mut self, node: BimapNode<L, R>) -> u32 {
        match self.free {
            Some(idx) => {
                let next = match &self.slots[idx as usize] {
                    Slot::Vacant(next) => *next,
                    Slot::Occupied(_) => unreachable!("occupied slot {idx} on the free list"),
                };
                self.free = next;
                self.slots[idx as usize] = Slot::Occupied(node);
                idx
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                (self.slots.len() - 1) as u32
            }
        }
    }

    pub fn release(&mut self, idx: u32) {
        debug_assert!(matches!(self.slots[idx as usize], Slot::Occupied(_)));
        self.slots[idx as usize] = Slot::Vacant(self.free);
        self.free = Some(idx);
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free = None;
    }

    /// Number of live records, counted from the slab itself.
    pub fn occupied(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Occupied(_)))
            .count()
    }
}
