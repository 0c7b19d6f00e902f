//! Link-set selectors for the two trees.
//!
//! Every record participates in two AVL trees at once. The structural code
//! in [`crate::avl`] is written once and instantiated per tree through the
//! [`Side`] trait, which routes link and balance-factor access either to the
//! `p` / `l` / `r` / `bf` fields (left tree) or to the `p2` / `l2` / `r2` /
//! `bf2` fields (right tree).

use crate::node::Arena;

pub(crate) trait Side {
    fn p<L, R>(arena: &Arena<L, R>, i: u32) -> Option<u32>;
    fn l<L, R>(arena: &Arena<L, R>, i: u32) -> Option<u32>;
    fn r<L, R>(arena: &Arena<L, R>, i: u32) -> Option<u32>;
    fn bf<L, R>(arena: &Arena<L, R>, i: u32) -> i32;
    fn set_p<L, R>(arena: &mut Arena<L, R>, i: u32, v: Option<u32>);
    fn set_l<L, R>(arena: &mut Arena<L, R>, i: u32, v: Option<u32>);
    fn set_r<L, R>(arena: &mut Arena<L, R>, i: u32, v: Option<u32>);
    fn set_bf<L, R>(arena: &mut Arena<L, R>, i: u32, v: i32);
}

/// Selector for the tree ordered by left keys.
pub(crate) struct LeftSide;

/// Selector for the tree ordered by right keys.
pub(crate) struct RightSide;

impl Side for LeftSide {
    #[inline]
    fn p<L, R>(arena: &Arena<L, R>, i: u32) -> Option<u32> {
        arena.node(i).p
    }

    #[inline]
    fn l<L, R>(arena: &Arena<L, R>, i: u32) -> Option<u32> {
        arena.node(i).l
    }

    #[inline]
    fn r<L, R>(arena: &Arena<L, R>, i: u32) -> Option<u32> {
        arena.node(i).r
    }

    #[inline]
    fn bf<L, R>(arena: &Arena<L, R>, i: u32) -> i32 {
        arena.node(i).bf
    }

    #[inline]
    fn set_p<L, R>(arena: &mut Arena<L, R>, i: u32, v: Option<u32>) {
        arena.node_mut(i).p = v;
    }

    #[inline]
    fn set_l<L, R>(arena: &mut Arena<L, R>, i: u32, v: Option<u32>) {
        arena.node_mut(i).l = v;
    }

    #[inline]
    fn set_r<L, R>(arena: &mut Arena<L, R>, i: u32, v: Option<u32>) {
        arena.node_mut(i).r = v;
    }

    #[inline]
    fn set_bf<L, R>(arena: &mut Arena<L, R>, i: u32, v: i32) {
        arena.node_mut(i).bf = v;
    }
}

impl Side for RightSide {
    #[inline]
    fn p<L, R>(arena: &Arena<L, R>, i: u32) -> Option<u32> {
        arena.node(i).p2
    }

    #[inline]
    fn l<L, R>(arena: &Arena<L, R>, i: u32) -> Option<u32> {
        arena.node(i).l2
    }

    #[inline]
    fn r<L, R>(arena: &Arena<L, R>, i: u32) -> Option<u32> {
        arena.node(i).r2
    }

    #[inline]
    fn bf<L, R>(arena: &Arena<L, R>, i: u32) -> i32 {
        arena.node(i).bf2
    }

    #[inline]
    fn set_p<L, R>(arena: &mut Arena<L, R>, i: u32, v: Option<u32>) {
        arena.node_mut(i).p2 = v;
    }

    #[inline]
    fn set_l<L, R>(arena: &mut Arena<L, R>, i: u32, v: Option<u32>) {
        arena.node_mut(i).l2 = v;
    }

    #[inline]
    fn set_r<L, R>(arena: &mut Arena<L, R>, i: u32, v: Option<u32>) {
        arena.node_mut(i).r2 = v;
    }

    #[inline]
    fn set_bf<L, R>(arena: &mut Arena<L, R>, i: u32, v: i32) {
        arena.node_mut(i).bf2 = v;
    }
}
