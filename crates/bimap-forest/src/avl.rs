//! Structural AVL operations, shared by both trees through [`Side`].
//!
//! Everything here is purely structural: no comparator ever runs inside a
//! mutating function. Search descents happen in the façade, which then hands
//! a concrete attachment slot or removal target to this module. That split
//! is what keeps a mutation uninterruptible once it has started.

use crate::node::Arena;
use crate::types::Side;

/// Leftmost node in the tree, i.e. the minimum position.
pub(crate) fn first<S: Side, L, R>(arena: &Arena<L, R>, root: Option<u32>) -> Option<u32> {
    let mut curr = root?;
    while let Some(l) = S::l(arena, curr) {
        curr = l;
    }
    Some(curr)
}

/// Rightmost node in the tree, i.e. the maximum position.
pub(crate) fn last<S: Side, L, R>(arena: &Arena<L, R>, root: Option<u32>) -> Option<u32> {
    let mut curr = root?;
    while let Some(r) = S::r(arena, curr) {
        curr = r;
    }
    Some(curr)
}

/// In-order successor.
pub(crate) fn next<S: Side, L, R>(arena: &Arena<L, R>, node: u32) -> Option<u32> {
    if let Some(r) = S::r(arena, node) {
        let mut curr = r;
        while let Some(l) = S::l(arena, curr) {
            curr = l;
        }
        return Some(curr);
    }
    let mut curr = node;
    let mut p = S::p(arena, node);
    while let Some(pi) = p {
        if S::r(arena, pi) == Some(curr) {
            curr = pi;
            p = S::p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// In-order predecessor.
pub(crate) fn prev<S: Side, L, R>(arena: &Arena<L, R>, node: u32) -> Option<u32> {
    if let Some(l) = S::l(arena, node) {
        let mut curr = l;
        while let Some(r) = S::r(arena, curr) {
            curr = r;
        }
        return Some(curr);
    }
    let mut curr = node;
    let mut p = S::p(arena, node);
    while let Some(pi) = p {
        if S::l(arena, pi) == Some(curr) {
            curr = pi;
            p = S::p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

fn ll_rotate<S: Side, L, R>(arena: &mut Arena<L, R>, n: u32, nl: u32) {
    let p = S::p(arena, n);
    let nlr = S::r(arena, nl);

    S::set_p(arena, nl, p);
    S::set_r(arena, nl, Some(n));
    S::set_p(arena, n, Some(nl));
    S::set_l(arena, n, nlr);
    if let Some(nlr) = nlr {
        S::set_p(arena, nlr, Some(n));
    }
    if let Some(p) = p {
        if S::l(arena, p) == Some(n) {
            S::set_l(arena, p, Some(nl));
        } else {
            S::set_r(arena, p, Some(nl));
        }
    }

    let mut nbf = S::bf(arena, n);
    let mut nlbf = S::bf(arena, nl);
    nbf += -1 - if nlbf > 0 { nlbf } else { 0 };
    nlbf += -1 + if nbf < 0 { nbf } else { 0 };
    S::set_bf(arena, n, nbf);
    S::set_bf(arena, nl, nlbf);
}

fn rr_rotate<S: Side, L, R>(arena: &mut Arena<L, R>, n: u32, nr: u32) {
    let p = S::p(arena, n);
    let nrl = S::l(arena, nr);

    S::set_p(arena, nr, p);
    S::set_l(arena, nr, Some(n));
    S::set_p(arena, n, Some(nr));
    S::set_r(arena, n, nrl);
    if let Some(nrl) = nrl {
        S::set_p(arena, nrl, Some(n));
    }
    if let Some(p) = p {
        if S::l(arena, p) == Some(n) {
            S::set_l(arena, p, Some(nr));
        } else {
            S::set_r(arena, p, Some(nr));
        }
    }

    let mut nbf = S::bf(arena, n);
    let mut nrbf = S::bf(arena, nr);
    nbf += 1 - if nrbf < 0 { nrbf } else { 0 };
    nrbf += 1 + if nbf > 0 { nbf } else { 0 };
    S::set_bf(arena, n, nbf);
    S::set_bf(arena, nr, nrbf);
}

fn lr_rotate<S: Side, L, R>(arena: &mut Arena<L, R>, n: u32, nl: u32, nlr: u32) {
    rr_rotate::<S, L, R>(arena, nl, nlr);
    ll_rotate::<S, L, R>(arena, n, nlr);
}

fn rl_rotate<S: Side, L, R>(arena: &mut Arena<L, R>, n: u32, nr: u32, nrl: u32) {
    ll_rotate::<S, L, R>(arena, nr, nrl);
    rr_rotate::<S, L, R>(arena, n, nrl);
}

fn rebalance_after_insert<S: Side, L, R>(
    arena: &mut Arena<L, R>,
    root: u32,
    node: u32,
    child: u32,
) -> u32 {
    let Some(p) = S::p(arena, node) else {
        return root;
    };

    let is_left = S::l(arena, p) == Some(node);
    let mut pbf = S::bf(arena, p);
    if is_left {
        pbf += 1;
    } else {
        pbf -= 1;
    }
    S::set_bf(arena, p, pbf);

    match pbf {
        0 => root,
        1 | -1 => rebalance_after_insert::<S, L, R>(arena, root, p, node),
        _ => {
            let is_child_left = S::l(arena, node) == Some(child);
            if is_left {
                if is_child_left {
                    ll_rotate::<S, L, R>(arena, p, node);
                    if S::p(arena, node).is_some() {
                        root
                    } else {
                        node
                    }
                } else {
                    lr_rotate::<S, L, R>(arena, p, node, child);
                    if S::p(arena, child).is_some() {
                        root
                    } else {
                        child
                    }
                }
            } else if is_child_left {
                rl_rotate::<S, L, R>(arena, p, node, child);
                if S::p(arena, child).is_some() {
                    root
                } else {
                    child
                }
            } else {
                rr_rotate::<S, L, R>(arena, p, node);
                if S::p(arena, node).is_some() {
                    root
                } else {
                    node
                }
            }
        }
    }
}

/// Attach detached node `n` as the left child of `p` and rebalance.
/// Returns the new root. `p`'s left slot must be empty.
pub(crate) fn link_left<S: Side, L, R>(arena: &mut Arena<L, R>, root: u32, n: u32, p: u32) -> u32 {
    S::set_l(arena, p, Some(n));
    S::set_p(arena, n, Some(p));
    let pbf = S::bf(arena, p) + 1;
    S::set_bf(arena, p, pbf);
    if S::r(arena, p).is_some() {
        root
    } else {
        rebalance_after_insert::<S, L, R>(arena, root, p, n)
    }
}

/// Attach detached node `n` as the right child of `p` and rebalance.
pub(crate) fn link_right<S: Side, L, R>(arena: &mut Arena<L, R>, root: u32, n: u32, p: u32) -> u32 {
    S::set_r(arena, p, Some(n));
    S::set_p(arena, n, Some(p));
    let pbf = S::bf(arena, p) - 1;
    S::set_bf(arena, p, pbf);
    if S::l(arena, p).is_some() {
        root
    } else {
        rebalance_after_insert::<S, L, R>(arena, root, p, n)
    }
}

/// Unlink `n` from the tree rooted at `root`, preserving the relative order
/// of every other node. Returns the new root, `None` when the tree empties.
/// `n`'s links on this side are cleared.
pub(crate) fn detach<S: Side, L, R>(arena: &mut Arena<L, R>, root: u32, n: u32) -> Option<u32> {
    let p = S::p(arena, n);
    let l = S::l(arena, n);
    let r = S::r(arena, n);
    let nbf = S::bf(arena, n);
    S::set_p(arena, n, None);
    S::set_l(arena, n, None);
    S::set_r(arena, n, None);
    S::set_bf(arena, n, 0);

    if let (Some(l), Some(r)) = (l, r) {
        let lr = S::r(arena, l);
        if lr.is_none() {
            // Left child has no right subtree: it steps into n's place.
            if let Some(p) = p {
                if S::l(arena, p) == Some(n) {
                    S::set_l(arena, p, Some(l));
                } else {
                    S::set_r(arena, p, Some(l));
                }
            }
            S::set_p(arena, l, p);
            S::set_r(arena, l, Some(r));
            S::set_p(arena, r, Some(l));
            if p.is_some() {
                S::set_bf(arena, l, nbf);
                return Some(l_rebalance::<S, L, R>(arena, root, l, 1));
            }

            let lbf = nbf - 1;
            S::set_bf(arena, l, lbf);
            if lbf >= -1 {
                return Some(l);
            }
            let rl = S::l(arena, r);
            if S::bf(arena, r) > 0 {
                let rl = rl.expect("inner child exists for rotation");
                rl_rotate::<S, L, R>(arena, l, r, rl);
                return Some(rl);
            }
            rr_rotate::<S, L, R>(arena, l, r);
            return Some(r);
        }

        // In-order predecessor substitution.
        let mut v = l;
        while let Some(t) = S::r(arena, v) {
            v = t;
        }
        let vc = S::l(arena, v);
        let vp = S::p(arena, v).expect("in-order predecessor has a parent");

        if let Some(p) = p {
            if S::l(arena, p) == Some(n) {
                S::set_l(arena, p, Some(v));
            } else {
                S::set_r(arena, p, Some(v));
            }
        }
        S::set_p(arena, v, p);
        S::set_r(arena, v, Some(r));
        S::set_bf(arena, v, nbf);
        if l != v {
            S::set_l(arena, v, Some(l));
            S::set_p(arena, l, Some(v));
        }
        S::set_p(arena, r, Some(v));

        if S::l(arena, vp) == Some(v) {
            S::set_l(arena, vp, vc);
        } else {
            S::set_r(arena, vp, vc);
        }
        if let Some(vc) = vc {
            S::set_p(arena, vc, Some(vp));
        }

        let top = if p.is_some() { root } else { v };
        return Some(r_rebalance::<S, L, R>(arena, top, vp, 1));
    }

    let c = l.or(r);
    if let Some(c) = c {
        S::set_p(arena, c, p);
    }
    let Some(p) = p else {
        return c;
    };

    if S::l(arena, p) == Some(n) {
        S::set_l(arena, p, c);
        Some(l_rebalance::<S, L, R>(arena, root, p, 1))
    } else {
        S::set_r(arena, p, c);
        Some(r_rebalance::<S, L, R>(arena, root, p, 1))
    }
}

/// Walk towards the root after `n`'s left subtree lost `d` in height.
fn l_rebalance<S: Side, L, R>(arena: &mut Arena<L, R>, root: u32, mut n: u32, d: i32) -> u32 {
    let nbf = S::bf(arena, n) - d;
    S::set_bf(arena, n, nbf);
    let mut next_d = d;

    if nbf == -1 {
        return root;
    }

    if nbf < -1 {
        let u = S::r(arena, n).expect("heavier child exists");
        if S::bf(arena, u) <= 0 {
            if S::l(arena, u).is_some() && S::bf(arena, u) == 0 {
                next_d = 0;
            }
            rr_rotate::<S, L, R>(arena, n, u);
            n = u;
        } else {
            let ul = S::l(arena, u).expect("inner child exists");
            rl_rotate::<S, L, R>(arena, n, u, ul);
            n = ul;
        }
    }

    let Some(p) = S::p(arena, n) else {
        return n;
    };

    if S::l(arena, p) == Some(n) {
        l_rebalance::<S, L, R>(arena, root, p, next_d)
    } else {
        r_rebalance::<S, L, R>(arena, root, p, next_d)
    }
}

/// Walk towards the root after `n`'s right subtree lost `d` in height.
fn r_rebalance<S: Side, L, R>(arena: &mut Arena<L, R>, root: u32, mut n: u32, d: i32) -> u32 {
    let nbf = S::bf(arena, n) + d;
    S::set_bf(arena, n, nbf);
    let mut next_d = d;

    if nbf == 1 {
        return root;
    }

    if nbf > 1 {
        let u = S::l(arena, n).expect("heavier child exists");
        if S::bf(arena, u) >= 0 {
            if S::r(arena, u).is_some() && S::bf(arena, u) == 0 {
                next_d = 0;
            }
            ll_rotate::<S, L, R>(arena, n, u);
            n = u;
        } else {
            let ur = S::r(arena, u).expect("inner child exists");
            lr_rotate::<S, L, R>(arena, n, u, ur);
            n = ur;
        }
    }

    let Some(p) = S::p(arena, n) else {
        return n;
    };

    if S::l(arena, p) == Some(n) {
        l_rebalance::<S, L, R>(arena, root, p, next_d)
    } else {
        r_rebalance::<S, L, R>(arena, root, p, next_d)
    }
}

fn height<S: Side, L, R>(arena: &Arena<L, R>, node: u32) -> usize {
    let l = S::l(arena, node)
        .map(|i| height::<S, L, R>(arena, i))
        .unwrap_or(0);
    let r = S::r(arena, node)
        .map(|i| height::<S, L, R>(arena, i))
        .unwrap_or(0);
    1 + l.max(r)
}

fn validate_links<S: Side, L, R>(arena: &Arena<L, R>, node: u32) -> Result<(), String> {
    let l = S::l(arena, node);
    let r = S::r(arena, node);

    if let Some(l) = l {
        if S::p(arena, l) != Some(node) {
            return Err("broken parent link on left child".to_string());
        }
        validate_links::<S, L, R>(arena, l)?;
    }
    if let Some(r) = r {
        if S::p(arena, r) != Some(node) {
            return Err("broken parent link on right child".to_string());
        }
        validate_links::<S, L, R>(arena, r)?;
    }

    let lh = l.map(|i| height::<S, L, R>(arena, i)).unwrap_or(0) as i32;
    let rh = r.map(|i| height::<S, L, R>(arena, i)).unwrap_or(0) as i32;
    let expected = lh - rh;
    let actual = S::bf(arena, node);
    if actual != expected {
        return Err(format!(
            "balance factor mismatch: expected {expected}, got {actual}"
        ));
    }
    if !(-1..=1).contains(&actual) {
        return Err("avl balance violated".to_string());
    }

    Ok(())
}

/// Verify links, balance factors and strict ordering of one tree.
/// `cmp` compares the side's keys of two arena indices.
pub(crate) fn assert_balanced<S: Side, L, R, C>(
    arena: &Arena<L, R>,
    root: Option<u32>,
    cmp: &C,
) -> Result<(), String>
where
    C: Fn(u32, u32) -> i32,
{
    let Some(root) = root else {
        return Ok(());
    };

    if S::p(arena, root).is_some() {
        return Err("root has a parent".to_string());
    }

    validate_links::<S, L, R>(arena, root)?;

    let mut curr = first::<S, L, R>(arena, Some(root));
    let mut prev_node: Option<u32> = None;
    while let Some(i) = curr {
        if let Some(prev) = prev_node {
            if cmp(prev, i) >= 0 {
                return Err("node order violated".to_string());
            }
        }
        prev_node = Some(i);
        curr = next::<S, L, R>(arena, i);
    }

    Ok(())
}
