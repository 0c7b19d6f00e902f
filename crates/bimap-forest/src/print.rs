//! Recursive tree printer for diagnostics.

use std::fmt::Debug;

use crate::node::Arena;
use crate::types::Side;

pub(crate) fn print_tree<S: Side, L, R>(
    arena: &Arena<L, R>,
    node: Option<u32>,
    tab: &str,
) -> String
where
    L: Debug,
    R: Debug,
{
    match node {
        None => "∅".to_string(),
        Some(i) => {
            let n = arena.node(i);
            let left = print_tree::<S, L, R>(arena, S::l(arena, i), &format!("{tab}  "));
            let right = print_tree::<S, L, R>(arena, S::r(arena, i), &format!("{tab}  "));
            format!(
                "Node[{i}] [bf={}] {{ {:?} <-> {:?} }}\n{tab}L={left}\n{tab}R={right}",
                S::bf(arena, i),
                n.left,
                n.right
            )
        }
    }
}
