//! Bidirectional ordered map backed by two AVL trees over one arena of
//! records.
//!
//! A [`Bimap`] stores `(left, right)` pairings once each and keeps them
//! reachable from both directions: sorted by left key and sorted by right
//! key, with lookup, insertion, and erasure in O(log n) on either side.
//! Uniqueness is enforced per side, so the mapping is always 1:1. Cursors
//! on one side [`flip`](LeftCursor::flip) to the other side's cursor for
//! the same record in O(1).
//!
//! Ordering is comparator-driven. The [`Bimap::new`] constructor wires up
//! `PartialOrd`-based comparators; [`Bimap::with_comparators`] accepts any
//! pair of `Fn(&K, &K) -> i32` orderers, closures with captured state
//! included.
//!
//! ```
//! use bimap_forest::Bimap;
//!
//! let mut map: Bimap<u64, String> = Bimap::new();
//! map.insert(1, "one".to_string());
//! map.insert(2, "two".to_string());
//! assert_eq!(map.at_left(&2), Ok(&"two".to_string()));
//! assert_eq!(map.at_right(&"one".to_string()), Ok(&1));
//!
//! let it = map.find_left(&1);
//! assert_eq!(*map.right_key(it.flip()), "one");
//! ```
//!
//! Mutating operations give the strong guarantee: a panic out of a
//! comparator, a key clone, or `Default::default` leaves the map in the
//! state it held before the call.

mod avl;
mod bimap;
mod cursor;
mod error;
mod node;
mod print;
mod types;

pub use bimap::Bimap;
pub use cursor::{LeftCursor, LeftIter, RightCursor, RightIter};
pub use error::NotFound;
