//! An ordered skip list which keeps its elements sorted by a key derived from
//! each element, tolerates duplicate keys and (optionally) supports
//! positional access in O(log n) expected time.
//!
//! Positional access works the same way it does in a rope: every forward
//! pointer also records how many level 0 steps it jumps over. Summing those
//! widths while walking down the levels finds the n-th element without
//! visiting the elements in between.
//!
//! ```
//! use indexed_skiplist::{Options, SkipList};
//!
//! let options = Options { seed: Some(7), ..Options::default() };
//! let mut list = SkipList::with_options(|s: &(u32, &'static str)| s.0, options).unwrap();
//! list.extend(vec![(5, "e"), (3, "c"), (8, "h"), (1, "a")]);
//!
//! assert_eq!(list.first().unwrap().1, "a");
//! assert_eq!(list.get(2).unwrap().1, "e");
//! assert_eq!(list.get(-1).unwrap().1, "h");
//! ```

#[macro_use]
mod tracing_helpers;

mod api;
mod error;
mod height;
mod index;
mod node;
mod options;
mod range;
mod skiplist;

pub use crate::error::{Result, SkipListError};
pub use crate::height::{max_height, sample_height};
pub use crate::node::{NodeDescription, NodeKey, NodeRef};
pub use crate::options::{Options, DEFAULT_PROBABILITY};
pub use crate::range::{Iter, Keys, SubList};
pub use crate::skiplist::{Placement, SkipList};
