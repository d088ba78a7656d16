//! Self-balancing binary search tree that uses a color bit per node to encode
//! an implicit 2-3 tree: a red node and its parent together form a 3-node.
//!
//! The left-leaning variant keeps every red link on the left, which collapses
//! the rebalancing rules to a fixed three-step check (rotate left, rotate
//! right, flip colors) applied while unwinding the recursion. Unlike the AVL
//! tree's single rotation per insertion, an insertion here may rotate or flip
//! at every ancestor level, but each step is O(1).

mod map;
mod node;
mod set;
mod tree;

pub use self::map::{
    LlrbMap, LlrbMapIntoIter, LlrbMapIter, LlrbMapPostorderIter, LlrbMapPreorderIter,
};
pub use self::set::{LlrbSet, LlrbSetIntoIter, LlrbSetIter};
