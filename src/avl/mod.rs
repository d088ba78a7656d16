//! Self-balancing binary search tree where the heights of the two child
//! subtrees of any node differ by at most one.
//!
//! Rebalancing is driven by the balance factor (the signed height difference of
//! a node's children). An insertion restores balance with at most one single or
//! double rotation; a deletion may rotate at every level on the path back to
//! the root.

mod map;
mod node;
mod set;
mod tree;

pub use self::map::{
    AvlMap, AvlMapIntoIter, AvlMapIter, AvlMapPostorderIter, AvlMapPreorderIter,
};
pub use self::set::{AvlSet, AvlSetIntoIter, AvlSetIter};
