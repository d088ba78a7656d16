//! An extension to the ordered collections in the standard library with two
//! interchangeable self-balancing binary search trees.
//!
//! Both trees implement the same ordered map contract with O(log n) search,
//! insertion, and deletion; they differ only in how they rebalance:
//!
//! - [`avl`] — a height-balanced tree. Every node stores the height of its
//!   subtree, and an insertion or deletion that drives the height difference of
//!   two sibling subtrees to two is repaired with a single or double rotation.
//! - [`llrb`] — a left-leaning red-black tree. Every node stores a color bit
//!   encoding an implicit 2-3 tree, and rebalancing is a fixed sequence of
//!   rotations and color flips applied while unwinding the recursion.
//!
//! Duplicate keys are rejected rather than overwritten: inserting a key that is
//! already present leaves the tree untouched and hands the rejected pair back
//! to the caller as a [`DuplicateKeyError`].

mod entry;
mod error;

pub mod avl;
pub mod llrb;

pub use crate::error::DuplicateKeyError;
