use crate::avl::tree;
use crate::entry::Entry;
use std::cmp;

/// A struct representing an internal node of an AVL tree.
///
/// The height of an absent child is 0, so a leaf has height 1.
pub struct Node<T, U> {
    pub entry: Entry<T, U>,
    pub height: usize,
    pub left: tree::Tree<T, U>,
    pub right: tree::Tree<T, U>,
}

impl<T, U> Node<T, U> {
    pub fn new(key: T, value: U) -> Self {
        Node {
            entry: Entry { key, value },
            height: 1,
            left: None,
            right: None,
        }
    }

    /// Recomputes the height from the children. Must be called whenever a child
    /// link changes.
    pub fn update_height(&mut self) {
        self.height = cmp::max(tree::height(&self.left), tree::height(&self.right)) + 1;
    }

    /// Signed balance factor: height of the left subtree minus height of the
    /// right subtree. The tree is rebalanced whenever this leaves [-1, 1].
    pub fn balance_factor(&self) -> i32 {
        (tree::height(&self.left) as i32) - (tree::height(&self.right) as i32)
    }
}
