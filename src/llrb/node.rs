use crate::entry::Entry;
use crate::llrb::tree;

/// An enum representing the color of a node in a left-leaning red-black tree.
/// An absent child counts as black.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub fn flip(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

/// A struct representing an internal node of a left-leaning red-black tree.
pub struct Node<T, U> {
    pub entry: Entry<T, U>,
    pub color: Color,
    pub left: tree::Tree<T, U>,
    pub right: tree::Tree<T, U>,
}

impl<T, U> Node<T, U> {
    /// New nodes are always red: inserting into the implicit 2-3 tree extends
    /// an existing node rather than adding a level.
    pub fn new(key: T, value: U) -> Self {
        Node {
            entry: Entry { key, value },
            color: Color::Red,
            left: None,
            right: None,
        }
    }

    /// Toggles this node's color and the colors of both children, absorbing or
    /// splitting the 4-node equivalent rooted here.
    pub fn flip_colors(&mut self) {
        self.color = self.color.flip();
        if let Some(ref mut child) = self.left {
            child.color = child.color.flip();
        }
        if let Some(ref mut child) = self.right {
            child.color = child.color.flip();
        }
    }
}
