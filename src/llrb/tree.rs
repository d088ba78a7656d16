use crate::entry::Entry;
use crate::llrb::node::{Color, Node};
use std::borrow::Borrow;
use std::cmp::Ordering;

pub type Tree<T, U> = Option<Box<Node<T, U>>>;

pub fn is_red<T, U>(tree: &Tree<T, U>) -> bool {
    match tree {
        None => false,
        Some(ref node) => node.color == Color::Red,
    }
}

// a 2-node equivalent: black, with a black left child
fn is_two_node<T, U>(tree: &Tree<T, U>) -> bool {
    match tree {
        Some(ref node) => node.color != Color::Red && !is_red(&node.left),
        None => false,
    }
}

/// Moves a red link from the right to the left: the right child is promoted,
/// takes over the old root's color, and the old root turns red beneath it.
fn rotate_left<T, U>(mut node: Box<Node<T, U>>) -> Box<Node<T, U>> {
    let mut child = node
        .right
        .take()
        .expect("Expected right child node to be `Some`.");
    node.right = child.left.take();
    child.color = node.color;
    node.color = Color::Red;
    child.left = Some(node);
    child
}

/// Mirror image of `rotate_left`.
fn rotate_right<T, U>(mut node: Box<Node<T, U>>) -> Box<Node<T, U>> {
    let mut child = node
        .left
        .take()
        .expect("Expected left child node to be `Some`.");
    node.left = child.right.take();
    child.color = node.color;
    node.color = Color::Red;
    child.right = Some(node);
    child
}

/// The shared rebalance step of the removal path: the same three checks as
/// insertion's unwind, with the left-lean rotation applied whenever the right
/// child is red.
fn balance<T, U>(mut node: Box<Node<T, U>>) -> Box<Node<T, U>> {
    if is_red(&node.right) {
        node = rotate_left(node);
    }

    let double_red_left = match node.left {
        Some(ref child) => child.color == Color::Red && is_red(&child.left),
        None => false,
    };
    if double_red_left {
        node = rotate_right(node);
    }

    if is_red(&node.left) && is_red(&node.right) {
        node.flip_colors();
    }

    node
}

/// Pushes a red link down into the left child when it and its left child are
/// both black, so that the removal path never steps through a 2-node.
fn move_red_left<T, U>(mut node: Box<Node<T, U>>) -> Box<Node<T, U>> {
    node.flip_colors();

    let right_left_red = match node.right {
        Some(ref child) => is_red(&child.left),
        None => false,
    };
    if right_left_red {
        let right = node
            .right
            .take()
            .expect("Expected right child node to be `Some`.");
        node.right = Some(rotate_right(right));
        node = rotate_left(node);
        node.flip_colors();
    }

    node
}

/// Mirror image of `move_red_left` for descents into the right subtree.
fn move_red_right<T, U>(mut node: Box<Node<T, U>>) -> Box<Node<T, U>> {
    node.flip_colors();

    let left_left_red = match node.left {
        Some(ref child) => is_red(&child.left),
        None => false,
    };
    if left_left_red {
        node = rotate_right(node);
        node.flip_colors();
    }

    node
}

/// Lends the root's blackness down the removal path: the root turns red when
/// both its children are black. Called once before a removal; the root is
/// re-blackened afterwards.
pub fn redden_root<T, U>(tree: &mut Tree<T, U>) {
    if let Some(ref mut node) = tree {
        if !is_red(&node.left) && !is_red(&node.right) {
            node.color = Color::Red;
        }
    }
}

pub fn blacken_root<T, U>(tree: &mut Tree<T, U>) {
    if let Some(ref mut node) = tree {
        node.color = Color::Black;
    }
}

/// Inserts the new node at the leaf position given by its key.
///
/// The unwind applies, at every level and in fixed order: a left rotation if
/// the right child is red and the left is not, a right rotation if the left
/// child and left-left grandchild are both red, and a color flip if both
/// children are red. The flip pushes a red link one level up, where the
/// caller's identical checks absorb it.
///
/// If the key is already present the tree is left untouched, colors included,
/// and the rejected entry is handed back.
pub fn insert<T, U>(tree: &mut Tree<T, U>, new_node: Node<T, U>) -> Result<(), Entry<T, U>>
where
    T: Ord,
{
    let mut node = match tree.take() {
        Some(node) => node,
        None => {
            *tree = Some(Box::new(new_node));
            return Ok(());
        },
    };

    let ret = match new_node.entry.key.cmp(&node.entry.key) {
        Ordering::Less => insert(&mut node.left, new_node),
        Ordering::Greater => insert(&mut node.right, new_node),
        Ordering::Equal => Err(new_node.entry),
    };

    if ret.is_ok() {
        if is_red(&node.right) && !is_red(&node.left) {
            node = rotate_left(node);
        }

        let double_red_left = match node.left {
            Some(ref child) => child.color == Color::Red && is_red(&child.left),
            None => false,
        };
        if double_red_left {
            node = rotate_right(node);
        }

        if is_red(&node.left) && is_red(&node.right) {
            node.flip_colors();
        }
    }

    *tree = Some(node);
    ret
}

// precondition: the search path arrives through a red link or borrows one via
// move_red_left, so the minimum is never unlinked out of a 2-node
fn remove_min<T, U>(mut node: Box<Node<T, U>>) -> (Tree<T, U>, Box<Node<T, U>>) {
    if node.left.is_none() {
        // a minimum with no left child cannot have a right child either:
        // a red one would lean right and a black one would skew black height
        assert!(node.right.is_none());
        return (None, node);
    }

    if is_two_node(&node.left) {
        node = move_red_left(node);
    }

    let left = node
        .left
        .take()
        .expect("Expected left child node to be `Some`.");
    let (left, min) = remove_min(left);
    node.left = left;
    (Some(balance(node)), min)
}

/// Removes the node matching the key, returning the rebuilt subtree and the
/// removed entry.
///
/// Callers must have confirmed that the key is present: the color adjustments
/// made on the way down assume the search terminates at a removable node. A
/// two-child node is replaced by its in-order successor, spliced in wholesale
/// so that its key and value stay together.
fn remove_node<T, U, V>(mut node: Box<Node<T, U>>, key: &V) -> (Tree<T, U>, Entry<T, U>)
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    if key < node.entry.key.borrow() {
        if is_two_node(&node.left) {
            node = move_red_left(node);
        }

        let left = node
            .left
            .take()
            .expect("Expected left child node to be `Some`.");
        let (left, entry) = remove_node(left, key);
        node.left = left;
        (Some(balance(node)), entry)
    } else {
        if is_red(&node.left) {
            node = rotate_right(node);
        }

        if key == node.entry.key.borrow() && node.right.is_none() {
            assert!(node.left.is_none());
            return (None, node.entry);
        }

        if is_two_node(&node.right) {
            node = move_red_right(node);
        }

        if key == node.entry.key.borrow() {
            let right = node
                .right
                .take()
                .expect("Expected right child node to be `Some`.");
            let (right, mut successor) = remove_min(right);
            successor.color = node.color;
            successor.left = node.left.take();
            successor.right = right;
            (Some(balance(successor)), node.entry)
        } else {
            let right = node
                .right
                .take()
                .expect("Expected right child node to be `Some`.");
            let (right, entry) = remove_node(right, key);
            node.right = right;
            (Some(balance(node)), entry)
        }
    }
}

/// Removes the node matching the key and returns its entry.
///
/// The caller is expected to have looked the key up first and to call
/// `redden_root` before and `blacken_root` after.
pub fn remove<T, U, V>(tree: &mut Tree<T, U>, key: &V) -> Option<Entry<T, U>>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let node = tree.take()?;
    let (subtree, entry) = remove_node(node, key);
    *tree = subtree;
    Some(entry)
}

pub fn get<'a, T, U, V>(tree: &'a Tree<T, U>, key: &V) -> Option<&'a Entry<T, U>>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    tree.as_ref().and_then(|node| {
        match key.cmp(node.entry.key.borrow()) {
            Ordering::Less => get(&node.left, key),
            Ordering::Greater => get(&node.right, key),
            Ordering::Equal => Some(&node.entry),
        }
    })
}

/// Walks the whole tree asserting the structural invariants: strictly
/// increasing keys in order, a black root, red links leaning left, no two
/// consecutive red links, and a uniform black height across all root-to-leaf
/// paths. Returns the number of nodes.
#[cfg(any(test, feature = "consistency_check"))]
pub fn check_invariants<T, U>(tree: &Tree<T, U>) -> usize
where
    T: Ord,
{
    fn check<'a, T, U>(
        tree: &'a Tree<T, U>,
        lower: Option<&'a T>,
        upper: Option<&'a T>,
    ) -> (usize, usize)
    where
        T: Ord,
    {
        let node = match tree {
            Some(ref node) => node,
            None => return (1, 0),
        };
        if let Some(lower) = lower {
            assert!(*lower < node.entry.key, "Expected strictly increasing keys.");
        }
        if let Some(upper) = upper {
            assert!(node.entry.key < *upper, "Expected strictly increasing keys.");
        }
        assert!(!is_red(&node.right), "Expected red links to lean left.");
        if node.color == Color::Red {
            assert!(
                !is_red(&node.left),
                "Expected no two consecutive red links.",
            );
        }
        let (left_black_height, left_count) = check(&node.left, lower, Some(&node.entry.key));
        let (right_black_height, right_count) = check(&node.right, Some(&node.entry.key), upper);
        assert_eq!(
            left_black_height, right_black_height,
            "Expected uniform black height.",
        );
        let black = match node.color {
            Color::Black => 1,
            Color::Red => 0,
        };
        (left_black_height + black, left_count + right_count + 1)
    }

    assert!(!is_red(tree), "Expected a black root.");
    check(tree, None, None).1
}
