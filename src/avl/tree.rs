use crate::avl::node::Node;
use crate::entry::Entry;
use std::borrow::Borrow;
use std::cmp::Ordering;

pub type Tree<T, U> = Option<Box<Node<T, U>>>;

pub fn height<T, U>(tree: &Tree<T, U>) -> usize {
    match tree {
        None => 0,
        Some(ref node) => node.height,
    }
}

/// Promotes the right child to the root of the subtree. Heights are recomputed
/// bottom-up: the demoted node first, then the new subtree root.
fn rotate_left<T, U>(mut node: Box<Node<T, U>>) -> Box<Node<T, U>> {
    let mut child = node
        .right
        .take()
        .expect("Expected right child node to be `Some`.");
    node.right = child.left.take();
    node.update_height();
    child.left = Some(node);
    child.update_height();
    child
}

/// Promotes the left child to the root of the subtree.
fn rotate_right<T, U>(mut node: Box<Node<T, U>>) -> Box<Node<T, U>> {
    let mut child = node
        .left
        .take()
        .expect("Expected left child node to be `Some`.");
    node.left = child.right.take();
    node.update_height();
    child.right = Some(node);
    child.update_height();
    child
}

/// Restores the balance invariant at the root of the subtree after one of its
/// children changed height.
///
/// An inner-heavy child (its balance factor leaning the opposite way) is first
/// rotated away from the outer direction, turning the double-rotation case into
/// the single-rotation case; the subtree root is then rotated toward the outer
/// direction. At most one single or double rotation is applied per call.
fn rebalance<T, U>(tree: &mut Tree<T, U>) {
    let mut node = match tree.take() {
        Some(node) => node,
        None => return,
    };

    node.update_height();

    if node.balance_factor() > 1 {
        if let Some(child) = node.left.take() {
            if child.balance_factor() < 0 {
                node.left = Some(rotate_left(child));
            } else {
                node.left = Some(child);
            }
        }
        node = rotate_right(node);
    } else if node.balance_factor() < -1 {
        if let Some(child) = node.right.take() {
            if child.balance_factor() > 0 {
                node.right = Some(rotate_right(child));
            } else {
                node.right = Some(child);
            }
        }
        node = rotate_left(node);
    }

    *tree = Some(node);
}

// precondition: there exists a minimum node in the tree
fn remove_min<T, U>(tree: &mut Tree<T, U>) -> Box<Node<T, U>> {
    if let Some(ref mut node) = tree {
        if node.left.is_some() {
            let min = remove_min(&mut node.left);
            rebalance(tree);
            return min;
        }
    }

    match tree.take() {
        Some(mut node) => {
            *tree = node.right.take();
            node
        },
        None => unreachable!(),
    }
}

/// Replaces a removed two-child node with its in-order successor: the minimum
/// node of the right subtree is unlinked and adopts both subtrees. The
/// successor node moves wholesale, so its key and value stay together.
fn splice_successor<T, U>(left_tree: Tree<T, U>, mut right_tree: Tree<T, U>) -> Tree<T, U> {
    let mut successor = remove_min(&mut right_tree);
    successor.left = left_tree;
    successor.right = right_tree;
    Some(successor)
}

/// Inserts the new node at the leaf position given by its key, rebalancing
/// every level on the way back up.
///
/// If the key is already present the tree is left untouched and the rejected
/// entry is handed back; no heights change, so the unwind skips rebalancing
/// entirely.
pub fn insert<T, U>(tree: &mut Tree<T, U>, new_node: Node<T, U>) -> Result<(), Entry<T, U>>
where
    T: Ord,
{
    let ret = match tree {
        Some(ref mut node) => match new_node.entry.key.cmp(&node.entry.key) {
            Ordering::Less => insert(&mut node.left, new_node),
            Ordering::Greater => insert(&mut node.right, new_node),
            Ordering::Equal => return Err(new_node.entry),
        },
        None => {
            *tree = Some(Box::new(new_node));
            return Ok(());
        },
    };

    if ret.is_ok() {
        rebalance(tree);
    }
    ret
}

/// Removes the node matching the key, if any, and returns its entry.
///
/// A node with at most one child is spliced out directly; a node with two
/// children is replaced by its in-order successor. Every level of the unwind
/// recomputes heights and rebalances, since removing height from one side can
/// cascade imbalance upward.
pub fn remove<T, U, V>(tree: &mut Tree<T, U>, key: &V) -> Option<Entry<T, U>>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let ret = match tree.take() {
        Some(mut node) => match key.cmp(node.entry.key.borrow()) {
            Ordering::Less => {
                let ret = remove(&mut node.left, key);
                *tree = Some(node);
                ret
            },
            Ordering::Greater => {
                let ret = remove(&mut node.right, key);
                *tree = Some(node);
                ret
            },
            Ordering::Equal => {
                let Node { entry, left, right, .. } = *node;
                match (left, right) {
                    (None, right) => *tree = right,
                    (left, None) => *tree = left,
                    (left, right) => *tree = splice_successor(left, right),
                }
                Some(entry)
            },
        },
        None => return None,
    };

    if ret.is_some() {
        rebalance(tree);
    }
    ret
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
/// increasing keys in order, exact height bookkeeping, and every balance factor
/// in [-1, 1]. Returns the number of nodes.
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
            None => return (0, 0),
        };
        if let Some(lower) = lower {
            assert!(*lower < node.entry.key, "Expected strictly increasing keys.");
        }
        if let Some(upper) = upper {
            assert!(node.entry.key < *upper, "Expected strictly increasing keys.");
        }
        let (left_height, left_count) = check(&node.left, lower, Some(&node.entry.key));
        let (right_height, right_count) = check(&node.right, Some(&node.entry.key), upper);
        assert_eq!(
            node.height,
            std::cmp::max(left_height, right_height) + 1,
            "Expected heights to be recomputed on every structural change.",
        );
        assert!(
            (left_height as i32 - right_height as i32).abs() <= 1,
            "Expected balance factor in [-1, 1].",
        );
        (node.height, left_count + right_count + 1)
    }

    check(tree, None, None).1
}
