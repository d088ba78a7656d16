use crate::avl::node::Node;
use crate::avl::tree;
use crate::entry::Entry;
use crate::error::DuplicateKeyError;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;

/// An ordered map implemented using an AVL tree.
///
/// An AVL tree is a self-balancing binary search tree that maintains the
/// invariant that the heights of the two child subtrees of any node differ by
/// at most one. Inserting a key that is already present is rejected rather than
/// merged or overwritten.
///
/// # Examples
///
/// ```
/// use balanced_collections::avl::AvlMap;
///
/// let mut map = AvlMap::new();
/// assert_eq!(map.insert(0, 1), Ok(()));
/// map.insert(3, 4).unwrap();
///
/// assert_eq!(map.get(&0), Some(&1));
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// assert!(map.insert(3, 5).is_err());
/// assert_eq!(map.get(&3), Some(&4));
///
/// assert_eq!(map.remove(&0), Some((0, 1)));
/// assert_eq!(map.remove(&1), None);
/// ```
pub struct AvlMap<T, U> {
    tree: tree::Tree<T, U>,
    len: usize,
}

impl<T, U> AvlMap<T, U> {
    /// Constructs a new, empty `AvlMap<T, U>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl::AvlMap;
    ///
    /// let map: AvlMap<u32, u32> = AvlMap::new();
    /// ```
    pub fn new() -> Self {
        AvlMap { tree: None, len: 0 }
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key is already present, the map is left structurally untouched
    /// and the rejected pair is handed back inside the error.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// assert_eq!(map.insert(1, 1), Ok(()));
    ///
    /// let err = map.insert(1, 2).unwrap_err();
    /// assert_eq!((err.key, err.value), (1, 2));
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> Result<(), DuplicateKeyError<T, U>>
    where
        T: Ord,
    {
        let AvlMap {
            ref mut tree,
            ref mut len,
        } = self;
        match tree::insert(tree, Node::new(key, value)) {
            Ok(()) => {
                *len += 1;
                Ok(())
            },
            Err(Entry { key, value }) => Err(DuplicateKeyError { key, value }),
        }
    }

    /// Removes a key-value pair from the map. If the key exists in the map, it
    /// will return the associated key-value pair. Otherwise it will return
    /// `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1).unwrap();
    /// assert_eq!(map.remove(&1), Some((1, 1)));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Option<(T, U)>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let AvlMap {
            ref mut tree,
            ref mut len,
        } = self;
        tree::remove(tree, key).map(|entry| {
            let Entry { key, value } = entry;
            *len -= 1;
            (key, value)
        })
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1).unwrap();
    /// assert!(!map.contains_key(&0));
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns an immutable reference to the value associated with a particular
    /// key. It will return `None` if the key does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1).unwrap();
    /// assert_eq!(map.get(&0), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn get<V>(&self, key: &V) -> Option<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::get(&self.tree, key).map(|entry| &entry.value)
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1).unwrap();
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl::AvlMap;
    ///
    /// let map: AvlMap<u32, u32> = AvlMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the map, removing all values. Every node is dropped exactly once.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1).unwrap();
    /// map.insert(2, 2).unwrap();
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree = None;
        self.len = 0;
    }

    /// Returns an iterator over the map. The iterator will yield key-value
    /// pairs using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(2, 2).unwrap();
    /// map.insert(1, 1).unwrap();
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&2, &2)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlMapIter<'_, T, U> {
        AvlMapIter {
            current: &self.tree,
            stack: Vec::new(),
        }
    }

    /// Returns an iterator over the map yielding key-value pairs using
    /// pre-order traversal (node before children, left before right).
    ///
    /// Intended for verifying tree shape; ordinary consumers should use
    /// [`iter`](Self::iter).
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(2, 2).unwrap();
    /// map.insert(1, 1).unwrap();
    /// map.insert(3, 3).unwrap();
    ///
    /// let keys: Vec<&u32> = map.preorder().map(|pair| pair.0).collect();
    /// assert_eq!(keys, vec![&2, &1, &3]);
    /// ```
    pub fn preorder(&self) -> AvlMapPreorderIter<'_, T, U> {
        AvlMapPreorderIter {
            stack: self.tree.iter().map(|node| &**node).collect(),
        }
    }

    /// Returns an iterator over the map yielding key-value pairs using
    /// post-order traversal (children before node, left before right).
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(2, 2).unwrap();
    /// map.insert(1, 1).unwrap();
    /// map.insert(3, 3).unwrap();
    ///
    /// let keys: Vec<&u32> = map.postorder().map(|pair| pair.0).collect();
    /// assert_eq!(keys, vec![&1, &3, &2]);
    /// ```
    pub fn postorder(&self) -> AvlMapPostorderIter<'_, T, U> {
        AvlMapPostorderIter {
            stack: self.tree.iter().map(|node| (&**node, false)).collect(),
        }
    }

    /// Walks the whole tree and panics if any invariant is violated: the BST
    /// property, exact height bookkeeping, every balance factor in [-1, 1], or
    /// a node count diverging from `len`.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_invariants(&self)
    where
        T: Ord,
    {
        assert_eq!(tree::check_invariants(&self.tree), self.len);
    }
}

impl<T, U> IntoIterator for AvlMap<T, U> {
    type IntoIter = AvlMapIntoIter<T, U>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            current: self.tree,
            stack: Vec::new(),
        }
    }
}

impl<'a, T, U> IntoIterator for &'a AvlMap<T, U>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = AvlMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `AvlMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields owned
/// entries.
pub struct AvlMapIntoIter<T, U> {
    current: tree::Tree<T, U>,
    stack: Vec<Node<T, U>>,
}

impl<T, U> Iterator for AvlMapIntoIter<T, U> {
    type Item = (T, U);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(mut node) = self.current.take() {
            self.current = node.left.take();
            self.stack.push(*node);
        }
        self.stack.pop().map(|node| {
            let Node {
                entry: Entry { key, value },
                right,
                ..
            } = node;
            self.current = right;
            (key, value)
        })
    }
}

/// An iterator for `AvlMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields
/// immutable references.
pub struct AvlMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    current: &'a tree::Tree<T, U>,
    stack: Vec<&'a Node<T, U>>,
}

impl<'a, T, U> Iterator for AvlMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ref node) = self.current {
            self.current = &node.left;
            self.stack.push(node);
        }
        self.stack.pop().map(|node| {
            self.current = &node.right;
            (&node.entry.key, &node.entry.value)
        })
    }
}

/// A pre-order iterator for `AvlMap<T, U>`.
pub struct AvlMapPreorderIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    stack: Vec<&'a Node<T, U>>,
}

impl<'a, T, U> Iterator for AvlMapPreorderIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        self.stack.pop().map(|node| {
            if let Some(ref right) = node.right {
                self.stack.push(right);
            }
            if let Some(ref left) = node.left {
                self.stack.push(left);
            }
            (&node.entry.key, &node.entry.value)
        })
    }
}

/// A post-order iterator for `AvlMap<T, U>`.
pub struct AvlMapPostorderIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    // the flag records whether the node's children have been expanded yet
    stack: Vec<(&'a Node<T, U>, bool)>,
}

impl<'a, T, U> Iterator for AvlMapPostorderIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, expanded)) = self.stack.pop() {
            if expanded {
                return Some((&node.entry.key, &node.entry.value));
            }
            self.stack.push((node, true));
            if let Some(ref right) = node.right {
                self.stack.push((right, false));
            }
            if let Some(ref left) = node.left {
                self.stack.push((left, false));
            }
        }
        None
    }
}

impl<T, U> Default for AvlMap<T, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U> fmt::Debug for AvlMap<T, U>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T, U> PartialEq for AvlMap<T, U>
where
    T: PartialEq,
    U: PartialEq,
{
    fn eq(&self, other: &AvlMap<T, U>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T, U> Eq for AvlMap<T, U>
where
    T: Eq,
    U: Eq,
{
}

impl<T, U> Serialize for AvlMap<T, U>
where
    T: Ord + Serialize,
    U: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, T, U> Deserialize<'de> for AvlMap<T, U>
where
    T: Ord + Deserialize<'de>,
    U: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AvlMapVisitor<T, U> {
            marker: PhantomData<(T, U)>,
        }

        impl<'de, T, U> Visitor<'de> for AvlMapVisitor<T, U>
        where
            T: Ord + Deserialize<'de>,
            U: Deserialize<'de>,
        {
            type Value = AvlMap<T, U>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = AvlMap::new();
                while let Some((key, value)) = access.next_entry()? {
                    // the first occurrence of a duplicate key wins
                    let _ = map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(AvlMapVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::AvlMap;
    use crate::avl::tree;
    use crate::error::DuplicateKeyError;
    use serde_test::{assert_tokens, Token};

    #[test]
    fn test_len_empty() {
        let map: AvlMap<u32, u32> = AvlMap::new();
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let map: AvlMap<u32, u32> = AvlMap::new();
        assert!(map.is_empty());
    }

    #[test]
    fn test_insert() {
        let mut map = AvlMap::new();
        assert_eq!(map.insert(1, 1), Ok(()));
        assert!(map.contains_key(&1));
        assert_eq!(map.get(&1), Some(&1));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insert_duplicate_is_rejected() {
        let mut map = AvlMap::new();
        map.insert(1, 1).unwrap();
        map.insert(2, 2).unwrap();

        let before: Vec<(u32, u32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(
            map.insert(1, 3),
            Err(DuplicateKeyError { key: 1, value: 3 }),
        );

        assert_eq!(map.get(&1), Some(&1));
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<(u32, u32)>>(),
            before
        );
        map.check_invariants();
    }

    #[test]
    fn test_remove() {
        let mut map = AvlMap::new();
        map.insert(1, 1).unwrap();
        assert_eq!(map.remove(&1), Some((1, 1)));
        assert!(!map.contains_key(&1));
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_remove_absent() {
        let mut map: AvlMap<u32, u32> = AvlMap::new();
        assert_eq!(map.remove(&1), None);

        map.insert(2, 2).unwrap();
        assert_eq!(map.remove(&1), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_one_child() {
        let mut map = AvlMap::new();
        for key in &[2, 1, 4, 3] {
            map.insert(*key, *key).unwrap();
        }

        assert_eq!(map.remove(&4), Some((4, 4)));
        map.check_invariants();
        assert_eq!(
            map.iter().map(|pair| *pair.0).collect::<Vec<u32>>(),
            vec![1, 2, 3],
        );
    }

    #[test]
    fn test_remove_two_children_keeps_successor_value() {
        let mut map = AvlMap::new();
        for key in &[5, 3, 8, 1, 4, 7, 9] {
            map.insert(*key, *key * 10).unwrap();
        }

        // 5 has two children; its successor 7 must move up with its own value
        assert_eq!(map.remove(&5), Some((5, 50)));
        map.check_invariants();
        assert_eq!(map.get(&7), Some(&70));
    }

    #[test]
    fn test_round_trip_sequence() {
        let mut map = AvlMap::new();
        for key in &[5, 3, 8, 1, 4, 7, 9] {
            map.insert(*key, *key).unwrap();
        }
        assert_eq!(map.remove(&3), Some((3, 3)));
        assert_eq!(map.remove(&8), Some((8, 8)));

        map.check_invariants();
        assert_eq!(
            map.iter().map(|pair| *pair.0).collect::<Vec<u32>>(),
            vec![1, 4, 5, 7, 9],
        );
    }

    #[test]
    fn test_sequential_inserts_stay_balanced() {
        let mut map = AvlMap::new();
        for key in 1..=7u32 {
            map.insert(key, key).unwrap();
            map.check_invariants();
        }

        // 7 sequential keys settle into a perfect tree of height 3
        assert_eq!(tree::height(&map.tree), 3);
        assert_eq!(
            map.preorder().map(|pair| *pair.0).collect::<Vec<u32>>(),
            vec![4, 2, 1, 3, 6, 5, 7],
        );
    }

    #[test]
    fn test_deletion_cascade() {
        let mut map = AvlMap::new();
        for key in 0..15u32 {
            map.insert(key, key).unwrap();
        }

        assert_eq!(map.remove(&0), Some((0, 0)));
        map.check_invariants();
        assert_eq!(map.len(), 14);
    }

    #[test]
    fn test_clear() {
        let mut map = AvlMap::new();
        map.insert(1, 1).unwrap();
        map.insert(2, 2).unwrap();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.iter().next(), None);
    }

    #[test]
    fn test_iter() {
        let mut map = AvlMap::new();
        map.insert(1, 2).unwrap();
        map.insert(5, 6).unwrap();
        map.insert(3, 4).unwrap();

        assert_eq!(
            map.iter().collect::<Vec<(&u32, &u32)>>(),
            vec![(&1, &2), (&3, &4), (&5, &6)],
        );
    }

    #[test]
    fn test_into_iter() {
        let mut map = AvlMap::new();
        map.insert(1, 2).unwrap();
        map.insert(5, 6).unwrap();
        map.insert(3, 4).unwrap();

        assert_eq!(
            map.into_iter().collect::<Vec<(u32, u32)>>(),
            vec![(1, 2), (3, 4), (5, 6)],
        );
    }

    #[test]
    fn test_preorder_postorder() {
        let mut map = AvlMap::new();
        for key in &[2, 1, 3] {
            map.insert(*key, *key).unwrap();
        }

        assert_eq!(
            map.preorder().map(|pair| *pair.0).collect::<Vec<u32>>(),
            vec![2, 1, 3],
        );
        assert_eq!(
            map.postorder().map(|pair| *pair.0).collect::<Vec<u32>>(),
            vec![1, 3, 2],
        );

        // restartable: a fresh traversal starts from the root again
        assert_eq!(map.preorder().next(), map.preorder().next());
    }

    #[test]
    fn test_serde() {
        let mut map = AvlMap::<u32, u32>::new();
        map.insert(1, 2).unwrap();
        map.insert(3, 4).unwrap();

        assert_tokens(
            &map,
            &[
                Token::Map { len: Some(2) },
                Token::U32(1),
                Token::U32(2),
                Token::U32(3),
                Token::U32(4),
                Token::MapEnd,
            ],
        );
    }
}
