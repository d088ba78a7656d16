use crate::entry::Entry;
use crate::error::DuplicateKeyError;
use crate::llrb::node::Node;
use crate::llrb::tree;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;

/// An ordered map implemented using a left-leaning red-black tree.
///
/// A left-leaning red-black tree encodes an implicit 2-3 tree in a binary
/// search tree by coloring links: every red link leans left, no two red links
/// are consecutive, and all root-to-leaf paths cross the same number of black
/// links. Inserting a key that is already present is rejected rather than
/// merged or overwritten.
///
/// # Examples
///
/// ```
/// use balanced_collections::llrb::LlrbMap;
///
/// let mut map = LlrbMap::new();
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
pub struct LlrbMap<T, U> {
    tree: tree::Tree<T, U>,
    len: usize,
}

impl<T, U> LlrbMap<T, U> {
    /// Constructs a new, empty `LlrbMap<T, U>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::llrb::LlrbMap;
    ///
    /// let map: LlrbMap<u32, u32> = LlrbMap::new();
    /// ```
    pub fn new() -> Self {
        LlrbMap { tree: None, len: 0 }
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key is already present, the map is left untouched, colors
    /// included, and the rejected pair is handed back inside the error.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::llrb::LlrbMap;
    ///
    /// let mut map = LlrbMap::new();
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
        let LlrbMap {
            ref mut tree,
            ref mut len,
        } = self;
        match tree::insert(tree, Node::new(key, value)) {
            Ok(()) => {
                tree::blacken_root(tree);
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
    /// use balanced_collections::llrb::LlrbMap;
    ///
    /// let mut map = LlrbMap::new();
    /// map.insert(1, 1).unwrap();
    /// assert_eq!(map.remove(&1), Some((1, 1)));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Option<(T, U)>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let LlrbMap {
            ref mut tree,
            ref mut len,
        } = self;

        // the removal path borrows red links on the way down, so an absent key
        // is ruled out before any color is touched
        tree::get(tree, key)?;

        tree::redden_root(tree);
        let ret = tree::remove(tree, key);
        tree::blacken_root(tree);

        ret.map(|entry| {
            let Entry { key, value } = entry;
            *len -= 1;
            (key, value)
        })
    }

    /// Checks if a key exists in the map. Lookups ignore colors entirely.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::llrb::LlrbMap;
    ///
    /// let mut map = LlrbMap::new();
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
    /// use balanced_collections::llrb::LlrbMap;
    ///
    /// let mut map = LlrbMap::new();
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
    /// use balanced_collections::llrb::LlrbMap;
    ///
    /// let mut map = LlrbMap::new();
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
    /// use balanced_collections::llrb::LlrbMap;
    ///
    /// let map: LlrbMap<u32, u32> = LlrbMap::new();
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
    /// use balanced_collections::llrb::LlrbMap;
    ///
    /// let mut map = LlrbMap::new();
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
    /// use balanced_collections::llrb::LlrbMap;
    ///
    /// let mut map = LlrbMap::new();
    /// map.insert(2, 2).unwrap();
    /// map.insert(1, 1).unwrap();
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&2, &2)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> LlrbMapIter<'_, T, U> {
        LlrbMapIter {
            current: &self.tree,
            stack: Vec::new(),
        }
    }

    /// Returns an iterator over the map yielding key-value pairs using
    /// pre-order traversal (node before children, left before right).
    ///
    /// Intended for verifying tree shape; ordinary consumers should use
    /// [`iter`](Self::iter).
    pub fn preorder(&self) -> LlrbMapPreorderIter<'_, T, U> {
        LlrbMapPreorderIter {
            stack: self.tree.iter().map(|node| &**node).collect(),
        }
    }

    /// Returns an iterator over the map yielding key-value pairs using
    /// post-order traversal (children before node, left before right).
    pub fn postorder(&self) -> LlrbMapPostorderIter<'_, T, U> {
        LlrbMapPostorderIter {
            stack: self.tree.iter().map(|node| (&**node, false)).collect(),
        }
    }

    /// Walks the whole tree and panics if any invariant is violated: the BST
    /// property, a red right child, two consecutive red links, unequal black
    /// heights, a red root, or a node count diverging from `len`.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_invariants(&self)
    where
        T: Ord,
    {
        assert_eq!(tree::check_invariants(&self.tree), self.len);
    }
}

impl<T, U> IntoIterator for LlrbMap<T, U> {
    type IntoIter = LlrbMapIntoIter<T, U>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            current: self.tree,
            stack: Vec::new(),
        }
    }
}

impl<'a, T, U> IntoIterator for &'a LlrbMap<T, U>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = LlrbMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `LlrbMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields owned
/// entries.
pub struct LlrbMapIntoIter<T, U> {
    current: tree::Tree<T, U>,
    stack: Vec<Node<T, U>>,
}

impl<T, U> Iterator for LlrbMapIntoIter<T, U> {
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

/// An iterator for `LlrbMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields
/// immutable references.
pub struct LlrbMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    current: &'a tree::Tree<T, U>,
    stack: Vec<&'a Node<T, U>>,
}

impl<'a, T, U> Iterator for LlrbMapIter<'a, T, U>
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

/// A pre-order iterator for `LlrbMap<T, U>`.
pub struct LlrbMapPreorderIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    stack: Vec<&'a Node<T, U>>,
}

impl<'a, T, U> Iterator for LlrbMapPreorderIter<'a, T, U>
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

/// A post-order iterator for `LlrbMap<T, U>`.
pub struct LlrbMapPostorderIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    // the flag records whether the node's children have been expanded yet
    stack: Vec<(&'a Node<T, U>, bool)>,
}

impl<'a, T, U> Iterator for LlrbMapPostorderIter<'a, T, U>
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

impl<T, U> Default for LlrbMap<T, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U> fmt::Debug for LlrbMap<T, U>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T, U> PartialEq for LlrbMap<T, U>
where
    T: PartialEq,
    U: PartialEq,
{
    fn eq(&self, other: &LlrbMap<T, U>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T, U> Eq for LlrbMap<T, U>
where
    T: Eq,
    U: Eq,
{
}

impl<T, U> Serialize for LlrbMap<T, U>
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

impl<'de, T, U> Deserialize<'de> for LlrbMap<T, U>
where
    T: Ord + Deserialize<'de>,
    U: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LlrbMapVisitor<T, U> {
            marker: PhantomData<(T, U)>,
        }

        impl<'de, T, U> Visitor<'de> for LlrbMapVisitor<T, U>
        where
            T: Ord + Deserialize<'de>,
            U: Deserialize<'de>,
        {
            type Value = LlrbMap<T, U>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = LlrbMap::new();
                while let Some((key, value)) = access.next_entry()? {
                    // the first occurrence of a duplicate key wins
                    let _ = map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(LlrbMapVisitor {
            marker: PhantomData,
        })
    }
}
