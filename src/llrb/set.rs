use crate::llrb::map::{LlrbMap, LlrbMapIntoIter, LlrbMapIter};
use std::borrow::Borrow;
use std::fmt;

/// An ordered set implemented using a left-leaning red-black tree.
///
/// A left-leaning red-black tree encodes an implicit 2-3 tree in a binary
/// search tree by coloring links: every red link leans left, no two red links
/// are consecutive, and all root-to-leaf paths cross the same number of black
/// links.
///
/// # Examples
///
/// ```
/// use balanced_collections::llrb::LlrbSet;
///
/// let mut set = LlrbSet::new();
/// assert!(set.insert(0));
/// assert!(set.insert(3));
/// assert!(!set.insert(3));
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.remove(&0), Some(0));
/// assert_eq!(set.remove(&1), None);
/// ```
pub struct LlrbSet<T> {
    map: LlrbMap<T, ()>,
}

impl<T> LlrbSet<T> {
    /// Constructs a new, empty `LlrbSet<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::llrb::LlrbSet;
    ///
    /// let set: LlrbSet<u32> = LlrbSet::new();
    /// ```
    pub fn new() -> Self {
        LlrbSet {
            map: LlrbMap::new(),
        }
    }

    /// Inserts a key into the set. Returns `true` if the key was not already
    /// present; a duplicate key is rejected and leaves the set untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::llrb::LlrbSet;
    ///
    /// let mut set = LlrbSet::new();
    /// assert!(set.insert(1));
    /// assert!(set.contains(&1));
    /// assert!(!set.insert(1));
    /// ```
    pub fn insert(&mut self, key: T) -> bool
    where
        T: Ord,
    {
        self.map.insert(key, ()).is_ok()
    }

    /// Removes a key from the set. If the key exists in the set, it will return
    /// the associated key. Otherwise it will return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::llrb::LlrbSet;
    ///
    /// let mut set = LlrbSet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove(&1), Some(1));
    /// assert_eq!(set.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Option<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.map.remove(key).map(|pair| pair.0)
    }

    /// Checks if a key exists in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::llrb::LlrbSet;
    ///
    /// let mut set = LlrbSet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::llrb::LlrbSet;
    ///
    /// let mut set = LlrbSet::new();
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::llrb::LlrbSet;
    ///
    /// let set: LlrbSet<u32> = LlrbSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clears the set, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::llrb::LlrbSet;
    ///
    /// let mut set = LlrbSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert_eq!(set.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns an iterator over the set. The iterator will yield keys using
    /// in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::llrb::LlrbSet;
    ///
    /// let mut set = LlrbSet::new();
    /// set.insert(3);
    /// set.insert(1);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> LlrbSetIter<'_, T> {
        LlrbSetIter {
            map_iter: self.map.iter(),
        }
    }
}

impl<T> IntoIterator for LlrbSet<T> {
    type IntoIter = LlrbSetIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            map_iter: self.map.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a LlrbSet<T>
where
    T: 'a,
{
    type IntoIter = LlrbSetIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `LlrbSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields owned
/// keys.
pub struct LlrbSetIntoIter<T> {
    map_iter: LlrbMapIntoIter<T, ()>,
}

impl<T> Iterator for LlrbSetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|pair| pair.0)
    }
}

/// An iterator for `LlrbSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields
/// immutable references.
pub struct LlrbSetIter<'a, T>
where
    T: 'a,
{
    map_iter: LlrbMapIter<'a, T, ()>,
}

impl<'a, T> Iterator for LlrbSetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|pair| pair.0)
    }
}

impl<T> Default for LlrbSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for LlrbSet<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::LlrbSet;

    #[test]
    fn test_len_empty() {
        let set: LlrbSet<u32> = LlrbSet::new();
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let set: LlrbSet<u32> = LlrbSet::new();
        assert!(set.is_empty());
    }

    #[test]
    fn test_insert() {
        let mut set = LlrbSet::new();
        assert!(set.insert(1));
        assert!(set.contains(&1));
    }

    #[test]
    fn test_insert_duplicate_is_rejected() {
        let mut set = LlrbSet::new();
        assert!(set.insert(1));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set = LlrbSet::new();
        set.insert(1);
        assert_eq!(set.remove(&1), Some(1));
        assert!(!set.contains(&1));
    }

    #[test]
    fn test_iter() {
        let mut set = LlrbSet::new();
        set.insert(1);
        set.insert(5);
        set.insert(3);

        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &3, &5]);
    }

    #[test]
    fn test_into_iter() {
        let mut set = LlrbSet::new();
        set.insert(1);
        set.insert(5);
        set.insert(3);

        assert_eq!(set.into_iter().collect::<Vec<u32>>(), vec![1, 3, 5]);
    }
}
