use crate::arena::Entry;
use crate::bst::tree::{self as bst_tree, InorderIter, Tree};
use crate::bst::{Cursor, Iter, NodeRef};
use crate::error::Result;
use crate::rst::tree::{self, Direction};
use log::debug;
use rand::{Rng, SeedableRng, XorShiftRng};
use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::result;

/// An ordered set implemented using a randomized search tree.
///
/// A randomized search tree, or treap, is a tree that satisfies both the binary search tree
/// property and a heap property. Each node has a key and a priority. The key of any node is
/// greater than all keys in its left subtree and less than all keys occuring in its right subtree.
/// The priority of a node is greater than or equal to the priority of its children. Priorities
/// are drawn from a random number generator when a node is inserted, so the expected height of
/// the tree is proportional to the logarithm of the number of keys.
///
/// The priority source is any `rand::Rng`. By default the set uses an unseeded `XorShiftRng`, so
/// two sets built with the same sequence of inserts have the same shape.
///
/// # Examples
///
/// ```
/// use search_trees::rst::RstSet;
///
/// let mut set = RstSet::new();
/// assert!(set.insert(5));
/// assert!(set.insert(3));
/// assert!(!set.insert(5));
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.find(&3).get(), Some(&3));
/// assert!(set.find(&4) == set.end());
/// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&3, &5]);
/// assert!(set.is_heap_ordered());
/// ```
pub struct RstSet<T, R = XorShiftRng> {
    tree: Tree<T>,
    rng: R,
}

impl<T> RstSet<T> {
    /// Constructs a new, empty `RstSet<T>` with an unseeded priority source.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rst::RstSet;
    ///
    /// let set: RstSet<u32> = RstSet::new();
    /// ```
    pub fn new() -> Self {
        Self::with_rng(XorShiftRng::new_unseeded())
    }

    /// Constructs a new, empty `RstSet<T>` whose priorities come from a `XorShiftRng` seeded with
    /// `seed`.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rst::RstSet;
    ///
    /// let mut set = RstSet::with_seed([1, 2, 3, 4]);
    /// set.insert(1);
    /// ```
    pub fn with_seed(seed: [u32; 4]) -> Self {
        Self::with_rng(XorShiftRng::from_seed(seed))
    }
}

impl<T, R> RstSet<T, R> {
    /// Constructs a new, empty `RstSet<T, R>` that draws priorities from `rng`.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rst::RstSet;
    ///
    /// let mut set = RstSet::with_rng(rand::thread_rng());
    /// set.insert(1);
    /// ```
    pub fn with_rng(rng: R) -> Self {
        RstSet {
            tree: Tree::new(),
            rng,
        }
    }

    /// Inserts a key into the set, assigns it a random priority and rotates it towards the root
    /// until no node has a higher priority than its parent. Returns `false` and leaves the set
    /// unchanged if the key already exists; no priority is drawn in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rst::RstSet;
    ///
    /// let mut set = RstSet::new();
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert!(set.contains(&1));
    /// ```
    pub fn insert(&mut self, key: T) -> bool
    where
        T: Ord,
        R: Rng,
    {
        let RstSet {
            ref mut tree,
            ref mut rng,
        } = self;
        let inserted = tree::insert(tree, key, rng);
        if !inserted {
            debug!("rejected duplicate key");
        }
        inserted
    }

    /// Inserts a key at its search tree position without drawing a priority or rotating. The new
    /// node has priority zero. Useful for building a tree with a predetermined shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rst::RstSet;
    ///
    /// let mut set = RstSet::new();
    /// set.raw_insert(1);
    /// set.raw_insert(2);
    /// set.raw_insert(3);
    /// assert_eq!(set.height(), 3);
    /// assert_eq!(set.root().map(|node| *node.key()), Some(1));
    /// ```
    pub fn raw_insert(&mut self, key: T) -> bool
    where
        T: Ord,
    {
        bst_tree::insert(&mut self.tree, key, || 0).is_some()
    }

    /// Rotates `child`, the right child of `parent`, into the position of `parent`. Returns
    /// `Error::NotFound` without modifying the set if the two nodes are not such a pair.
    ///
    /// Rotations preserve the order of keys but not necessarily the heap order of priorities.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rst::RstSet;
    ///
    /// let mut set = RstSet::new();
    /// set.raw_insert(1);
    /// set.raw_insert(2);
    ///
    /// let (parent, child) = {
    ///     let root = set.root().unwrap();
    ///     (root.id(), root.right().unwrap())
    /// };
    /// assert!(set.rotate_left(parent, child).is_ok());
    /// assert_eq!(set.root().map(|node| *node.key()), Some(2));
    /// ```
    pub fn rotate_left(&mut self, parent: Entry, child: Entry) -> Result<()> {
        tree::rotate(&mut self.tree, parent, child, Direction::Left)
    }

    /// Rotates `child`, the left child of `parent`, into the position of `parent`. Returns
    /// `Error::NotFound` without modifying the set if the two nodes are not such a pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rst::RstSet;
    /// use search_trees::Error;
    ///
    /// let mut set = RstSet::new();
    /// set.raw_insert(2);
    /// set.raw_insert(1);
    ///
    /// let (parent, child) = {
    ///     let root = set.root().unwrap();
    ///     (root.id(), root.left().unwrap())
    /// };
    /// assert_eq!(set.rotate_right(child, parent), Err(Error::NotFound));
    /// assert!(set.rotate_right(parent, child).is_ok());
    /// assert_eq!(set.root().map(|node| *node.key()), Some(1));
    /// ```
    pub fn rotate_right(&mut self, parent: Entry, child: Entry) -> Result<()> {
        tree::rotate(&mut self.tree, parent, child, Direction::Right)
    }

    /// Finds the node holding `key` and rotates it with its right child for `Direction::Left` or
    /// its left child for `Direction::Right`.
    ///
    /// Returns `Error::NotFound` if the key does not exist or the node has no such child, and
    /// `Error::RotationFailed` if the rotation did not change the parent/child relationship. The
    /// set is unchanged in the first case.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rst::{Direction, RstSet};
    /// use search_trees::Error;
    ///
    /// let mut set = RstSet::new();
    /// set.raw_insert(1);
    /// set.raw_insert(2);
    ///
    /// assert_eq!(set.find_and_rotate(&2, Direction::Left), Err(Error::NotFound));
    /// assert_eq!(set.find_and_rotate(&3, Direction::Left), Err(Error::NotFound));
    /// assert_eq!(set.find_and_rotate(&1, Direction::Left), Ok(()));
    /// assert_eq!(set.root().map(|node| *node.key()), Some(2));
    /// ```
    pub fn find_and_rotate<V>(&mut self, key: &V, direction: Direction) -> Result<()>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::find_and_rotate(&mut self.tree, key, direction)
    }

    /// Returns a cursor at the node holding a particular key, or the end cursor if no such key
    /// exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rst::RstSet;
    ///
    /// let mut set = RstSet::new();
    /// set.insert(1);
    /// assert_eq!(set.find(&1).get(), Some(&1));
    /// assert!(set.find(&2).is_end());
    /// ```
    pub fn find<V>(&self, key: &V) -> Cursor<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        Cursor::new(&self.tree, bst_tree::find(&self.tree, key))
    }

    /// Checks if a key exists in the set.
    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        bst_tree::find(&self.tree, key).is_some()
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.tree.len
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.root.is_none()
    }

    /// Clears the set, removing all keys. The priority source is kept.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns a cursor at the minimum key, or the end cursor if the set is empty.
    pub fn begin(&self) -> Cursor<T> {
        Cursor::new(&self.tree, bst_tree::leftmost(&self.tree, self.tree.root))
    }

    /// Returns the cursor one past the maximum key.
    pub fn end(&self) -> Cursor<T> {
        Cursor::new(&self.tree, None)
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    pub fn min(&self) -> Option<&T> {
        bst_tree::leftmost(&self.tree, self.tree.root).map(|id| &self.tree.arena[id].key)
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    pub fn max(&self) -> Option<&T> {
        bst_tree::rightmost(&self.tree, self.tree.root).map(|id| &self.tree.arena[id].key)
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        bst_tree::height(&self.tree)
    }

    /// Returns a view of the root node, or `None` if the set is empty.
    pub fn root(&self) -> Option<NodeRef<T>> {
        self.tree.root.map(|id| NodeRef::new(&self.tree, id))
    }

    /// Returns a view of the node with a particular handle, or `None` if the handle does not
    /// belong to this set.
    pub fn node(&self, id: Entry) -> Option<NodeRef<T>> {
        self.tree.node_ref(id)
    }

    /// Returns an iterator over the set. The iterator advances a cursor from `begin` to `end`.
    pub fn iter(&self) -> Iter<T> {
        Iter::new(&self.tree)
    }

    /// Returns an in-order traversal of the nodes of the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rst::RstSet;
    ///
    /// let mut set = RstSet::new();
    /// set.insert(2);
    /// set.insert(1);
    ///
    /// let keys: Vec<&u32> = set.inorder().map(|node| node.key()).collect();
    /// assert_eq!(keys, vec![&1, &2]);
    /// ```
    pub fn inorder(&self) -> InorderIter<T> {
        self.tree.inorder()
    }

    /// Returns `true` if the keys are in search tree order, every child points back at its parent
    /// and the element count matches the number of reachable nodes.
    pub fn is_valid(&self) -> bool
    where
        T: Ord,
    {
        bst_tree::is_ordered(&self.tree) && bst_tree::is_consistent(&self.tree)
    }

    /// Returns `true` if no node has a higher priority than its parent.
    pub fn is_heap_ordered(&self) -> bool {
        tree::is_heap_ordered(&self.tree)
    }
}

impl<'a, T, R> IntoIterator for &'a RstSet<T, R>
where
    T: 'a + Ord,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Default for RstSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> Extend<T> for RstSet<T, R>
where
    T: Ord,
    R: Rng,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T> FromIterator<T> for RstSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = RstSet::new();
        set.extend(iter);
        set
    }
}

impl<T, R> PartialEq for RstSet<T, R>
where
    T: Ord,
{
    fn eq(&self, other: &RstSet<T, R>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, R> Eq for RstSet<T, R> where T: Ord {}

impl<T, R> fmt::Debug for RstSet<T, R>
where
    T: Ord + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// Serialized as (key, priority) pairs in pre-order; reinserting them positionally rebuilds the
// same shape and heap order. Input that would break heap order or repeat a key is rejected.
impl<T, R> Serialize for RstSet<T, R>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for node in self.tree.preorder() {
            seq.serialize_element(&(node.key(), node.priority()))?;
        }
        seq.end()
    }
}

struct RstSetVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T> Visitor<'de> for RstSetVisitor<T>
where
    T: Deserialize<'de> + Ord,
{
    type Value = RstSet<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of (key, priority) pairs in pre-order")
    }

    fn visit_seq<A>(self, mut seq: A) -> result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut set = RstSet::new();
        while let Some((key, priority)) = seq.next_element::<(T, u32)>()? {
            let id = match bst_tree::insert(&mut set.tree, key, || priority) {
                Some(id) => id,
                None => return Err(de::Error::custom("duplicate key in set")),
            };
            if let Some(parent) = set.tree.arena[id].parent {
                if set.tree.arena[parent].priority < priority {
                    return Err(de::Error::custom("priority exceeds the priority of its parent"));
                }
            }
        }
        Ok(set)
    }
}

impl<'de, T> Deserialize<'de> for RstSet<T>
where
    T: Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(RstSetVisitor {
            marker: PhantomData,
        })
    }
}
