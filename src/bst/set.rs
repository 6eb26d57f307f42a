use crate::arena::Entry;
use crate::bst::cursor::{Cursor, Iter};
use crate::bst::node::NodeRef;
use crate::bst::tree::{self, InorderIter, Tree};
use log::{debug, trace};
use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::result;

/// An ordered set implemented using an unbalanced binary search tree.
///
/// Every node keeps a back-reference to its parent, which lets cursors step to the in-order
/// successor of a node without restarting from the root. Keys are unique; inserting a key that is
/// already present leaves the set untouched. Nothing rebalances the tree, so inserting keys in
/// sorted order produces a chain.
///
/// # Examples
///
/// ```
/// use search_trees::bst::BstSet;
///
/// let mut set = BstSet::new();
/// assert!(set.insert(5));
/// assert!(set.insert(3));
/// assert!(!set.insert(5));
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.find(&3).get(), Some(&3));
/// assert!(set.find(&4) == set.end());
/// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&3, &5]);
/// ```
pub struct BstSet<T> {
    tree: Tree<T>,
}

impl<T> BstSet<T> {
    /// Constructs a new, empty `BstSet<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::BstSet;
    ///
    /// let set: BstSet<u32> = BstSet::new();
    /// ```
    pub fn new() -> Self {
        BstSet { tree: Tree::new() }
    }

    /// Inserts a key into the set. Returns `false` and leaves the set unchanged if the key already
    /// exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::BstSet;
    ///
    /// let mut set = BstSet::new();
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert!(set.contains(&1));
    /// ```
    pub fn insert(&mut self, key: T) -> bool
    where
        T: Ord,
    {
        match tree::insert(&mut self.tree, key, || 0) {
            Some(id) => {
                trace!("inserted node {:?}, len = {}", id, self.tree.len);
                true
            },
            None => {
                debug!("rejected duplicate key");
                false
            },
        }
    }

    /// Returns a cursor at the node holding a particular key, or the end cursor if no such key
    /// exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::BstSet;
    ///
    /// let mut set = BstSet::new();
    /// set.insert(1);
    /// assert_eq!(set.find(&1).get(), Some(&1));
    /// assert!(set.find(&2).is_end());
    /// ```
    pub fn find<V>(&self, key: &V) -> Cursor<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        Cursor::new(&self.tree, tree::find(&self.tree, key))
    }

    /// Checks if a key exists in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::BstSet;
    ///
    /// let mut set = BstSet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::find(&self.tree, key).is_some()
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::BstSet;
    ///
    /// let mut set = BstSet::new();
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len
    }

    /// Returns `true` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::BstSet;
    ///
    /// let set: BstSet<u32> = BstSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.tree.root.is_none()
    }

    /// Clears the set, removing all keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::BstSet;
    ///
    /// let mut set = BstSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert_eq!(set.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns a cursor at the minimum key, or the end cursor if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::BstSet;
    ///
    /// let mut set = BstSet::new();
    /// assert!(set.begin() == set.end());
    /// set.insert(2);
    /// set.insert(1);
    /// assert_eq!(set.begin().get(), Some(&1));
    /// ```
    pub fn begin(&self) -> Cursor<T> {
        Cursor::new(&self.tree, tree::leftmost(&self.tree, self.tree.root))
    }

    /// Returns the cursor one past the maximum key.
    pub fn end(&self) -> Cursor<T> {
        Cursor::new(&self.tree, None)
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::BstSet;
    ///
    /// let mut set = BstSet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        tree::leftmost(&self.tree, self.tree.root).map(|id| &self.tree.arena[id].key)
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::BstSet;
    ///
    /// let mut set = BstSet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        tree::rightmost(&self.tree, self.tree.root).map(|id| &self.tree.arena[id].key)
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::BstSet;
    ///
    /// let mut set = BstSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.insert(3);
    /// assert_eq!(set.height(), 3);
    /// ```
    pub fn height(&self) -> usize {
        tree::height(&self.tree)
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
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::BstSet;
    ///
    /// let mut set = BstSet::new();
    /// set.insert(1);
    /// set.insert(2);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&2));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<T> {
        Iter::new(&self.tree)
    }

    /// Returns an in-order traversal of the nodes of the set. The traversal uses an explicit stack
    /// rather than parent links and can be restarted by calling `inorder` again.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::BstSet;
    ///
    /// let mut set = BstSet::new();
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
        tree::is_ordered(&self.tree) && tree::is_consistent(&self.tree)
    }
}

impl<'a, T> IntoIterator for &'a BstSet<T>
where
    T: 'a + Ord,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Default for BstSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for BstSet<T>
where
    T: Ord,
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

impl<T> FromIterator<T> for BstSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = BstSet::new();
        set.extend(iter);
        set
    }
}

impl<T> PartialEq for BstSet<T>
where
    T: Ord,
{
    fn eq(&self, other: &BstSet<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T> Eq for BstSet<T> where T: Ord {}

impl<T> fmt::Debug for BstSet<T>
where
    T: Ord + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// Serialized in pre-order so that reinserting the keys rebuilds the same shape.
impl<T> Serialize for BstSet<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for node in self.tree.preorder() {
            seq.serialize_element(node.key())?;
        }
        seq.end()
    }
}

struct BstSetVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T> Visitor<'de> for BstSetVisitor<T>
where
    T: Deserialize<'de> + Ord,
{
    type Value = BstSet<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of keys in pre-order")
    }

    fn visit_seq<A>(self, mut seq: A) -> result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut set = BstSet::new();
        while let Some(key) = seq.next_element()? {
            if !set.insert(key) {
                return Err(de::Error::custom("duplicate key in set"));
            }
        }
        Ok(set)
    }
}

impl<'de, T> Deserialize<'de> for BstSet<T>
where
    T: Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(BstSetVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::BstSet;
    use serde::de::{Deserialize, Deserializer};
    use serde_test::{assert_de_tokens, assert_de_tokens_error, assert_tokens, Token};
    use std::result;

    fn shape(set: &BstSet<u32>) -> Vec<(u32, Option<u32>)> {
        set.tree
            .preorder()
            .map(|node| (*node.key(), node.parent_node().map(|parent| *parent.key())))
            .collect()
    }

    #[derive(Debug, PartialEq)]
    struct Shape(Vec<(u32, Option<u32>)>);

    impl<'de> Deserialize<'de> for Shape {
        fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let set = BstSet::<u32>::deserialize(deserializer)?;
            assert!(set.is_valid());
            Ok(Shape(shape(&set)))
        }
    }

    fn key_tokens(keys: &[u32]) -> Vec<Token> {
        let mut tokens = vec![Token::Seq {
            len: Some(keys.len()),
        }];
        tokens.extend(keys.iter().map(|key| Token::U32(*key)));
        tokens.push(Token::SeqEnd);
        tokens
    }

    #[test]
    fn test_len_empty() {
        let set: BstSet<u32> = BstSet::new();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
        assert!(set.begin() == set.end());
        assert!(set.find(&1) == set.end());
    }

    #[test]
    fn test_min_max_empty() {
        let set: BstSet<u32> = BstSet::new();
        assert_eq!(set.min(), None);
        assert_eq!(set.max(), None);
        assert_eq!(set.height(), 0);
    }

    #[test]
    fn test_insert_find() {
        let mut set = BstSet::new();
        for key in &[5, 3, 8, 1, 4] {
            assert!(set.insert(*key));
        }

        assert_eq!(set.find(&8).get(), Some(&8));
        assert!(set.find(&9) == set.end());
        assert_eq!(set.iter().cloned().collect::<Vec<u32>>(), vec![1, 3, 4, 5, 8]);
        assert_eq!(set.len(), 5);
        assert!(set.is_valid());
    }

    #[test]
    fn test_insert_duplicate() {
        let mut set = BstSet::new();
        set.insert(5);
        set.insert(3);
        set.insert(8);
        let ids: Vec<_> = set.inorder().map(|node| node.id()).collect();

        assert!(!set.insert(3));
        assert_eq!(set.len(), 3);
        assert_eq!(set.inorder().map(|node| node.id()).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn test_min_max() {
        let set: BstSet<u32> = vec![4, 1, 9, 7].into_iter().collect();
        assert_eq!(set.min(), Some(&1));
        assert_eq!(set.max(), Some(&9));
    }

    #[test]
    fn test_root_links() {
        let set: BstSet<u32> = vec![5, 3, 8].into_iter().collect();
        let root = set.root().unwrap();
        assert_eq!(root.key(), &5);
        assert_eq!(root.priority(), 0);
        assert_eq!(root.right_node().map(|node| *node.key()), Some(8));
        let left = set.node(root.left().unwrap()).unwrap();
        assert_eq!(left.parent_node(), Some(root));
    }

    #[test]
    fn test_find_then_advance() {
        let set: BstSet<u32> = vec![5, 3, 8, 1, 4].into_iter().collect();
        let mut cursor = set.find(&4);
        cursor.move_next();
        assert_eq!(cursor.get(), Some(&5));
        cursor.move_next();
        assert_eq!(cursor.get(), Some(&8));
        cursor.move_next();
        assert!(cursor == set.end());
    }

    #[test]
    fn test_clear() {
        let mut set: BstSet<u32> = vec![5, 3, 8].into_iter().collect();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(set.insert(3));
        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&3]);
    }

    #[test]
    fn test_sorted_insert_is_chain() {
        let set: BstSet<u32> = (0..100).collect();
        assert_eq!(set.height(), 100);
        assert!(set.is_valid());
    }

    #[test]
    fn test_debug() {
        let set: BstSet<u32> = vec![2, 1].into_iter().collect();
        assert_eq!(format!("{:?}", set), "{1, 2}");
    }

    #[test]
    fn test_ser_de() {
        let set: BstSet<u32> = vec![5, 3, 8].into_iter().collect();
        assert_tokens(
            &set,
            &[
                Token::Seq { len: Some(3) },
                Token::U32(5),
                Token::U32(3),
                Token::U32(8),
                Token::SeqEnd,
            ],
        );
    }

    #[test]
    fn test_de_preserves_shape() {
        let set: BstSet<u32> = vec![5, 3, 8, 1, 4, 7].into_iter().collect();
        let keys: Vec<u32> = set.tree.preorder().map(|node| *node.key()).collect();
        assert_eq!(keys, vec![5, 3, 1, 4, 8, 7]);
        assert_de_tokens(&Shape(shape(&set)), &key_tokens(&keys));
    }

    #[test]
    fn test_de_rejects_duplicate() {
        assert_de_tokens_error::<Shape>(&key_tokens(&[5, 3, 5]), "duplicate key in set");
    }
}
