use crate::arena::Entry;
use crate::bst::node::NodeRef;
use crate::bst::tree::{self, Tree};
use std::fmt;
use std::ptr;

/// A position in a search tree: either a node or the end of the tree.
///
/// A cursor advances to the in-order successor of its node using parent links, without
/// re-traversing the tree from the root. The end position compares equal to every other end
/// position of the same tree, including one reached by advancing past the maximum key. Cursors
/// borrow the tree, so the tree cannot be modified while a cursor is alive.
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
/// let mut cursor = set.begin();
/// assert_eq!(cursor.get(), Some(&1));
/// cursor.move_next();
/// assert_eq!(cursor.get(), Some(&2));
/// cursor.move_next();
/// assert!(cursor == set.end());
/// ```
pub struct Cursor<'a, T>
where
    T: 'a,
{
    tree: &'a Tree<T>,
    current: Option<Entry>,
}

impl<'a, T> Cursor<'a, T>
where
    T: 'a,
{
    pub(crate) fn new(tree: &'a Tree<T>, current: Option<Entry>) -> Self {
        Cursor { tree, current }
    }

    /// Returns `true` if the cursor is past the last key.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Returns a reference to the key at the cursor, or `None` at the end.
    pub fn get(&self) -> Option<&'a T> {
        self.node().map(|node| node.key())
    }

    /// Returns a copy of the key at the cursor, or `None` at the end.
    pub fn key(&self) -> Option<T>
    where
        T: Clone,
    {
        self.get().cloned()
    }

    /// Returns a view of the node at the cursor, or `None` at the end.
    pub fn node(&self) -> Option<NodeRef<'a, T>> {
        self.current.map(|id| NodeRef::new(self.tree, id))
    }

    /// Moves the cursor to the next key in ascending order. Advancing the end cursor is a no-op.
    pub fn move_next(&mut self)
    where
        T: Ord,
    {
        if let Some(id) = self.current {
            self.current = tree::successor(self.tree, id);
        }
    }
}

impl<'a, T> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Cursor<'a, T> {}

impl<'a, T> PartialEq for Cursor<'a, T> {
    fn eq(&self, other: &Cursor<'a, T>) -> bool {
        ptr::eq(self.tree, other.tree) && self.current == other.current
    }
}

impl<'a, T> Eq for Cursor<'a, T> {}

impl<'a, T> fmt::Debug for Cursor<'a, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.get() {
            Some(key) => f.debug_tuple("Cursor").field(key).finish(),
            None => f.write_str("Cursor(end)"),
        }
    }
}

/// An iterator over the keys of a search tree in ascending order.
///
/// This iterator walks from the `begin` cursor to the `end` cursor using successor links.
pub struct Iter<'a, T>
where
    T: 'a,
{
    cursor: Cursor<'a, T>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T>
where
    T: 'a,
{
    pub(crate) fn new(tree: &'a Tree<T>) -> Self {
        Iter {
            cursor: Cursor::new(tree, tree::leftmost(tree, tree.root)),
            remaining: tree.len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T>
where
    T: 'a + Ord,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let ret = self.cursor.get();
        if ret.is_some() {
            self.cursor.move_next();
            self.remaining -= 1;
        }
        ret
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> where T: 'a + Ord {}
