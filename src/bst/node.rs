use crate::arena::Entry;
use crate::bst::tree::Tree;
use std::fmt;

/// A struct representing an internal node of a search tree.
///
/// Child links are the only owning relation between nodes; `parent` is a back-reference used for
/// upward walks and rotations.
pub struct Node<T> {
    pub key: T,
    pub priority: u32,
    pub left: Option<Entry>,
    pub right: Option<Entry>,
    pub parent: Option<Entry>,
}

impl<T> Node<T> {
    pub fn new(key: T, priority: u32) -> Self {
        Node {
            key,
            priority,
            left: None,
            right: None,
            parent: None,
        }
    }
}

/// A read-only view of a single node and its links.
///
/// `NodeRef` exposes the raw fields of a node so that callers can render or inspect the shape of
/// a tree. Links are returned as `Entry` handles that can be resolved through the same view or fed
/// back into the rotation primitives of a `RstSet`.
///
/// # Examples
///
/// ```
/// use search_trees::bst::BstSet;
///
/// let mut set = BstSet::new();
/// set.insert(5);
/// set.insert(3);
///
/// let root = set.root().unwrap();
/// assert_eq!(root.key(), &5);
/// assert_eq!(root.parent(), None);
///
/// let left = root.left_node().unwrap();
/// assert_eq!(left.key(), &3);
/// assert_eq!(left.parent(), Some(root.id()));
/// ```
pub struct NodeRef<'a, T>
where
    T: 'a,
{
    tree: &'a Tree<T>,
    id: Entry,
}

impl<'a, T> NodeRef<'a, T>
where
    T: 'a,
{
    pub(crate) fn new(tree: &'a Tree<T>, id: Entry) -> Self {
        NodeRef { tree, id }
    }

    fn node(&self) -> &'a Node<T> {
        &self.tree.arena[self.id]
    }

    /// Returns the handle identifying this node.
    pub fn id(&self) -> Entry {
        self.id
    }

    /// Returns the key stored in this node.
    pub fn key(&self) -> &'a T {
        &self.node().key
    }

    /// Returns the priority of this node. Nodes inserted without a priority report zero.
    pub fn priority(&self) -> u32 {
        self.node().priority
    }

    pub fn parent(&self) -> Option<Entry> {
        self.node().parent
    }

    pub fn left(&self) -> Option<Entry> {
        self.node().left
    }

    pub fn right(&self) -> Option<Entry> {
        self.node().right
    }

    pub fn parent_node(&self) -> Option<NodeRef<'a, T>> {
        self.parent().map(|id| NodeRef::new(self.tree, id))
    }

    pub fn left_node(&self) -> Option<NodeRef<'a, T>> {
        self.left().map(|id| NodeRef::new(self.tree, id))
    }

    pub fn right_node(&self) -> Option<NodeRef<'a, T>> {
        self.right().map(|id| NodeRef::new(self.tree, id))
    }
}

impl<'a, T> Clone for NodeRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for NodeRef<'a, T> {}

impl<'a, T> PartialEq for NodeRef<'a, T> {
    fn eq(&self, other: &NodeRef<'a, T>) -> bool {
        ::std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<'a, T> Eq for NodeRef<'a, T> {}

impl<'a, T> fmt::Debug for NodeRef<'a, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("parent", &self.parent())
            .field("left", &self.left())
            .field("right", &self.right())
            .field("key", self.key())
            .field("priority", &self.priority())
            .finish()
    }
}
