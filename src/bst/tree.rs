use crate::arena::{Entry, TypedArena};
use crate::bst::node::{Node, NodeRef};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::vec::Vec;

const CHUNK_SIZE: usize = 256;

/// The node storage and root slot shared by every tree in this crate.
///
/// Every node lives in `arena` and is reachable from `root` through exactly one child link.
/// Dropping the tree drops the arena, which releases all nodes without following links.
pub struct Tree<T> {
    pub arena: TypedArena<Node<T>>,
    pub root: Option<Entry>,
    pub len: usize,
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Tree {
            arena: TypedArena::new(CHUNK_SIZE),
            root: None,
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    pub fn node_ref(&self, id: Entry) -> Option<NodeRef<T>> {
        self.arena.get(&id).map(|_| NodeRef::new(self, id))
    }

    pub fn inorder(&self) -> InorderIter<T> {
        InorderIter {
            tree: self,
            current: self.root,
            stack: Vec::new(),
        }
    }

    pub fn preorder(&self) -> PreorderIter<T> {
        PreorderIter {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Attaches `new_node` below the unique empty slot matching its key. `priority` is only evaluated
// once a node is actually created, so rejected duplicates consume nothing.
pub fn insert<T, F>(tree: &mut Tree<T>, key: T, priority: F) -> Option<Entry>
where
    T: Ord,
    F: FnOnce() -> u32,
{
    let mut parent = None;
    let mut went_left = false;
    let mut current = tree.root;
    while let Some(id) = current {
        let node = &tree.arena[id];
        match key.cmp(&node.key) {
            Ordering::Less => {
                went_left = true;
                current = node.left;
            },
            Ordering::Greater => {
                went_left = false;
                current = node.right;
            },
            Ordering::Equal => return None,
        }
        parent = Some(id);
    }

    let mut new_node = Node::new(key, priority());
    new_node.parent = parent;
    let new_id = tree.arena.allocate(new_node);
    match parent {
        Some(parent_id) => {
            if went_left {
                tree.arena[parent_id].left = Some(new_id);
            } else {
                tree.arena[parent_id].right = Some(new_id);
            }
        },
        None => tree.root = Some(new_id),
    }
    tree.len += 1;
    Some(new_id)
}

pub fn find<T, V>(tree: &Tree<T>, key: &V) -> Option<Entry>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let mut current = tree.root;
    while let Some(id) = current {
        let node = &tree.arena[id];
        current = match key.cmp(node.key.borrow()) {
            Ordering::Less => node.left,
            Ordering::Greater => node.right,
            Ordering::Equal => return Some(id),
        };
    }
    None
}

pub fn leftmost<T>(tree: &Tree<T>, start: Option<Entry>) -> Option<Entry> {
    let mut current = start?;
    while let Some(left) = tree.arena[current].left {
        current = left;
    }
    Some(current)
}

pub fn rightmost<T>(tree: &Tree<T>, start: Option<Entry>) -> Option<Entry> {
    let mut current = start?;
    while let Some(right) = tree.arena[current].right {
        current = right;
    }
    Some(current)
}

// Every step moves to a strictly shallower node and the root has no parent, so the upward walk
// ends after at most `height` steps.
pub fn successor<T>(tree: &Tree<T>, id: Entry) -> Option<Entry>
where
    T: Ord,
{
    let node = &tree.arena[id];
    if node.right.is_some() {
        return leftmost(tree, node.right);
    }

    let mut ancestor = node.parent;
    while let Some(ancestor_id) = ancestor {
        let ancestor_node = &tree.arena[ancestor_id];
        if node.key < ancestor_node.key {
            return Some(ancestor_id);
        }
        ancestor = ancestor_node.parent;
    }
    None
}

pub fn height<T>(tree: &Tree<T>) -> usize {
    let mut ret = 0;
    let mut stack: Vec<(Entry, usize)> = tree.root.into_iter().map(|id| (id, 1)).collect();
    while let Some((id, depth)) = stack.pop() {
        ret = ret.max(depth);
        let node = &tree.arena[id];
        stack.extend(node.left.into_iter().chain(node.right).map(|child| (child, depth + 1)));
    }
    ret
}

// Points whatever slot held `old` (a child link of `parent`, or the root) at `new`.
fn replace_child<T>(tree: &mut Tree<T>, parent: Option<Entry>, old: Entry, new: Entry) {
    match parent {
        Some(parent_id) => {
            let parent_node = &mut tree.arena[parent_id];
            if parent_node.left == Some(old) {
                parent_node.left = Some(new);
            } else {
                parent_node.right = Some(new);
            }
        },
        None => tree.root = Some(new),
    }
    tree.arena[new].parent = parent;
}

// precondition: `child` is the right child of `parent`
pub fn rotate_left<T>(tree: &mut Tree<T>, parent: Entry, child: Entry) {
    debug_assert_eq!(tree.arena[parent].right, Some(child));
    let grandparent = tree.arena[parent].parent;
    let inner = tree.arena[child].left;

    replace_child(tree, grandparent, parent, child);
    tree.arena[child].left = Some(parent);
    tree.arena[parent].parent = Some(child);
    tree.arena[parent].right = inner;
    if let Some(inner_id) = inner {
        tree.arena[inner_id].parent = Some(parent);
    }
}

// precondition: `child` is the left child of `parent`
pub fn rotate_right<T>(tree: &mut Tree<T>, parent: Entry, child: Entry) {
    debug_assert_eq!(tree.arena[parent].left, Some(child));
    let grandparent = tree.arena[parent].parent;
    let inner = tree.arena[child].right;

    replace_child(tree, grandparent, parent, child);
    tree.arena[child].right = Some(parent);
    tree.arena[parent].parent = Some(child);
    tree.arena[parent].left = inner;
    if let Some(inner_id) = inner {
        tree.arena[inner_id].parent = Some(parent);
    }
}

/// Returns `true` if every key is strictly between the bounds implied by its ancestors.
pub fn is_ordered<T>(tree: &Tree<T>) -> bool
where
    T: Ord,
{
    let mut stack: Vec<(Entry, Option<&T>, Option<&T>)> =
        tree.root.into_iter().map(|id| (id, None, None)).collect();
    while let Some((id, lower, upper)) = stack.pop() {
        let node = &tree.arena[id];
        if lower.map_or(false, |lower| node.key <= *lower)
            || upper.map_or(false, |upper| node.key >= *upper)
        {
            return false;
        }
        if let Some(left) = node.left {
            stack.push((left, lower, Some(&node.key)));
        }
        if let Some(right) = node.right {
            stack.push((right, Some(&node.key), upper));
        }
    }
    true
}

/// Returns `true` if every child points back at its parent, the root has no parent and the
/// number of reachable nodes equals `len`.
pub fn is_consistent<T>(tree: &Tree<T>) -> bool {
    if let Some(root) = tree.root {
        if tree.arena[root].parent.is_some() {
            return false;
        }
    }

    let mut count = 0;
    let mut stack: Vec<Entry> = tree.root.into_iter().collect();
    while let Some(id) = stack.pop() {
        count += 1;
        if count > tree.len {
            return false;
        }
        let node = &tree.arena[id];
        for child in node.left.into_iter().chain(node.right) {
            if tree.arena[child].parent != Some(id) {
                return false;
            }
            stack.push(child);
        }
    }
    count == tree.len
}

/// An iterator over the nodes of a tree in ascending key order.
///
/// The traversal keeps an explicit stack of pending ancestors, so it does not depend on parent
/// links and never recurses.
pub struct InorderIter<'a, T>
where
    T: 'a,
{
    tree: &'a Tree<T>,
    current: Option<Entry>,
    stack: Vec<Entry>,
}

impl<'a, T> Iterator for InorderIter<'a, T>
where
    T: 'a,
{
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.current {
            self.stack.push(id);
            self.current = self.tree.arena[id].left;
        }
        self.stack.pop().map(|id| {
            self.current = self.tree.arena[id].right;
            NodeRef::new(self.tree, id)
        })
    }
}

/// An iterator over the nodes of a tree in pre-order. Inserting keys in this order into an empty
/// tree rebuilds the same shape.
pub struct PreorderIter<'a, T>
where
    T: 'a,
{
    tree: &'a Tree<T>,
    stack: Vec<Entry>,
}

impl<'a, T> Iterator for PreorderIter<'a, T>
where
    T: 'a,
{
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.stack.pop().map(|id| {
            let node = &self.tree.arena[id];
            self.stack.extend(node.right);
            self.stack.extend(node.left);
            NodeRef::new(self.tree, id)
        })
    }
}
