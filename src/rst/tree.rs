use crate::arena::Entry;
use crate::bst::tree::{self, Tree};
use crate::error::{Error, Result};
use log::{debug, trace};
use rand::Rng;
use std::borrow::Borrow;

/// The side a node moves towards when it is rotated with one of its children.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    /// The right child takes the place of its parent.
    Left,
    /// The left child takes the place of its parent.
    Right,
}

// Positional insert followed by a fresh priority and rotations towards the root until the parent
// has a priority at least as high.
pub fn insert<T, R>(tree: &mut Tree<T>, key: T, rng: &mut R) -> bool
where
    T: Ord,
    R: Rng,
{
    let id = match tree::insert(tree, key, || rng.next_u32()) {
        Some(id) => id,
        None => return false,
    };

    let mut rotations = 0;
    while let Some(parent) = tree.arena[id].parent {
        if tree.arena[id].priority <= tree.arena[parent].priority {
            break;
        }
        if tree.arena[parent].left == Some(id) {
            tree::rotate_right(tree, parent, id);
        } else {
            tree::rotate_left(tree, parent, id);
        }
        rotations += 1;
    }
    trace!(
        "inserted node {:?} with priority {} after {} rotation(s)",
        id,
        tree.arena[id].priority,
        rotations,
    );
    true
}

/// Rotates `child` into the position of `parent`. `child` must be the right child of `parent` for
/// `Direction::Left` and the left child for `Direction::Right`; otherwise nothing changes and
/// `Error::NotFound` is returned.
pub fn rotate<T>(
    tree: &mut Tree<T>,
    parent: Entry,
    child: Entry,
    direction: Direction,
) -> Result<()> {
    let expected = match tree.arena.get(&parent) {
        Some(node) => match direction {
            Direction::Left => node.right,
            Direction::Right => node.left,
        },
        None => return Err(Error::NotFound),
    };
    if expected != Some(child) {
        debug!("{:?} and {:?} are not a {:?} rotation pair", parent, child, direction);
        return Err(Error::NotFound);
    }

    let moved = match direction {
        Direction::Left => {
            tree::rotate_left(tree, parent, child);
            tree.arena[parent].right
        },
        Direction::Right => {
            tree::rotate_right(tree, parent, child);
            tree.arena[parent].left
        },
    };

    if moved == Some(child) || tree.arena[parent].parent != Some(child) {
        debug!("rotation of {:?} and {:?} left the pair unchanged", parent, child);
        return Err(Error::RotationFailed);
    }
    trace!("rotated {:?} {:?} around {:?}", child, direction, parent);
    Ok(())
}

pub fn find_and_rotate<T, V>(tree: &mut Tree<T>, key: &V, direction: Direction) -> Result<()>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let parent = tree::find(tree, key).ok_or(Error::NotFound)?;
    let child = match direction {
        Direction::Left => tree.arena[parent].right,
        Direction::Right => tree.arena[parent].left,
    };
    rotate(tree, parent, child.ok_or(Error::NotFound)?, direction)
}

/// Returns `true` if no node has a higher priority than its parent.
pub fn is_heap_ordered<T>(tree: &Tree<T>) -> bool {
    tree.inorder().all(|node| match node.parent() {
        Some(parent) => tree.arena[parent].priority >= node.priority(),
        None => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rst::Script;

    fn shape(tree: &Tree<u32>) -> Vec<(u32, Option<u32>)> {
        tree.inorder()
            .map(|node| (*node.key(), node.parent().map(|id| tree.arena[id].key)))
            .collect()
    }

    #[test]
    fn test_insert_rotates_to_root() {
        let mut tree = Tree::new();
        let mut rng = Script::new(vec![10, 20, 30]);
        assert!(insert(&mut tree, 1, &mut rng));
        assert!(insert(&mut tree, 2, &mut rng));
        assert!(insert(&mut tree, 3, &mut rng));

        assert_eq!(tree.arena[tree.root.unwrap()].key, 3);
        assert_eq!(shape(&tree), vec![(1, Some(2)), (2, Some(3)), (3, None)]);
        assert!(is_heap_ordered(&tree));
        assert!(tree::is_consistent(&tree));
    }

    #[test]
    fn test_insert_stops_below_higher_priority() {
        let mut tree = Tree::new();
        let mut rng = Script::new(vec![100, 10, 50]);
        insert(&mut tree, 5, &mut rng);
        insert(&mut tree, 3, &mut rng);
        insert(&mut tree, 4, &mut rng);

        // 4 outranks 3 but not 5
        assert_eq!(shape(&tree), vec![(3, Some(4)), (4, Some(5)), (5, None)]);
        assert!(is_heap_ordered(&tree));
    }

    #[test]
    fn test_insert_equal_priority_does_not_rotate() {
        let mut tree = Tree::new();
        let mut rng = Script::new(vec![7, 7]);
        insert(&mut tree, 1, &mut rng);
        insert(&mut tree, 2, &mut rng);
        assert_eq!(shape(&tree), vec![(1, None), (2, Some(1))]);
    }

    #[test]
    fn test_insert_duplicate_draws_nothing() {
        let mut tree = Tree::new();
        let mut rng = Script::new(vec![5, 9]);
        assert!(insert(&mut tree, 1, &mut rng));
        assert!(!insert(&mut tree, 1, &mut rng));
        assert!(insert(&mut tree, 2, &mut rng));
        let id = tree::find(&tree, &2).unwrap();
        assert_eq!(tree.arena[id].priority, 9);
    }

    #[test]
    fn test_rotate_not_adjacent() {
        let mut tree = Tree::new();
        for key in &[5, 3, 8] {
            tree::insert(&mut tree, *key, || 0);
        }
        let root = tree.root.unwrap();
        let left = tree.arena[root].left.unwrap();
        let right = tree.arena[root].right.unwrap();

        assert_eq!(rotate(&mut tree, root, left, Direction::Left), Err(Error::NotFound));
        assert_eq!(rotate(&mut tree, left, right, Direction::Right), Err(Error::NotFound));
        assert_eq!(shape(&tree), vec![(3, Some(5)), (5, None), (8, Some(5))]);

        assert_eq!(rotate(&mut tree, root, right, Direction::Left), Ok(()));
        assert_eq!(shape(&tree), vec![(3, Some(5)), (5, Some(8)), (8, None)]);
    }

    #[test]
    fn test_find_and_rotate_missing_child() {
        let mut tree = Tree::new();
        for key in &[5, 3] {
            tree::insert(&mut tree, *key, || 0);
        }
        assert_eq!(find_and_rotate(&mut tree, &3, Direction::Left), Err(Error::NotFound));
        assert_eq!(find_and_rotate(&mut tree, &5, Direction::Left), Err(Error::NotFound));
        assert_eq!(find_and_rotate(&mut tree, &9, Direction::Right), Err(Error::NotFound));
        assert_eq!(find_and_rotate(&mut tree, &5, Direction::Right), Ok(()));
        assert_eq!(tree.arena[tree.root.unwrap()].key, 3);
    }

    #[test]
    fn test_heap_order_violation() {
        let mut tree = Tree::new();
        tree::insert(&mut tree, 2, || 1);
        tree::insert(&mut tree, 1, || 2);
        assert!(!is_heap_ordered(&tree));
    }

    #[test]
    fn test_rotate_reports_unchanged_pair() {
        let mut tree = Tree::new();
        for key in &[1, 2] {
            tree::insert(&mut tree, *key, || 0);
        }
        let parent = tree.root.unwrap();
        let child = tree.arena[parent].right.unwrap();

        // a self-referencing inner link makes the child land back in its old slot
        tree.arena[child].left = Some(child);
        assert_eq!(rotate(&mut tree, parent, child, Direction::Left), Err(Error::RotationFailed));
    }
}
