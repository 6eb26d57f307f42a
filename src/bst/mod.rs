//! Unbalanced binary search tree with parent back-references and successor cursors.

mod cursor;
mod node;
mod set;
pub(crate) mod tree;

pub use self::cursor::{Cursor, Iter};
pub use self::node::NodeRef;
pub use self::set::BstSet;
pub use self::tree::InorderIter;
