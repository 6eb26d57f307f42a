//! Ordered sets backed by binary search trees whose nodes keep a back-reference to their parent.
//!
//! `BstSet` is a plain, unbalanced binary search tree. `RstSet` shares its node layout and search
//! routines, and additionally assigns every new node a random priority and rotates it upwards to
//! keep the tree heap-ordered over priorities, giving an expected logarithmic height.

pub mod arena;
pub mod bst;
mod error;
pub mod rst;

pub use crate::error::{Error, Result};
