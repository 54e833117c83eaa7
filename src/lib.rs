//! An ordered container backed by a red-black tree.
//!
//! Nodes live in a slab arena and refer to each other through [`NodeId`]
//! handles, so the parent back-reference is a plain index that never
//! controls a node's lifetime. Search, insertion and removal are
//! `O(log n)` in the worst case.
//!
//! ```
//! use ordered_rbtree::OrderedTree;
//!
//! let mut tree = OrderedTree::new();
//! tree.insert(10);
//! tree.insert(20);
//! tree.insert(30);
//!
//! assert!(tree.contains(&20));
//! assert!(tree.remove(&20));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [10, 30]);
//! ```
mod alloc;
mod iter;
mod node;
mod render;
mod root;
mod tree;
mod validate;

use alloc::Arena;

pub use iter::{IntoIter, Iter};
pub use render::DEFAULT_INDENT;
pub use validate::Violation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Handle to a node slot inside a tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(generational_arena::Index);

pub(crate) type Link = Option<NodeId>;

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub(crate) parent: Link,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) color: Color,
    pub(crate) value: T,
}

/// What [`OrderedTree::insert`] does with a value equal to one already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Duplicates {
    /// Store it; equal values are routed to the right subtree.
    #[default]
    Allow,
    /// Leave the tree untouched and report the insertion as refused.
    Reject,
}

/// A red-black tree holding totally-ordered values.
///
/// Size and height are not cached: [`OrderedTree::size`] and
/// [`OrderedTree::height`] walk the whole tree.
pub struct OrderedTree<T> {
    root: Link,
    nodes: Arena<T>,
    duplicates: Duplicates,
}
