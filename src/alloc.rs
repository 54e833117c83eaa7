use std::{
    mem,
    ops::{Index, IndexMut},
};

use crate::{Node, NodeId};

/// Generation-checked storage for a tree's nodes.
///
/// Freed slots are recycled by later allocations, but each reuse bumps the
/// slot's generation, so a handle to a released node never reaches the node
/// that replaced it.
pub(crate) struct Arena<T> {
    nodes: generational_arena::Arena<Node<T>>,
}

impl NodeId {
    /// Raw slot position, for diagnostics only.
    pub(crate) fn slot(self) -> usize {
        self.0.into_raw_parts().0
    }
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Arena {
            nodes: generational_arena::Arena::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Arena {
            nodes: generational_arena::Arena::with_capacity(capacity),
        }
    }

    /// Moves `node` into the arena. The node is fully built before the
    /// caller links it anywhere.
    pub(crate) fn alloc(&mut self, node: Node<T>) -> NodeId {
        NodeId(self.nodes.insert(node))
    }

    /// Releases the slot behind `id` and hands the node back.
    ///
    /// # Panics
    ///
    /// Panics if `id` was already released.
    pub(crate) fn dealloc(&mut self, id: NodeId) -> Node<T> {
        match self.nodes.remove(id.0) {
            Some(node) => node,
            None => panic!("double free of node slot {}", id.slot()),
        }
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.0)
    }

    /// Exchanges the values held by two live nodes, leaving links and
    /// colors where they are.
    pub(crate) fn swap_values(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        match self.nodes.get2_mut(a.0, b.0) {
            (Some(x), Some(y)) => mem::swap(&mut x.value, &mut y.value),
            _ => panic!(
                "value swap between {} and {} touches a free slot",
                a.slot(),
                b.slot()
            ),
        }
    }

    /// Drops every node at once.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of slots allocated so far, live or free.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Node<T> {
        match self.nodes.get(id.0) {
            Some(node) => node,
            None => panic!("dangling node handle {}", id.slot()),
        }
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.nodes.get_mut(id.0) {
            Some(node) => node,
            None => panic!("dangling node handle {}", id.slot()),
        }
    }
}
