use crate::{Color, Link, Node, NodeId, OrderedTree};

impl<T> Node<T> {
    /// A detached red node. Insertion is the only place nodes are born.
    pub(crate) fn new(value: T) -> Self {
        Node {
            parent: None,
            left: None,
            right: None,
            color: Color::Red,
            value,
        }
    }

    #[inline(always)]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline(always)]
    pub(crate) fn is_black(&self) -> bool {
        self.color == Color::Black
    }
}

// Link-level accessors. An absent link is a null leaf and counts as black.
impl<T> OrderedTree<T> {
    #[inline(always)]
    pub(crate) fn is_red(&self, link: Link) -> bool {
        link.is_some_and(|id| self.nodes[id].is_red())
    }

    #[inline(always)]
    pub(crate) fn is_black(&self, link: Link) -> bool {
        !self.is_red(link)
    }

    #[inline(always)]
    pub(crate) fn parent(&self, id: NodeId) -> Link {
        self.nodes[id].parent
    }

    #[inline(always)]
    pub(crate) fn left(&self, id: NodeId) -> Link {
        self.nodes[id].left
    }

    #[inline(always)]
    pub(crate) fn right(&self, id: NodeId) -> Link {
        self.nodes[id].right
    }

    #[inline(always)]
    pub(crate) fn color(&self, id: NodeId) -> Color {
        self.nodes[id].color
    }

    #[inline(always)]
    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        self.nodes[id].color = color;
    }

    #[inline(always)]
    pub(crate) fn is_left_child(&self, id: NodeId) -> bool {
        self.parent(id)
            .is_some_and(|parent| self.left(parent) == Some(id))
    }

    /// The other child of `id`'s parent; `None` for the root or an only child.
    pub(crate) fn sibling(&self, id: NodeId) -> Link {
        let parent = self.parent(id)?;
        if self.left(parent) == Some(id) {
            self.right(parent)
        } else {
            self.left(parent)
        }
    }

    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.left(id) {
            id = left;
        }
        id
    }

    pub(crate) fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.right(id) {
            id = right;
        }
        id
    }

    /// In-order successor of `id`.
    pub(crate) fn next(&self, id: NodeId) -> Link {
        // If we have a right-hand child, go down and then left as far as we
        // can.
        if let Some(right) = self.right(id) {
            return Some(self.leftmost(right));
        }
        // No right-hand children. Everything down and left is smaller than
        // us, so any 'next' node must be in the general direction of our
        // parent: climb while we are a right-hand child, the first parent we
        // reach from its left is the answer.
        let mut node = id;
        let mut parent = self.parent(node);
        while let Some(p) = parent {
            if self.right(p) != Some(node) {
                break;
            }
            node = p;
            parent = self.parent(p);
        }
        parent
    }

    /// In-order predecessor of `id`; mirror of [`Self::next`].
    pub(crate) fn prev(&self, id: NodeId) -> Link {
        if let Some(left) = self.left(id) {
            return Some(self.rightmost(left));
        }
        let mut node = id;
        let mut parent = self.parent(node);
        while let Some(p) = parent {
            if self.left(p) != Some(node) {
                break;
            }
            node = p;
            parent = self.parent(p);
        }
        parent
    }

    /// Points `parent`'s link that currently holds `old` at `new`, or moves
    /// the root when `parent` is `None`. Does not touch `new`'s parent link.
    pub(crate) fn change_child(&mut self, old: NodeId, new: Link, parent: Link) {
        match parent {
            Some(parent) => {
                let parent = &mut self.nodes[parent];
                if parent.left == Some(old) {
                    parent.left = new;
                } else {
                    parent.right = new;
                }
            }
            None => self.root = new,
        }
    }
}
