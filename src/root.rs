use log::trace;

use crate::{Color, Link, NodeId, OrderedTree};

// Rotations and the two rebalancing passes.
impl<T> OrderedTree<T> {
    /// Left rotation at `node`; its right child takes its place.
    ///
    /// ```text
    ///     N               R
    ///    / \             / \
    ///   a   R    -->    N   c
    ///      / \         / \
    ///     b   c       a   b
    /// ```
    ///
    /// Colors are left alone.
    pub(crate) fn rotate_left(&mut self, node: NodeId) {
        let Some(right) = self.right(node) else {
            unreachable!("left rotation without a right child");
        };

        let inner = self.left(right);
        self.nodes[node].right = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(node);
        }

        let parent = self.parent(node);
        self.nodes[right].parent = parent;
        self.change_child(node, Some(right), parent);

        self.nodes[right].left = Some(node);
        self.nodes[node].parent = Some(right);
    }

    /// Right rotation at `node`; mirror of [`Self::rotate_left`].
    ///
    /// ```text
    ///       N           L
    ///      / \         / \
    ///     L   c  -->  a   N
    ///    / \             / \
    ///   a   b           b   c
    /// ```
    pub(crate) fn rotate_right(&mut self, node: NodeId) {
        let Some(left) = self.left(node) else {
            unreachable!("right rotation without a left child");
        };

        let inner = self.right(left);
        self.nodes[node].left = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(node);
        }

        let parent = self.parent(node);
        self.nodes[left].parent = parent;
        self.change_child(node, Some(left), parent);

        self.nodes[left].right = Some(node);
        self.nodes[node].parent = Some(left);
    }

    /// Restores the red-black properties after `node` was linked in red.
    pub(crate) fn insert_color(&mut self, mut node: NodeId) {
        loop {
            /*
             * Loop invariant: node is red and the only possible violation
             * is node having a red parent.
             */
            let Some(parent) = self.parent(node) else {
                break;
            };
            if self.nodes[parent].is_black() {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let Some(gparent) = self.parent(parent) else {
                break;
            };
            let parent_is_left = self.left(gparent) == Some(parent);
            let uncle = if parent_is_left {
                self.right(gparent)
            } else {
                self.left(gparent)
            };

            if let Some(uncle) = uncle.filter(|&u| self.nodes[u].is_red()) {
                /*
                 * Case A - uncle is red (color flips).
                 *
                 *       G            g
                 *      / \          / \
                 *     p   u  -->   P   U
                 *    /            /
                 *   n            n
                 *
                 * g may now have a red parent, so carry on from g.
                 */
                trace!("insert fixup: recolor at slot {}", gparent.slot());
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(gparent, Color::Red);
                node = gparent;
                continue;
            }

            /*
             * Case B - uncle is black or absent.
             *
             * An inner grandchild is first rotated outward at the parent:
             *
             *      G             G
             *     / \           / \
             *    p   U  -->    n   U
             *     \           /
             *      n         p
             *
             * then the grandparent is rotated and the two swap colors:
             *
             *        G           P
             *       / \         / \
             *      p   U  -->  n   g
             *     /                 \
             *    n                   U
             */
            let mut top = parent;
            if parent_is_left {
                if self.right(parent) == Some(node) {
                    trace!("insert fixup: inner rotate left at slot {}", parent.slot());
                    self.rotate_left(parent);
                    top = node;
                }
                trace!("insert fixup: rotate right at slot {}", gparent.slot());
                self.rotate_right(gparent);
            } else {
                if self.left(parent) == Some(node) {
                    trace!("insert fixup: inner rotate right at slot {}", parent.slot());
                    self.rotate_right(parent);
                    top = node;
                }
                trace!("insert fixup: rotate left at slot {}", gparent.slot());
                self.rotate_left(gparent);
            }
            let top_color = self.color(top);
            self.set_color(top, self.color(gparent));
            self.set_color(gparent, top_color);
            break;
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Unlinks `node` and returns its value, rebalancing on the way.
    pub(crate) fn erase(&mut self, mut node: NodeId) -> T {
        if let (Some(_), Some(right)) = (self.left(node), self.right(node)) {
            // Two children: promote the in-order successor's value into
            // `node` and remove the successor, which has no left child.
            let successor = self.leftmost(right);
            self.nodes.swap_values(node, successor);
            node = successor;
        }

        let child = self.left(node).or(self.right(node));
        let both_black = self.nodes[node].is_black() && self.is_black(child);
        let parent = self.parent(node);

        match child {
            None => {
                if parent.is_none() {
                    self.root = None;
                } else {
                    if both_black {
                        // Fix up while the leaf still anchors its sibling.
                        self.erase_color(node);
                    } else if let Some(sibling) = self.sibling(node) {
                        self.set_color(sibling, Color::Red);
                    }
                    // Rotations during the fixup may have moved the leaf.
                    let parent = self.parent(node);
                    self.change_child(node, None, parent);
                }
                self.nodes.dealloc(node).value
            }
            Some(child) => match parent {
                None => {
                    // The root keeps its slot and color; only its value and
                    // children change.
                    let removed = self.nodes.dealloc(child);
                    let root = &mut self.nodes[node];
                    root.left = None;
                    root.right = None;
                    std::mem::replace(&mut root.value, removed.value)
                }
                Some(_) => {
                    self.change_child(node, Some(child), parent);
                    self.nodes[child].parent = parent;
                    let removed = self.nodes.dealloc(node);
                    if both_black {
                        self.erase_color(child);
                    } else {
                        self.set_color(child, Color::Black);
                    }
                    removed.value
                }
            },
        }
    }

    /// Resolves a black-height deficit sitting at `node`.
    ///
    /// Walks upward instead of recursing: each pass either settles the
    /// deficit locally or hands it to the parent.
    pub(crate) fn erase_color(&mut self, mut node: NodeId) {
        loop {
            /*
             * Loop invariant: every path through `node` carries one black
             * node fewer than the paths through its sibling.
             */
            let Some(parent) = self.parent(node) else {
                // The root has no deficit to fix.
                break;
            };

            let Some(sibling) = self.sibling(node) else {
                trace!("erase fixup: no sibling, climbing to slot {}", parent.slot());
                node = parent;
                continue;
            };

            let sibling_is_left = self.is_left_child(sibling);

            if self.nodes[sibling].is_red() {
                /*
                 * Case 1 - red sibling: rotate it above the parent.
                 *
                 *     P               S
                 *    / \             / \
                 *   N   s    -->    p   Sr
                 *      / \         / \
                 *     Sl  Sr      N   Sl
                 *
                 * N now has a black sibling (Sl); retry at N.
                 */
                trace!("erase fixup: red sibling at slot {}", sibling.slot());
                self.set_color(parent, Color::Red);
                self.set_color(sibling, Color::Black);
                if sibling_is_left {
                    self.rotate_right(parent);
                } else {
                    self.rotate_left(parent);
                }
                continue;
            }

            let near_red = self.is_red(self.left(sibling));
            let far_red = self.is_red(self.right(sibling));

            if near_red || far_red {
                /*
                 * Case 2 - black sibling with a red child: one or two
                 * rotations settle the deficit, e.g. right-right
                 *
                 *      (p)             (s)
                 *      / \             / \
                 *     N   S     -->   P   Sr
                 *        / \         / \
                 *      (sl) sr      N  (sl)
                 *
                 * and right-left
                 *
                 *     (p)            (sl)
                 *     / \            /  \
                 *    N   S    -->   P    S
                 *       /          /
                 *      sl         N
                 */
                let parent_color = self.color(parent);
                if let Some(red) = self.left(sibling).filter(|_| near_red) {
                    if sibling_is_left {
                        trace!("erase fixup: left-left at slot {}", parent.slot());
                        self.set_color(red, self.color(sibling));
                        self.set_color(sibling, parent_color);
                        self.rotate_right(parent);
                    } else {
                        trace!("erase fixup: right-left at slot {}", parent.slot());
                        self.set_color(red, parent_color);
                        self.rotate_right(sibling);
                        self.rotate_left(parent);
                    }
                } else if let Some(red) = self.right(sibling) {
                    if sibling_is_left {
                        trace!("erase fixup: left-right at slot {}", parent.slot());
                        self.set_color(red, parent_color);
                        self.rotate_left(sibling);
                        self.rotate_right(parent);
                    } else {
                        trace!("erase fixup: right-right at slot {}", parent.slot());
                        self.set_color(red, self.color(sibling));
                        self.set_color(sibling, parent_color);
                        self.rotate_left(parent);
                    }
                }
                self.set_color(parent, Color::Black);
                break;
            }

            /*
             * Case 3 - black sibling with black children: color flip.
             *
             *    (p)           (p)
             *    / \           / \
             *   N   S    -->  N   s
             *      / \           / \
             *     Sl  Sr        Sl  Sr
             *
             * A red p absorbs the deficit; a black p passes it upward.
             */
            trace!("erase fixup: recolor sibling at slot {}", sibling.slot());
            self.set_color(sibling, Color::Red);
            if self.nodes[parent].is_black() {
                node = parent;
                continue;
            }
            self.set_color(parent, Color::Black);
            break;
        }
    }

    /// Link a fresh red node holding `value` under `parent` on the given side.
    pub(crate) fn link(&mut self, value: T, parent: Link, left: bool) -> NodeId {
        let mut node = crate::Node::new(value);
        node.parent = parent;
        let id = self.nodes.alloc(node);
        match parent {
            Some(parent) if left => self.nodes[parent].left = Some(id),
            Some(parent) => self.nodes[parent].right = Some(id),
            None => self.root = Some(id),
        }
        id
    }
}
