use crate::{Color, Link, NodeId, OrderedTree};

/// First red-black or linkage rule found broken by [`OrderedTree::validate`].
///
/// Slots are arena indices, useful only for telling nodes apart in a report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("root is red")]
    RedRoot,
    #[error("red node in slot {parent} has a red child in slot {child}")]
    RedRedEdge { parent: usize, child: usize },
    #[error("paths below slot {slot} hold {left} and {right} black nodes")]
    BlackHeightMismatch {
        slot: usize,
        left: usize,
        right: usize,
    },
    #[error("value in slot {slot} is out of order")]
    OutOfOrder { slot: usize },
    #[error("slot {child} does not point back at its parent")]
    BrokenParentLink { child: usize },
    #[error("link to released slot {slot}")]
    DanglingNode { slot: usize },
}

impl<T: Ord> OrderedTree<T> {
    /// Walks the whole tree and checks every structural rule:
    ///
    /// - in-order sequence is non-decreasing, no left descendant is greater
    ///   and no right descendant is smaller than its ancestor,
    /// - the root is black,
    /// - no red node has a red child,
    /// - every path to a null leaf crosses the same number of black nodes,
    /// - parent and child links agree.
    ///
    /// Returns the black-height of the root (null leaves not counted).
    pub fn validate(&self) -> Result<usize, Violation> {
        let Some(root) = self.root else {
            return Ok(0);
        };
        self.live(root)?;
        if self.nodes[root].parent.is_some() {
            return Err(Violation::BrokenParentLink { child: root.slot() });
        }
        if self.nodes[root].color == Color::Red {
            return Err(Violation::RedRoot);
        }
        self.check_subtree(Some(root), None, None)
    }

    fn live(&self, id: NodeId) -> Result<(), Violation> {
        match self.nodes.get(id) {
            Some(_) => Ok(()),
            None => Err(Violation::DanglingNode { slot: id.slot() }),
        }
    }

    /// Black-height of `link`, with every value bounded by `low` and `high`.
    fn check_subtree(
        &self,
        link: Link,
        low: Option<&T>,
        high: Option<&T>,
    ) -> Result<usize, Violation> {
        let Some(id) = link else {
            return Ok(0);
        };
        let node = &self.nodes[id];
        if low.is_some_and(|low| node.value < *low) || high.is_some_and(|high| node.value > *high) {
            return Err(Violation::OutOfOrder { slot: id.slot() });
        }

        for child in [node.left, node.right].into_iter().flatten() {
            self.live(child)?;
            if self.nodes[child].parent != Some(id) {
                return Err(Violation::BrokenParentLink { child: child.slot() });
            }
            if node.is_red() && self.nodes[child].is_red() {
                return Err(Violation::RedRedEdge {
                    parent: id.slot(),
                    child: child.slot(),
                });
            }
        }

        let left = self.check_subtree(node.left, low, Some(&node.value))?;
        let right = self.check_subtree(node.right, Some(&node.value), high)?;
        if left != right {
            return Err(Violation::BlackHeightMismatch {
                slot: id.slot(),
                left,
                right,
            });
        }
        Ok(left + usize::from(node.is_black()))
    }
}
