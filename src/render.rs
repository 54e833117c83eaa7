use std::fmt::{self, Display, Write};

use crate::{Link, OrderedTree};

/// Columns of indentation per tree level in [`OrderedTree::render`].
pub const DEFAULT_INDENT: usize = 4;

impl<T: Display> OrderedTree<T> {
    /// Writes the tree rotated a quarter turn counter-clockwise: right
    /// subtree first, one value per line, indented by depth.
    ///
    /// This is a picture of the tree, not a sorted listing; use
    /// [`OrderedTree::iter`] for that.
    ///
    /// ```
    /// use ordered_rbtree::OrderedTree;
    ///
    /// let tree: OrderedTree<i32> = [10, 20, 30].into_iter().collect();
    /// let mut out = String::new();
    /// tree.render(&mut out).unwrap();
    /// assert_eq!(out, "    30\n20\n    10\n");
    /// ```
    pub fn render<W: Write>(&self, sink: &mut W) -> fmt::Result {
        self.render_with_indent(sink, DEFAULT_INDENT)
    }

    pub fn render_with_indent<W: Write>(&self, sink: &mut W, indent: usize) -> fmt::Result {
        // (node, depth, whether its right subtree is already written)
        let mut pending: Vec<(Link, usize, bool)> = vec![(self.root, 0, false)];
        while let Some((link, depth, right_done)) = pending.pop() {
            let Some(id) = link else { continue };
            if right_done {
                writeln!(sink, "{:width$}{}", "", self.nodes[id].value, width = depth * indent)?;
                pending.push((self.left(id), depth + 1, false));
            } else {
                pending.push((link, depth, true));
                pending.push((self.right(id), depth + 1, false));
            }
        }
        Ok(())
    }
}

/// Same picture as [`OrderedTree::render`].
impl<T: Display> Display for OrderedTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}
