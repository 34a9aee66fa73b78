use alloc::vec::Vec;
use core::{cmp::Ordering, fmt};

use super::RbTree;
use crate::{
    Comparator, InvariantViolation,
    node::{Color, NIL},
};

impl<K, V, C: Comparator<K>> RbTree<K, V, C> {
    /// Checks every structural invariant of the tree
    ///
    /// Verifies key order under the comparator, that the root is black, that no red
    /// node has a red child, that every path to a nil leaf crosses the same number of
    /// black nodes, that every subtree size equals one plus its children's sizes, and
    /// that parent links mirror child links. Runs in O(n).
    ///
    /// # Errors
    ///
    /// * [`InvariantViolation`] - The first defect found
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if self.root == NIL {
            return Ok(());
        }
        if self.node_at(self.root).parent != NIL {
            return Err(InvariantViolation::BrokenParentLink);
        }
        if self.is_red(self.root) {
            return Err(InvariantViolation::RedRoot);
        }

        self.verify_subtree(self.root, None, None).map(|_| ())
    }

    /// Returns the black height of the subtree at `node`, counting the nil leaf.
    fn verify_subtree(
        &self,
        node: usize,
        lower: Option<&K>,
        upper: Option<&K>,
    ) -> Result<usize, InvariantViolation> {
        if node == NIL {
            return Ok(1);
        }

        let n = self.node_at(node);

        if lower.is_some_and(|lo| self.comparator.compare(&n.key, lo) != Ordering::Greater)
            || upper.is_some_and(|hi| self.comparator.compare(&n.key, hi) != Ordering::Less)
        {
            return Err(InvariantViolation::OrderViolation);
        }

        for child in [n.left, n.right] {
            if child != NIL && self.node_at(child).parent != node {
                return Err(InvariantViolation::BrokenParentLink);
            }
        }

        if n.color == Color::Red && (self.is_red(n.left) || self.is_red(n.right)) {
            return Err(InvariantViolation::RedRedEdge);
        }

        if n.subtree_count != 1 + self.get_subtree_count(n.left) + self.get_subtree_count(n.right)
        {
            return Err(InvariantViolation::SizeMismatch);
        }

        let left_height = self.verify_subtree(n.left, lower, Some(&n.key))?;
        let right_height = self.verify_subtree(n.right, Some(&n.key), upper)?;

        if left_height != right_height {
            return Err(InvariantViolation::BlackHeightMismatch);
        }

        match n.color {
            Color::Black => Ok(left_height + 1),
            Color::Red => Ok(left_height),
        }
    }
}

impl<K, V, C> RbTree<K, V, C> {
    /// Returns a printable view of the tree's internal structure
    ///
    /// Each node is rendered on its own line, indented by depth, with its key, value,
    /// color and subtree size.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rb_ordmap::RbTree;
    /// let tree: RbTree<_, _> = [(1, "a"), (2, "b"), (3, "c")].into_iter().collect();
    /// let dump = tree.debug_dump().to_string();
    /// assert_eq!(
    ///     dump,
    ///     "2 => \"b\" (black, size 3)\n  L: 1 => \"a\" (red, size 1)\n  R: 3 => \"c\" (red, size 1)\n"
    /// );
    /// ```
    pub fn debug_dump(&self) -> TreeDump<'_, K, V, C> {
        TreeDump { tree: self }
    }
}

/// Display adapter returned by [`RbTree::debug_dump`]
pub struct TreeDump<'a, K, V, C> {
    tree: &'a RbTree<K, V, C>,
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Display for TreeDump<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.tree;
        let mut stack: Vec<(usize, usize, &str)> = Vec::new();
        if tree.root != NIL {
            stack.push((tree.root, 0, ""));
        }

        while let Some((idx, depth, side)) = stack.pop() {
            let node = tree.node_at(idx);
            let color = match node.color {
                Color::Red => "red",
                Color::Black => "black",
            };
            writeln!(
                f,
                "{:indent$}{side}{:?} => {:?} ({color}, size {})",
                "",
                node.key,
                node.value,
                node.subtree_count,
                indent = depth * 2,
            )?;

            if node.right != NIL {
                stack.push((node.right, depth + 1, "R: "));
            }
            if node.left != NIL {
                stack.push((node.left, depth + 1, "L: "));
            }
        }
        Ok(())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for TreeDump<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
