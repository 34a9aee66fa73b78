use log::trace;

use super::RbTree;
use crate::node::NIL;

impl<K, V, C> RbTree<K, V, C> {
    /// Promotes `x`'s right child into `x`'s position.
    ///
    /// Panics if `x` has no right child: fix-up code never rotates towards nil.
    pub(super) fn rotate_left(&mut self, x: usize) {
        let y = self.get_right(x);
        assert!(y != NIL, "rotate_left requires a right child");
        trace!("rotate_left at slot {x}");

        let y_left = self.node_at(y).left;
        self.node_at_mut(x).right = y_left;
        if y_left != NIL {
            self.node_at_mut(y_left).parent = x;
        }

        let x_parent = self.node_at(x).parent;
        self.node_at_mut(y).parent = x_parent;

        if x_parent == NIL {
            self.root = y;
        } else if x == self.node_at(x_parent).left {
            self.node_at_mut(x_parent).left = y;
        } else {
            self.node_at_mut(x_parent).right = y;
        }

        self.node_at_mut(y).left = x;
        self.node_at_mut(x).parent = y;

        // x is now y's child, so its size must be settled first
        self.recalculate_subtree_count(x);
        self.recalculate_subtree_count(y);
    }

    /// Mirror of [`rotate_left`](Self::rotate_left): promotes `y`'s left child.
    pub(super) fn rotate_right(&mut self, y: usize) {
        let x = self.get_left(y);
        assert!(x != NIL, "rotate_right requires a left child");
        trace!("rotate_right at slot {y}");

        let x_right = self.node_at(x).right;
        self.node_at_mut(y).left = x_right;
        if x_right != NIL {
            self.node_at_mut(x_right).parent = y;
        }

        let y_parent = self.node_at(y).parent;
        self.node_at_mut(x).parent = y_parent;

        if y_parent == NIL {
            self.root = x;
        } else if y == self.node_at(y_parent).left {
            self.node_at_mut(y_parent).left = x;
        } else {
            self.node_at_mut(y_parent).right = x;
        }

        self.node_at_mut(x).right = y;
        self.node_at_mut(y).parent = x;

        self.recalculate_subtree_count(y);
        self.recalculate_subtree_count(x);
    }

    fn recalculate_subtree_count(&mut self, idx: usize) {
        let node = self.node_at(idx);
        let total = 1 + self.get_subtree_count(node.left) + self.get_subtree_count(node.right);
        self.node_at_mut(idx).subtree_count = total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Color;
    use alloc::vec::Vec;

    fn keys_in_order(tree: &RbTree<i32, ()>) -> Vec<i32> {
        tree.keys().copied().collect()
    }

    #[test]
    fn test_rotate_left_restructures_and_recounts() {
        // 2 as root with 1 and 4(3, 5) below it
        let mut tree: RbTree<i32, ()> = [(2, ()), (1, ()), (4, ()), (3, ()), (5, ())]
            .into_iter()
            .collect();
        let root = tree.root;
        assert_eq!(tree.node_at(root).key, 2);
        let before = keys_in_order(&tree);

        tree.rotate_left(root);

        let new_root = tree.root;
        assert_eq!(tree.node_at(new_root).key, 4);
        assert_eq!(tree.node_at(new_root).parent, NIL);
        assert_eq!(tree.node_at(new_root).subtree_count, 5);
        assert_eq!(tree.node_at(root).parent, new_root);
        assert_eq!(tree.node_at(root).subtree_count, 3);
        assert_eq!(tree.node_at(tree.get_right(root)).key, 3);
        assert_eq!(keys_in_order(&tree), before);
    }

    #[test]
    fn test_rotate_right_is_inverse_of_left() {
        let mut tree: RbTree<i32, ()> = (1..=7).map(|k| (k, ())).collect();
        let root = tree.root;
        let before: Vec<_> = tree
            .slots
            .iter()
            .filter_map(|s| s.node.as_ref())
            .map(|n| (n.key, n.parent, n.left, n.right, n.subtree_count))
            .collect();

        tree.rotate_right(root);
        assert_ne!(tree.root, root);
        tree.rotate_left(tree.root);

        let after: Vec<_> = tree
            .slots
            .iter()
            .filter_map(|s| s.node.as_ref())
            .map(|n| (n.key, n.parent, n.left, n.right, n.subtree_count))
            .collect();
        assert_eq!(tree.root, root);
        assert_eq!(before, after);
    }

    #[test]
    fn test_rotation_keeps_colors() {
        let mut tree: RbTree<i32, ()> = (1..=3).map(|k| (k, ())).collect();
        let root = tree.root;
        tree.rotate_left(root);
        assert_eq!(tree.get_color(root), Color::Black);
        assert_eq!(keys_in_order(&tree), [1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "rotate_left requires a right child")]
    fn test_rotate_left_without_right_child() {
        let mut tree: RbTree<i32, ()> = [(1, ())].into_iter().collect();
        let root = tree.root;
        tree.rotate_left(root);
    }

    #[test]
    #[should_panic(expected = "rotate_right requires a left child")]
    fn test_rotate_right_without_left_child() {
        let mut tree: RbTree<i32, ()> = [(1, ())].into_iter().collect();
        let root = tree.root;
        tree.rotate_right(root);
    }
}
