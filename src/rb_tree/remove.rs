use log::trace;

use super::RbTree;
use crate::{
    Comparator,
    node::{Color, NIL, Node},
};

impl<K, V, C: Comparator<K>> RbTree<K, V, C> {
    /// Unlinks the node at `node_to_delete`, rebalances, and returns the freed node.
    pub(super) fn delete_at(&mut self, node_to_delete: usize) -> Node<K, V> {
        let (removed_color, fixup_node, fixup_parent) = self.perform_deletion(node_to_delete);

        self.decrement_counts_to_root(fixup_parent);

        if removed_color == Color::Black {
            self.fix_deletion_violations(fixup_node, fixup_parent);
        }

        let node = self.release_node(node_to_delete);

        #[cfg(debug_assertions)]
        debug_assert!(
            self.validate().is_ok(),
            "RB tree invariants violated after removal"
        );

        node
    }

    /// Splices `node` out of the tree.
    ///
    /// Returns the color of the slot that physically disappeared, the index that now
    /// occupies that slot (possibly nil), and that index's parent.
    fn perform_deletion(&mut self, node: usize) -> (Color, usize, usize) {
        let left = self.node_at(node).left;
        let right = self.node_at(node).right;

        if left == NIL {
            let parent = self.node_at(node).parent;
            self.transplant(node, right);
            return (self.get_color(node), right, parent);
        }
        if right == NIL {
            let parent = self.node_at(node).parent;
            self.transplant(node, left);
            return (self.get_color(node), left, parent);
        }

        // Two children: the in-order successor takes over node's position, color and
        // size, and the successor's old slot is the one that vanishes.
        let successor = self.find_minimum(right);
        trace!("splicing successor slot {successor} into slot {node}");
        let successor_color = self.get_color(successor);
        let fixup_node = self.node_at(successor).right;
        let fixup_parent;

        if self.node_at(successor).parent == node {
            fixup_parent = successor;
        } else {
            fixup_parent = self.node_at(successor).parent;
            self.transplant(successor, fixup_node);
            self.node_at_mut(successor).right = right;
            self.node_at_mut(right).parent = successor;
        }

        self.transplant(node, successor);
        self.node_at_mut(successor).left = left;
        self.node_at_mut(left).parent = successor;

        let (color, count) = {
            let n = self.node_at(node);
            (n.color, n.subtree_count)
        };
        let s = self.node_at_mut(successor);
        s.color = color;
        s.subtree_count = count;

        (successor_color, fixup_node, fixup_parent)
    }

    /// Replaces `old_node` with `new_node` in `old_node`'s parent (or as root).
    fn transplant(&mut self, old_node: usize, new_node: usize) {
        let parent = self.node_at(old_node).parent;

        if parent == NIL {
            self.root = new_node;
        } else if old_node == self.node_at(parent).left {
            self.node_at_mut(parent).left = new_node;
        } else {
            self.node_at_mut(parent).right = new_node;
        }

        if new_node != NIL {
            self.node_at_mut(new_node).parent = parent;
        }
    }

    fn decrement_counts_to_root(&mut self, mut node: usize) {
        while node != NIL {
            let n = self.node_at_mut(node);
            n.subtree_count -= 1;
            node = n.parent;
        }
    }

    /// Resolves the missing black on the path through `fixup_node`.
    ///
    /// `fixup_node` may be nil, so its parent is tracked alongside it.
    fn fix_deletion_violations(&mut self, mut fixup_node: usize, mut fixup_parent: usize) {
        while fixup_node != self.root && self.is_black(fixup_node) {
            if fixup_node == self.get_left(fixup_parent) {
                let mut sibling = self.get_right(fixup_parent);

                if self.is_red(sibling) {
                    self.set_color(sibling, Color::Black);
                    self.set_color(fixup_parent, Color::Red);
                    self.rotate_left(fixup_parent);
                    sibling = self.get_right(fixup_parent);
                }

                if self.is_black(self.get_left(sibling)) && self.is_black(self.get_right(sibling)) {
                    self.set_color(sibling, Color::Red);
                    fixup_node = fixup_parent;
                    fixup_parent = self.get_parent(fixup_node);
                } else {
                    if self.is_black(self.get_right(sibling)) {
                        self.set_color(self.get_left(sibling), Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.get_right(fixup_parent);
                    }

                    self.set_color(sibling, self.get_color(fixup_parent));
                    self.set_color(fixup_parent, Color::Black);
                    self.set_color(self.get_right(sibling), Color::Black);
                    self.rotate_left(fixup_parent);
                    fixup_node = self.root;
                }
            } else {
                let mut sibling = self.get_left(fixup_parent);

                if self.is_red(sibling) {
                    self.set_color(sibling, Color::Black);
                    self.set_color(fixup_parent, Color::Red);
                    self.rotate_right(fixup_parent);
                    sibling = self.get_left(fixup_parent);
                }

                if self.is_black(self.get_right(sibling)) && self.is_black(self.get_left(sibling)) {
                    self.set_color(sibling, Color::Red);
                    fixup_node = fixup_parent;
                    fixup_parent = self.get_parent(fixup_node);
                } else {
                    if self.is_black(self.get_left(sibling)) {
                        self.set_color(self.get_right(sibling), Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.get_left(fixup_parent);
                    }

                    self.set_color(sibling, self.get_color(fixup_parent));
                    self.set_color(fixup_parent, Color::Black);
                    self.set_color(self.get_left(sibling), Color::Black);
                    self.rotate_right(fixup_parent);
                    fixup_node = self.root;
                }
            }
        }

        self.set_color(fixup_node, Color::Black);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn build(keys: &[i32]) -> RbTree<i32, ()> {
        keys.iter().map(|&k| (k, ())).collect()
    }

    fn keys(tree: &RbTree<i32, ()>) -> Vec<i32> {
        tree.keys().copied().collect()
    }

    #[test]
    fn test_delete_red_leaf_needs_no_fixup() {
        let mut tree = build(&[20, 10, 30]);
        let leaf = tree.find_index(&10).unwrap();
        assert_eq!(tree.get_color(leaf), Color::Red);
        let before_root = tree.root;

        assert!(tree.delete(&10));
        assert_eq!(tree.root, before_root);
        assert_eq!(tree.node_at(tree.root).subtree_count, 2);
        assert_eq!(keys(&tree), [20, 30]);
    }

    #[test]
    fn test_delete_root_with_two_children() {
        let mut tree = build(&[20, 10, 30]);
        assert!(tree.delete(&20));
        assert_eq!(tree.node_at(tree.root).key, 30);
        assert_eq!(tree.get_color(tree.root), Color::Black);
        assert_eq!(tree.node_at(tree.root).subtree_count, 2);
        assert_eq!(keys(&tree), [10, 30]);
    }

    #[test]
    fn test_successor_keeps_its_slot() {
        let mut tree = build(&[4, 2, 6, 1, 3, 5, 7]);
        let successor_slot = tree.find_index(&5).unwrap();
        let target_slot = tree.find_index(&4).unwrap();

        assert!(tree.delete(&4));
        assert_eq!(tree.find_index(&5), Some(successor_slot));
        assert!(tree.free_list.contains(&target_slot));
        assert_eq!(tree.root, successor_slot);
    }

    #[test]
    fn test_delete_black_leaf_with_red_sibling() {
        // Ascending inserts leave a red interior node on the right spine.
        let mut tree = build(&[1, 2, 3, 4, 5, 6, 7, 8]);
        for k in [1, 3, 2] {
            assert!(tree.delete(&k));
            assert_eq!(tree.validate(), Ok(()));
        }
        assert_eq!(keys(&tree), [4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_delete_mirror_cases() {
        let mut tree = build(&[8, 7, 6, 5, 4, 3, 2, 1]);
        for k in [8, 6, 7] {
            assert!(tree.delete(&k));
            assert_eq!(tree.validate(), Ok(()));
        }
        assert_eq!(keys(&tree), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_alternating_insert_remove() {
        let mut tree = RbTree::new();

        tree.insert(5, ());
        tree.insert(3, ());
        tree.delete(&5);
        tree.insert(7, ());
        tree.delete(&3);
        tree.insert(1, ());

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.min_key(), Some(&1));
        assert_eq!(tree.max_key(), Some(&7));
    }

    #[test]
    fn test_sizes_after_each_removal() {
        let mut tree = build(&(0..40).collect::<Vec<_>>());
        for k in (0..40).rev().step_by(3) {
            tree.delete(&k);
            for n in tree.slots.iter().filter_map(|s| s.node.as_ref()) {
                let expected = 1 + tree.get_subtree_count(n.left) + tree.get_subtree_count(n.right);
                assert_eq!(n.subtree_count, expected);
            }
        }
    }
}
