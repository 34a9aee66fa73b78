use core::cmp::Ordering;

use log::trace;

use super::RbTree;
use crate::{
    Comparator,
    node::{Color, NIL, Node},
};

impl<K, V, C: Comparator<K>> RbTree<K, V, C> {
    /// Links a new red node at the position `probe` reported and rebalances.
    ///
    /// `probe` is the result of [`search_index`](Self::search_index) for `key`, which
    /// must not be an exact match.
    pub(super) fn attach(&mut self, key: K, value: V, probe: Option<(usize, Ordering)>) -> usize {
        let (parent, side) = probe.unwrap_or((NIL, Ordering::Less));
        debug_assert!(side != Ordering::Equal, "attach called for an existing key");

        let new_idx = self.allocate_node(Node::new(key, value, parent));
        trace!("attached slot {new_idx} under slot {parent}");

        if parent == NIL {
            self.root = new_idx;
        } else if side == Ordering::Less {
            self.node_at_mut(parent).left = new_idx;
        } else {
            self.node_at_mut(parent).right = new_idx;
        }

        self.increment_counts_to_root(parent);
        self.fix_insertion_violations(new_idx);

        #[cfg(debug_assertions)]
        debug_assert!(
            self.validate().is_ok(),
            "RB tree invariants violated after insertion"
        );

        new_idx
    }

    fn increment_counts_to_root(&mut self, mut node: usize) {
        while node != NIL {
            let n = self.node_at_mut(node);
            n.subtree_count += 1;
            node = n.parent;
        }
    }

    /// Restores the color rules after `node` was linked in as a red leaf.
    ///
    /// One pass handles both orientations: `parent_on_left` records which side of the
    /// grandparent the red parent hangs on, and every child lookup and rotation is
    /// taken relative to it.
    fn fix_insertion_violations(&mut self, mut node: usize) {
        while node != self.root && self.is_red(self.get_parent(node)) {
            let parent = self.get_parent(node);
            let grandparent = self.get_parent(parent);
            let parent_on_left = parent == self.get_left(grandparent);
            let uncle = self.child_on(grandparent, !parent_on_left);

            // Red uncle: push the grandparent's black down a level and retry above.
            if self.is_red(uncle) {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            // Zig-zag: turn the inner grandchild into an outer one first.
            if node == self.child_on(parent, !parent_on_left) {
                node = parent;
                self.rotate_down(node, parent_on_left);
            }

            // Zig-zig: the new parent replaces the grandparent as a black subtree root.
            let outer_parent = self.get_parent(node);
            self.set_color(outer_parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate_down(grandparent, !parent_on_left);
        }
        self.set_color(self.root, Color::Black);
    }

    #[inline]
    fn child_on(&self, idx: usize, left: bool) -> usize {
        if left {
            self.get_left(idx)
        } else {
            self.get_right(idx)
        }
    }

    /// Rotates `idx` down towards its left (`to_left`) or right side.
    #[inline]
    fn rotate_down(&mut self, idx: usize, to_left: bool) {
        if to_left {
            self.rotate_left(idx);
        } else {
            self.rotate_right(idx);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn colors_by_key(tree: &RbTree<i32, ()>) -> Vec<(i32, Color)> {
        let mut out: Vec<_> = tree
            .slots
            .iter()
            .filter_map(|s| s.node.as_ref())
            .map(|n| (n.key, n.color))
            .collect();
        out.sort_by_key(|(k, _)| *k);
        out
    }

    #[test]
    fn test_first_insert_is_black_root() {
        let mut tree = RbTree::new();
        tree.insert(1, ());
        assert_eq!(tree.get_color(tree.root), Color::Black);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_red_uncle_recolors() {
        let mut tree = RbTree::new();
        for k in [20, 10, 30] {
            tree.insert(k, ());
        }
        assert_eq!(
            colors_by_key(&tree),
            [(10, Color::Red), (20, Color::Black), (30, Color::Red)]
        );

        tree.insert(5, ());
        assert_eq!(
            colors_by_key(&tree),
            [
                (5, Color::Red),
                (10, Color::Black),
                (20, Color::Black),
                (30, Color::Black)
            ]
        );
        assert_eq!(tree.node_at(tree.root).key, 20);
    }

    #[test]
    fn test_zig_zag_left_right() {
        let mut tree = RbTree::new();
        for k in [30, 10, 20] {
            tree.insert(k, ());
        }
        let root = tree.root;
        assert_eq!(tree.node_at(root).key, 20);
        assert_eq!(tree.node_at(tree.get_left(root)).key, 10);
        assert_eq!(tree.node_at(tree.get_right(root)).key, 30);
        assert_eq!(tree.node_at(root).subtree_count, 3);
    }

    #[test]
    fn test_zig_zag_right_left() {
        let mut tree = RbTree::new();
        for k in [10, 30, 20] {
            tree.insert(k, ());
        }
        let root = tree.root;
        assert_eq!(tree.node_at(root).key, 20);
        assert_eq!(tree.get_color(tree.get_left(root)), Color::Red);
        assert_eq!(tree.get_color(tree.get_right(root)), Color::Red);
    }

    #[test]
    fn test_zig_zig_both_orientations() {
        for keys in [[10, 20, 30], [30, 20, 10]] {
            let mut tree = RbTree::new();
            for k in keys {
                tree.insert(k, ());
            }
            assert_eq!(tree.node_at(tree.root).key, 20);
            assert_eq!(
                colors_by_key(&tree),
                [(10, Color::Red), (20, Color::Black), (30, Color::Red)]
            );
        }
    }

    #[test]
    fn test_recolor_propagates_then_rotates() {
        let mut tree = RbTree::new();
        for k in [50, 25, 75, 10, 30, 5] {
            tree.insert(k, ());
        }
        // 5 recolors 10/30 and pushes red to 25, whose parent is the black root.
        assert_eq!(tree.node_at(tree.root).key, 50);
        assert_eq!(tree.get_color(tree.find_index(&25).unwrap()), Color::Red);

        for k in [1, 3] {
            tree.insert(k, ());
        }
        assert_eq!(tree.validate(), Ok(()));
        let keys: Vec<_> = tree.keys().copied().collect();
        assert_eq!(keys, [1, 3, 5, 10, 25, 30, 50, 75]);
    }

    #[test]
    fn test_counts_along_insertion_path() {
        let mut tree = RbTree::new();
        for k in 0..31 {
            tree.insert(k, ());
            assert_eq!(tree.len(), k as usize + 1);
        }
        for slot in tree.slots.iter().filter_map(|s| s.node.as_ref()) {
            let expected =
                1 + tree.get_subtree_count(slot.left) + tree.get_subtree_count(slot.right);
            assert_eq!(slot.subtree_count, expected);
        }
    }
}
