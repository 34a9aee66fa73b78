use alloc::vec::Vec;
use core::iter::{FusedIterator, Rev};

use crate::{RbTree, node::NIL};

/// Iterator over the entries of an [`RbTree`] in key order
///
/// Walks from the minimum via successor links; iterating from the back walks from the
/// maximum via predecessor links. Created by [`RbTree::iter`].
pub struct Iter<'a, K, V, C> {
    tree: &'a RbTree<K, V, C>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<K, V, C> Clone for Iter<'_, K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let node = self.tree.node_at(self.front);
        self.front = self.tree.successor_of(self.front);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C> DoubleEndedIterator for Iter<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let node = self.tree.node_at(self.back);
        self.back = self.tree.predecessor_of(self.back);
        Some((&node.key, &node.value))
    }
}

impl<K, V, C> ExactSizeIterator for Iter<'_, K, V, C> {}

impl<K, V, C> FusedIterator for Iter<'_, K, V, C> {}

impl<'a, K, V, C> IntoIterator for &'a RbTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> RbTree<K, V, C> {
    /// Returns a double-ended iterator over the entries in ascending key order
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        let root = self.root_index();
        Iter {
            tree: self,
            front: self.find_minimum(root),
            back: self.find_maximum(root),
            remaining: self.len(),
        }
    }

    /// Returns the entries from the smallest key to the largest
    ///
    /// Each call starts a fresh traversal.
    pub fn iter_ascending(&self) -> Iter<'_, K, V, C> {
        self.iter()
    }

    /// Returns the entries from the largest key to the smallest
    pub fn iter_descending(&self) -> Rev<Iter<'_, K, V, C>> {
        self.iter().rev()
    }

    /// Returns the keys in ascending order
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(k, _)| k)
    }

    /// Returns the values in ascending key order
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|(_, v)| v)
    }

    /// Flattens the tree into a `Vec` of entries in ascending key order
    ///
    /// Each node is placed directly at the offset given by the sizes of the subtrees
    /// to its left, in a single pass without successor walks.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rb_ordmap::RbTree;
    /// let tree: RbTree<_, _> = [(3, 'c'), (1, 'a'), (2, 'b')].into_iter().collect();
    /// assert_eq!(tree.to_sorted_vec(), [(&1, &'a'), (&2, &'b'), (&3, &'c')]);
    /// ```
    pub fn to_sorted_vec(&self) -> Vec<(&K, &V)> {
        let mut placed: Vec<Option<(&K, &V)>> = vec![None; self.len()];
        // (subtree root, offset of the subtree's first entry)
        let mut stack = Vec::new();
        if self.root_index() != NIL {
            stack.push((self.root_index(), 0));
        }

        while let Some((idx, offset)) = stack.pop() {
            let node = self.node_at(idx);
            let position = offset + self.get_subtree_count(node.left);
            placed[position] = Some((&node.key, &node.value));

            if node.left != NIL {
                stack.push((node.left, offset));
            }
            if node.right != NIL {
                stack.push((node.right, position + 1));
            }
        }

        placed.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{DetachedNode, RbTree};
    use alloc::vec::Vec;

    fn build(keys: &[i32]) -> RbTree<i32, i32> {
        keys.iter().map(|&k| (k, -k)).collect()
    }

    #[test]
    fn test_empty_iteration() {
        let tree = build(&[]);
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter().next_back(), None);
        assert_eq!(tree.iter().len(), 0);
        assert!(tree.to_sorted_vec().is_empty());
    }

    #[test]
    fn test_ascending_strictly_increasing() {
        let tree = build(&[13, 2, 8, 21, 1, 5, 3, 34, 1]);
        let keys: Vec<_> = tree.iter_ascending().map(|(k, _)| *k).collect();
        assert_eq!(keys, [1, 2, 3, 5, 8, 13, 21, 34]);
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_descending_is_reverse_of_ascending() {
        let tree = build(&(0..50).map(|k| (k * 7) % 50).collect::<Vec<_>>());
        let mut asc: Vec<_> = tree.iter_ascending().collect();
        let desc: Vec<_> = tree.iter_descending().collect();
        asc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let tree = build(&[3, 1, 2]);
        let first: Vec<_> = tree.iter().collect();
        let second: Vec<_> = tree.iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_double_ended_meets_in_middle() {
        let tree = build(&[1, 2, 3, 4, 5]);
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next().map(|(k, _)| *k), Some(1));
        assert_eq!(iter.next_back().map(|(k, _)| *k), Some(5));
        assert_eq!(iter.next().map(|(k, _)| *k), Some(2));
        assert_eq!(iter.next_back().map(|(k, _)| *k), Some(4));
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.next().map(|(k, _)| *k), Some(3));
        assert_eq!(iter.next_back(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_keys_values_and_into_iter() {
        let tree = build(&[2, 1, 3]);
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(tree.values().rev().copied().collect::<Vec<_>>(), [-3, -2, -1]);

        let mut sum = 0;
        for (k, v) in &tree {
            sum += k + v;
        }
        assert_eq!(sum, 0);
    }

    #[test]
    fn test_sorted_vec_matches_iteration() {
        let mut tree = build(&(0..200).map(|k| (k * 37) % 200).collect::<Vec<_>>());
        for k in (0..200).step_by(7) {
            tree.delete(&k);
        }
        let flat = tree.to_sorted_vec();
        let walked: Vec<_> = tree.iter().collect();
        assert_eq!(flat.len(), tree.len());
        assert_eq!(flat, walked);
    }

    #[test]
    fn test_sorted_vec_single_node() {
        let mut tree = RbTree::new();
        tree.insert_node(DetachedNode::new("only", 1));
        assert_eq!(tree.to_sorted_vec(), [(&"only", &1)]);
    }
}
