use core::cmp::Ordering;

use super::RbTree;
use crate::{Comparator, NodeHandle, TreeError, node::NIL};

impl<K, V, C> RbTree<K, V, C> {
    /// Returns the smallest key
    pub fn min_key(&self) -> Option<&K> {
        self.first_key_value().map(|(k, _)| k)
    }

    /// Returns the largest key
    pub fn max_key(&self) -> Option<&K> {
        self.last_key_value().map(|(k, _)| k)
    }

    /// Returns the entry with the smallest key
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        if self.root == NIL {
            return None;
        }
        let node = self.node_at(self.find_minimum(self.root));
        Some((&node.key, &node.value))
    }

    /// Returns the entry with the largest key
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        if self.root == NIL {
            return None;
        }
        let node = self.node_at(self.find_maximum(self.root));
        Some((&node.key, &node.value))
    }

    /// Returns a handle to the node with the smallest key
    pub fn first_node(&self) -> Option<NodeHandle> {
        (self.root != NIL).then(|| self.handle_of(self.find_minimum(self.root)))
    }

    /// Returns a handle to the node with the largest key
    pub fn last_node(&self) -> Option<NodeHandle> {
        (self.root != NIL).then(|| self.handle_of(self.find_maximum(self.root)))
    }

    /// Returns the node that follows `handle` in key order
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - If `handle` refers to the node with the largest key
    ///
    /// # Errors
    ///
    /// * [`TreeError`] - If the handle is foreign to this tree or its node was removed
    ///
    /// # Examples
    ///
    /// ```
    /// # use rb_ordmap::RbTree;
    /// let tree: RbTree<_, _> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
    ///
    /// let mut cursor = tree.first_node();
    /// let mut seen = Vec::new();
    /// while let Some(handle) = cursor {
    ///     seen.push(*tree.entry_at(handle)?.1);
    ///     cursor = tree.successor(handle)?;
    /// }
    /// assert_eq!(seen, ['a', 'b', 'c']);
    /// # Ok::<(), rb_ordmap::TreeError>(())
    /// ```
    pub fn successor(&self, handle: NodeHandle) -> Result<Option<NodeHandle>, TreeError> {
        let next = self.successor_of(self.resolve(handle)?);
        Ok((next != NIL).then(|| self.handle_of(next)))
    }

    /// Returns the node that precedes `handle` in key order
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - If `handle` refers to the node with the smallest key
    ///
    /// # Errors
    ///
    /// * [`TreeError`] - If the handle is foreign to this tree or its node was removed
    pub fn predecessor(&self, handle: NodeHandle) -> Result<Option<NodeHandle>, TreeError> {
        let prev = self.predecessor_of(self.resolve(handle)?);
        Ok((prev != NIL).then(|| self.handle_of(prev)))
    }

    /// Returns the entry at zero-based position `k` in key order
    ///
    /// Descends by subtree sizes, so runs in O(log n).
    ///
    /// # Examples
    ///
    /// ```
    /// # use rb_ordmap::RbTree;
    /// let tree: RbTree<_, _> = [(30, 'c'), (10, 'a'), (20, 'b')].into_iter().collect();
    /// assert_eq!(tree.nth(1), Some((&20, &'b')));
    /// assert_eq!(tree.nth(3), None);
    /// ```
    pub fn nth(&self, k: usize) -> Option<(&K, &V)> {
        if k >= self.len() {
            return None;
        }

        let mut current = self.root;
        let mut remaining_rank = k;

        loop {
            if current == NIL {
                return None;
            }

            let node = self.node_at(current);
            let left_count = self.get_subtree_count(node.left);

            match remaining_rank.cmp(&left_count) {
                Ordering::Less => current = node.left,
                Ordering::Equal => return Some((&node.key, &node.value)),
                Ordering::Greater => {
                    remaining_rank -= left_count + 1;
                    current = node.right;
                }
            }
        }
    }

    pub(crate) fn find_minimum(&self, mut node: usize) -> usize {
        while node != NIL {
            let left = self.node_at(node).left;
            if left == NIL {
                break;
            }
            node = left;
        }
        node
    }

    pub(crate) fn find_maximum(&self, mut node: usize) -> usize {
        while node != NIL {
            let right = self.node_at(node).right;
            if right == NIL {
                break;
            }
            node = right;
        }
        node
    }

    /// In-order successor of `node`, or nil when `node` holds the largest key.
    pub(crate) fn successor_of(&self, node: usize) -> usize {
        let right = self.node_at(node).right;
        if right != NIL {
            return self.find_minimum(right);
        }

        let mut child = node;
        let mut parent = self.node_at(node).parent;
        while parent != NIL && child == self.node_at(parent).right {
            child = parent;
            parent = self.node_at(parent).parent;
        }
        parent
    }

    /// In-order predecessor of `node`, or nil when `node` holds the smallest key.
    pub(crate) fn predecessor_of(&self, node: usize) -> usize {
        let left = self.node_at(node).left;
        if left != NIL {
            return self.find_maximum(left);
        }

        let mut child = node;
        let mut parent = self.node_at(node).parent;
        while parent != NIL && child == self.node_at(parent).left {
            child = parent;
            parent = self.node_at(parent).parent;
        }
        parent
    }
}

impl<K, V, C: Comparator<K>> RbTree<K, V, C> {
    /// Returns the zero-based position of `key` in key order
    ///
    /// # Returns
    ///
    /// * `Option<usize>` - The number of keys smaller than `key`, or `None` if `key`
    ///   is absent
    pub fn rank(&self, key: &K) -> Option<usize> {
        let mut current = self.root;
        let mut rank = 0;

        while current != NIL {
            let node = self.node_at(current);
            match self.comparator.compare(key, &node.key) {
                Ordering::Less => current = node.left,
                Ordering::Equal => return Some(rank + self.get_subtree_count(node.left)),
                Ordering::Greater => {
                    rank += self.get_subtree_count(node.left) + 1;
                    current = node.right;
                }
            }
        }
        None
    }
}
