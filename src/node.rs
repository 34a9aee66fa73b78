/// Sentinel index standing in for an absent node (a black nil leaf)
pub(crate) const NIL: usize = usize::MAX;

/// Red-Black tree node colors used to maintain tree balance properties.
///
/// Red-Black trees maintain balance by ensuring:
/// - Red nodes have black children
/// - All paths from a node to its nil leaves have equal black node counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    /// Red node - must have black children, cannot be adjacent to other red nodes
    Red,
    /// Black node - can have children of any color, contributes to black height
    Black,
}

/// A node in the Red-Black tree containing an entry and structural information.
///
/// Links are indices into the owning tree's slot arena, with [`NIL`] marking an
/// absent child or, for `parent`, the root.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    /// The key, fixed once the node is placed
    pub(crate) key: K,

    /// The value, overwritten in place when an equal key is inserted again
    pub(crate) value: V,

    /// Index of parent node in the slot arena (nil if this is root)
    pub(crate) parent: usize,

    /// Index of left child node in the slot arena (nil if no left child)
    pub(crate) left: usize,

    /// Index of right child node in the slot arena (nil if no right child)
    pub(crate) right: usize,

    /// Color of this node (Red or Black) used for Red-Black tree balancing
    pub(crate) color: Color,

    /// Number of nodes in the subtree rooted here, including this one
    pub(crate) subtree_count: usize,
}

impl<K, V> Node<K, V> {
    /// Creates a red leaf hanging off `parent`
    pub(crate) const fn new(key: K, value: V, parent: usize) -> Self {
        Self {
            key,
            value,
            parent,
            left: NIL,
            right: NIL,
            color: Color::Red,
            subtree_count: 1,
        }
    }
}

/// One cell of the node arena
///
/// The generation is bumped whenever the cell is vacated so that handles to the
/// previous occupant stop resolving.
#[derive(Debug, Clone)]
pub(crate) struct Slot<K, V> {
    pub(crate) generation: u32,
    pub(crate) node: Option<Node<K, V>>,
}

/// Copyable reference to a node attached to a specific [`RbTree`](crate::RbTree)
///
/// Handles stay valid while their node is in the tree, including across rotations and
/// across removals of other keys. A handle is rejected with a
/// [`TreeError`](crate::TreeError) once its node is removed, when it is presented to a
/// different tree, or after the tree is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    pub(crate) tree: usize,
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

/// A key/value pair that is not linked into any tree
///
/// Created with [`DetachedNode::new`] and attached with
/// [`RbTree::insert_node`](crate::RbTree::insert_node), which consumes it. Detaching
/// a node with [`RbTree::detach_node`](crate::RbTree::detach_node) hands the pair back
/// in this form, ready to be inserted again.
///
/// # Examples
///
/// ```
/// # use rb_ordmap::{DetachedNode, RbTree};
/// let mut tree = RbTree::new();
/// let handle = tree.insert_node(DetachedNode::new(7, "seven"));
///
/// let node = tree.detach_node(handle).unwrap();
/// assert_eq!(node.key(), &7);
/// assert!(tree.is_empty());
///
/// tree.insert_node(node);
/// assert_eq!(tree.get(&7), Some(&"seven"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DetachedNode<K, V> {
    key: K,
    value: V,
}

impl<K, V> DetachedNode<K, V> {
    /// Creates a detached node holding `key` and `value`
    ///
    /// # Arguments
    ///
    /// * `key` - The key the node will be ordered by
    /// * `value` - The value stored alongside the key
    ///
    /// # Returns
    ///
    /// * `Self` - A node with no parent and no children
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Returns the node's key
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Returns the node's value
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Returns a mutable reference to the node's value
    pub const fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Splits the node into its key and value
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for DetachedNode<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_red_leaf() {
        let node = Node::new(5, 'x', 3);
        assert_eq!(node.color, Color::Red);
        assert_eq!(node.subtree_count, 1);
        assert_eq!(node.parent, 3);
        assert_eq!(node.left, NIL);
        assert_eq!(node.right, NIL);
    }

    #[test]
    fn test_detached_node_parts() {
        let mut node = DetachedNode::new("k", 1);
        assert_eq!(node.key(), &"k");
        *node.value_mut() += 1;
        assert_eq!(node.value(), &2);
        assert_eq!(node.into_parts(), ("k", 2));
    }

    #[test]
    fn test_detached_from_pair() {
        let detached = DetachedNode::from((1u8, 2u16));
        assert_eq!(detached, DetachedNode::new(1, 2));
    }
}
