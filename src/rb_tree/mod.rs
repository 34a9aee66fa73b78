use alloc::vec::Vec;
use core::{
    cmp::Ordering,
    fmt,
    sync::atomic::{AtomicUsize, Ordering as AtomicOrdering},
};

use log::debug;

use crate::{
    Comparator, DetachedNode, NaturalOrder, NodeHandle, TreeError,
    node::{Color, NIL, Node, Slot},
};

mod insert;
mod navigate;
mod remove;
mod rotate;
mod verify;

pub use verify::TreeDump;

#[cfg(not(target_has_atomic = "ptr"))]
compile_error!("rb-ordmap stamps handles with tree ids drawn from an `AtomicUsize` counter and needs pointer-sized atomic read-modify-write support");

/// Source of the ids stamped into handles; ids are never reused within a process.
static NEXT_TREE_ID: AtomicUsize = AtomicUsize::new(0);

fn next_tree_id() -> usize {
    NEXT_TREE_ID.fetch_add(1, AtomicOrdering::Relaxed)
}

/// An ordered map backed by a Red-Black tree augmented with subtree sizes.
///
/// Lookup, insertion, deletion, minimum/maximum access and successor/predecessor
/// navigation all run in O(log n); the tree rebalances itself on every mutation.
/// Every node records the size of its subtree, which gives O(1) `len` and
/// O(log n) order statistics ([`nth`](Self::nth), [`rank`](Self::rank)).
///
/// Key features:
/// - Keys ordered by a [`Comparator`] fixed at construction ([`NaturalOrder`] by default)
/// - Arena storage: nodes live in a growable slot array and link to each other by
///   index, with vacated slots reused through a free list
/// - [`NodeHandle`]s for direct follow-up navigation or deletion without a second lookup
/// - Ascending and descending iteration, and flattening into a sorted `Vec`
///
/// Mutating the tree while iterating is prevented by the borrow checker. The tree is
/// not internally synchronized.
///
/// Every tree draws a process-unique id from a global atomic counter, so the crate
/// builds only for targets with pointer-sized atomic read-modify-write operations.
///
/// # Examples
///
/// ```
/// # use rb_ordmap::RbTree;
/// let mut tree = RbTree::new();
/// for key in [5, 3, 8, 1, 4, 7, 9] {
///     tree.insert(key, key * 10);
/// }
///
/// assert_eq!(tree.len(), 7);
/// assert_eq!(tree.get(&4), Some(&40));
/// assert!(tree.delete(&5));
///
/// let keys: Vec<_> = tree.iter_descending().map(|(k, _)| *k).collect();
/// assert_eq!(keys, [9, 8, 7, 4, 3, 1]);
/// ```
pub struct RbTree<K, V, C = NaturalOrder> {
    /// Arena of node slots addressed by the indices stored in node links
    slots: Vec<Slot<K, V>>,

    /// Stack of vacated slot indices available for reuse
    free_list: Vec<usize>,

    /// Index of the root node in the slot arena
    /// Equal to nil when tree is empty
    root: usize,

    /// Total order over keys, fixed at construction
    comparator: C,

    /// Identity stamped into every handle this tree issues
    id: usize,
}

impl<K, V> RbTree<K, V> {
    /// Creates an empty tree ordered by the keys' [`Ord`] implementation
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    /// Creates an empty tree with room for `capacity` nodes before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, NaturalOrder)
    }
}

impl<K, V, C> RbTree<K, V, C> {
    /// Creates an empty tree ordered by `comparator`
    ///
    /// # Arguments
    ///
    /// * `comparator` - The total order used for every key comparison in this tree
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_capacity_and_comparator(0, comparator)
    }

    /// Creates an empty tree ordered by `comparator` with room for `capacity` nodes
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of nodes to reserve space for
    /// * `comparator` - The total order used for every key comparison in this tree
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            root: NIL,
            comparator,
            id: next_tree_id(),
        }
    }

    /// Returns the number of entries, read from the root's subtree size
    #[inline]
    pub fn len(&self) -> usize {
        self.get_subtree_count(self.root)
    }

    /// Returns `true` if the tree holds no entries
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.root == NIL
    }

    /// Returns the number of nodes the arena can hold without reallocating
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Returns the comparator the tree was built with
    #[inline]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Removes every entry
    ///
    /// Handles issued before the call are rejected afterwards with
    /// [`TreeError::ForeignHandle`].
    pub fn clear(&mut self) {
        debug!("clearing tree {} holding {} entries", self.id, self.len());
        self.slots.clear();
        self.free_list.clear();
        self.root = NIL;
        self.id = next_tree_id();
    }

    /// Returns the key and value behind `handle`
    ///
    /// # Errors
    ///
    /// * [`TreeError`] - If the handle is foreign to this tree or its node was removed
    pub fn entry_at(&self, handle: NodeHandle) -> Result<(&K, &V), TreeError> {
        let node = self.node_at(self.resolve(handle)?);
        Ok((&node.key, &node.value))
    }

    /// Returns a mutable reference to the value behind `handle`
    ///
    /// # Errors
    ///
    /// * [`TreeError`] - If the handle is foreign to this tree or its node was removed
    pub fn value_at_mut(&mut self, handle: NodeHandle) -> Result<&mut V, TreeError> {
        let idx = self.resolve(handle)?;
        Ok(&mut self.node_at_mut(idx).value)
    }

    #[inline]
    pub(crate) const fn root_index(&self) -> usize {
        self.root
    }

    fn allocate_node(&mut self, node: Node<K, V>) -> usize {
        match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx].node = Some(node);
                idx
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        }
    }

    fn release_node(&mut self, idx: usize) -> Node<K, V> {
        let slot = &mut self.slots[idx];
        slot.generation = slot.generation.wrapping_add(1);
        match slot.node.take() {
            Some(node) => {
                self.free_list.push(idx);
                node
            }
            None => unreachable!("released vacant slot {idx}"),
        }
    }

    #[inline]
    pub(crate) fn node_at(&self, idx: usize) -> &Node<K, V> {
        match self.slots.get(idx).and_then(|slot| slot.node.as_ref()) {
            Some(node) => node,
            None => unreachable!("slot {idx} does not hold a node"),
        }
    }

    #[inline]
    fn node_at_mut(&mut self, idx: usize) -> &mut Node<K, V> {
        match self.slots.get_mut(idx).and_then(|slot| slot.node.as_mut()) {
            Some(node) => node,
            None => unreachable!("slot {idx} does not hold a node"),
        }
    }

    fn handle_of(&self, idx: usize) -> NodeHandle {
        NodeHandle {
            tree: self.id,
            index: idx,
            generation: self.slots[idx].generation,
        }
    }

    fn resolve(&self, handle: NodeHandle) -> Result<usize, TreeError> {
        if handle.tree != self.id {
            return Err(TreeError::ForeignHandle);
        }
        match self.slots.get(handle.index) {
            Some(slot) if slot.generation == handle.generation && slot.node.is_some() => {
                Ok(handle.index)
            }
            _ => Err(TreeError::StaleHandle),
        }
    }

    #[inline]
    pub(crate) fn get_subtree_count(&self, idx: usize) -> usize {
        if idx == NIL {
            0
        } else {
            self.node_at(idx).subtree_count
        }
    }

    #[inline]
    fn get_color(&self, idx: usize) -> Color {
        if idx == NIL {
            Color::Black
        } else {
            self.node_at(idx).color
        }
    }

    #[inline]
    fn set_color(&mut self, idx: usize, color: Color) {
        if idx != NIL {
            self.node_at_mut(idx).color = color;
        }
    }

    #[inline]
    fn is_red(&self, idx: usize) -> bool {
        self.get_color(idx) == Color::Red
    }

    #[inline]
    fn is_black(&self, idx: usize) -> bool {
        self.get_color(idx) == Color::Black
    }

    #[inline]
    fn get_parent(&self, idx: usize) -> usize {
        if idx == NIL {
            NIL
        } else {
            self.node_at(idx).parent
        }
    }

    #[inline]
    pub(crate) fn get_left(&self, idx: usize) -> usize {
        if idx == NIL {
            NIL
        } else {
            self.node_at(idx).left
        }
    }

    #[inline]
    pub(crate) fn get_right(&self, idx: usize) -> usize {
        if idx == NIL {
            NIL
        } else {
            self.node_at(idx).right
        }
    }
}

impl<K, V, C: Comparator<K>> RbTree<K, V, C> {
    /// Descends from the root towards `key`.
    ///
    /// Returns the node where the descent stopped together with the ordering of `key`
    /// relative to it: `Equal` for an exact match, `Less`/`Greater` when `key` would
    /// attach as that node's left/right child. `None` only for an empty tree.
    pub(crate) fn search_index(&self, key: &K) -> Option<(usize, Ordering)> {
        let mut current = self.root;
        if current == NIL {
            return None;
        }

        loop {
            let node = self.node_at(current);
            let ord = self.comparator.compare(key, &node.key);
            let next = match ord {
                Ordering::Equal => return Some((current, ord)),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
            if next == NIL {
                return Some((current, ord));
            }
            current = next;
        }
    }

    fn find_index(&self, key: &K) -> Option<usize> {
        match self.search_index(key) {
            Some((idx, Ordering::Equal)) => Some(idx),
            _ => None,
        }
    }

    /// Locates `key`, or the node it would hang off if it were inserted
    ///
    /// # Returns
    ///
    /// * `Option<(NodeHandle, Ordering)>` - The node where the search stopped and how
    ///   `key` compares to it: `Equal` means the node holds `key`, `Less` means `key`
    ///   would become its left child, `Greater` its right child. `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rb_ordmap::RbTree;
    /// # use std::cmp::Ordering;
    /// let tree: RbTree<_, _> = [(10, ()), (20, ()), (30, ())].into_iter().collect();
    ///
    /// let (at, ord) = tree.search(&20).unwrap();
    /// assert_eq!(ord, Ordering::Equal);
    /// assert_eq!(tree.entry_at(at).unwrap().0, &20);
    ///
    /// let (at, ord) = tree.search(&25).unwrap();
    /// assert_eq!(ord, Ordering::Less);
    /// assert_eq!(tree.entry_at(at).unwrap().0, &30);
    /// ```
    pub fn search(&self, key: &K) -> Option<(NodeHandle, Ordering)> {
        self.search_index(key)
            .map(|(idx, ord)| (self.handle_of(idx), ord))
    }

    /// Returns a handle to the node holding `key`
    pub fn find_node(&self, key: &K) -> Option<NodeHandle> {
        self.find_index(key).map(|idx| self.handle_of(idx))
    }

    /// Returns the value stored for `key`
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and value for `key`
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let node = self.node_at(self.find_index(key)?);
        Some((&node.key, &node.value))
    }

    /// Returns a mutable reference to the value stored for `key`
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.find_index(key)?;
        Some(&mut self.node_at_mut(idx).value)
    }

    /// Returns `true` if the tree holds an entry for `key`
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_index(key).is_some()
    }

    /// Inserts `value` under `key`
    ///
    /// If an equal key is already present its value is overwritten in place; the
    /// stored key, the tree's shape, colors and sizes are left untouched.
    ///
    /// # Returns
    ///
    /// * `Option<V>` - The previous value for `key`, or `None` if the key was new
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.search_index(&key) {
            Some((idx, Ordering::Equal)) => {
                Some(core::mem::replace(&mut self.node_at_mut(idx).value, value))
            }
            probe => {
                self.attach(key, value, probe);
                None
            }
        }
    }

    /// Attaches a detached node and returns a handle to it
    ///
    /// When an equal key is already present, the existing node keeps its key and takes
    /// the new value, and the returned handle refers to that existing node.
    pub fn insert_node(&mut self, node: DetachedNode<K, V>) -> NodeHandle {
        let (key, value) = node.into_parts();
        let idx = match self.search_index(&key) {
            Some((idx, Ordering::Equal)) => {
                self.node_at_mut(idx).value = value;
                idx
            }
            probe => self.attach(key, value, probe),
        };
        self.handle_of(idx)
    }

    /// Removes `key` and returns its value
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key` and returns the stored key and value
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let idx = self.find_index(key)?;
        let node = self.delete_at(idx);
        Some((node.key, node.value))
    }

    /// Removes `key`, reporting whether an entry was present
    ///
    /// Deleting an absent key leaves the tree untouched.
    pub fn delete(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    /// Removes the node behind `handle`
    ///
    /// # Errors
    ///
    /// * [`TreeError`] - If the handle is foreign to this tree or its node was already
    ///   removed; the tree is not modified
    pub fn delete_node(&mut self, handle: NodeHandle) -> Result<(), TreeError> {
        self.detach_node(handle).map(drop)
    }

    /// Removes the node behind `handle` and hands its entry back as a detached node
    ///
    /// # Errors
    ///
    /// * [`TreeError`] - If the handle is foreign to this tree or its node was already
    ///   removed; the tree is not modified
    pub fn detach_node(&mut self, handle: NodeHandle) -> Result<DetachedNode<K, V>, TreeError> {
        let idx = self.resolve(handle)?;
        let node = self.delete_at(idx);
        Ok(DetachedNode::new(node.key, node.value))
    }
}

impl<K, V, C: Default> Default for RbTree<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RbTree<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            free_list: self.free_list.clone(),
            root: self.root,
            comparator: self.comparator.clone(),
            id: next_tree_id(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RbTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RbTree<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for RbTree<K, V, C> {}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for RbTree<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for RbTree<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}
