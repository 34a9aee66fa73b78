use core::cmp::Ordering;

use num_traits::float::FloatCore;
use ordered_float::OrderedFloat;

/// Total order over keys, fixed for the lifetime of a tree
///
/// The comparator decides where every key lives in the tree. It is supplied once at
/// construction and used uniformly by lookup, insertion and deletion, so it must be a
/// consistent total order: antisymmetric, transitive, and stable for the same pair of
/// keys across calls.
///
/// Any closure of the shape `Fn(&K, &K) -> Ordering` is a comparator.
///
/// # Examples
///
/// ```
/// # use rb_ordmap::RbTree;
/// let mut tree: RbTree<i32, char, _> = RbTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// tree.extend([(1, 'a'), (3, 'c'), (2, 'b')]);
///
/// let keys: Vec<_> = tree.keys().copied().collect();
/// assert_eq!(keys, [3, 2, 1]);
/// ```
pub trait Comparator<K: ?Sized> {
    /// Compares `lhs` to `rhs`
    ///
    /// # Arguments
    ///
    /// * `lhs` - The key being located
    /// * `rhs` - The key stored in the tree
    ///
    /// # Returns
    ///
    /// * `Ordering` - `Less` if `lhs` sorts before `rhs`, `Greater` if after
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        lhs.cmp(rhs)
    }
}

/// Orders floating point keys totally through [`OrderedFloat`]
///
/// NaN compares equal to itself and greater than every other value, and `-0.0`
/// compares equal to `0.0`, so floats can be used as tree keys without a wrapper type.
///
/// # Examples
///
/// ```
/// # use rb_ordmap::{FloatOrder, RbTree};
/// let mut tree: RbTree<f64, &str, _> = RbTree::with_comparator(FloatOrder);
/// tree.insert(f64::NAN, "nan");
/// tree.insert(1.5, "one and a half");
/// tree.insert(f64::NEG_INFINITY, "-inf");
///
/// assert_eq!(tree.min_key(), Some(&f64::NEG_INFINITY));
/// assert!(tree.max_key().is_some_and(|k| k.is_nan()));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FloatOrder;

impl<T: FloatCore> Comparator<T> for FloatOrder {
    #[inline]
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        OrderedFloat(*lhs).cmp(&OrderedFloat(*rhs))
    }
}

/// Inverts the order of the wrapped comparator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Reverse<C>(
    /// The comparator whose order is inverted
    pub C,
);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for Reverse<C> {
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        self.0.compare(lhs, rhs).reverse()
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        self(lhs, rhs)
    }
}
