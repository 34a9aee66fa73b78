use core::fmt;

/// Errors reported when a [`NodeHandle`](crate::NodeHandle) cannot be used with a tree
///
/// A failing call never mutates the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeError {
    /// The handle was issued by a different tree, or by this tree before it was cleared
    ForeignHandle,
    /// The node behind the handle has already been removed
    StaleHandle,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignHandle => f.write_str("node handle does not belong to this tree"),
            Self::StaleHandle => f.write_str("node handle refers to a removed node"),
        }
    }
}

impl core::error::Error for TreeError {}

/// Structural defects detected by [`RbTree::validate`](crate::RbTree::validate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantViolation {
    /// The root node is red
    RedRoot,
    /// A red node has a red child
    RedRedEdge,
    /// Two paths from the same node reach nil through a different number of black nodes
    BlackHeightMismatch,
    /// A key is out of order with respect to an ancestor under the tree's comparator
    OrderViolation,
    /// A node's stored subtree size differs from one plus its children's sizes
    SizeMismatch,
    /// A child's parent link does not point back at its parent
    BrokenParentLink,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::RedRoot => "root node is red",
            Self::RedRedEdge => "red node has a red child",
            Self::BlackHeightMismatch => "black height differs between paths",
            Self::OrderViolation => "keys are out of order",
            Self::SizeMismatch => "subtree size does not match its children",
            Self::BrokenParentLink => "parent link does not match child link",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for InvariantViolation {}
