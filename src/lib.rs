#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]
#![allow(clippy::len_without_is_empty)]

#[macro_use]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod traits;
pub use traits::{Comparator, FloatOrder, NaturalOrder, Reverse};

mod error;
pub use error::{InvariantViolation, TreeError};

mod node;
pub use node::{DetachedNode, NodeHandle};

mod rb_tree;
pub use rb_tree::{RbTree, TreeDump};

mod iter;
pub use iter::Iter;
