//! Weighted structural diff and containment search for HTML-like trees.
//!
//! Compares an "actual" tree against an "expected" tree (each node either
//! a leaf value or a named element with attributes and ordered children)
//! and produces a numeric dissimilarity weight plus an annotated tree
//! describing exactly where and how the trees differ. Single-child
//! pass-through elements are recognized as elidable "wrappers" whenever
//! treating them that way yields a cheaper diff. [`contains`] searches the
//! actual tree for the best-matching subtree instead of diffing the roots.
//!
//! Trees are read through the [`TreeAdapter`] trait, so the engine works
//! against any representation; [`simple`] provides a ready-made one.
//! Expected values may be deferred [`Assertion`]s; if one needs to await a
//! pending computation, the whole diff transparently switches to an
//! asynchronous evaluation mode and the entry points return
//! [`Eventual::Deferred`].

pub mod adapter;
pub mod align;
mod async_diff;
mod common;
mod contains;
mod diff;
pub mod error;
pub mod options;
mod render;
pub mod simple;
mod sync_diff;
pub mod types;
pub mod weight;

pub use adapter::{NodeKind, TreeAdapter};
pub use contains::contains;
pub use diff::{diff_elements, Eventual};
pub use error::{DiffError, Result};
pub use options::{DiffOptions, WeightTable};
pub use types::{
    default_equal, Assertion, AssertionError, AssertionOutcome, AssertionSubject, Attribute,
    AttributeDiff, ContainsMatch, ContainsResult, ContentNode, DiffNode, DiffReport, DiffTag,
    ElementNode, Value, ValueEq, WrapperNode,
};
pub use weight::Weight;
