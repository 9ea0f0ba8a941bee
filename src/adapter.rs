//! The adapter boundary: how the engine reads a caller's tree
//! representation without owning it.

use crate::types::Value;

/// Leaf-vs-element classification, decided once per node at the adapter
/// boundary. Everything downstream pattern-matches on this instead of
/// re-probing the node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// An indivisible comparable value with no name, attributes or children.
    Leaf(Value),
    /// A named node with attributes and ordered children.
    Element,
}

/// Read access to one concrete tree representation.
///
/// Two adapters are supplied per call (one for the actual tree, one for the
/// expected tree) and their node types may differ. `Node` is expected to be
/// a cheap handle (a reference, `Rc`, or arena index); `children` returns
/// owned handles so the engine can hold them across recursion.
///
/// The engine assumes well-formed adapters: it does not defensively validate
/// that `name` or `attributes` are only called on nodes classified as
/// elements.
pub trait TreeAdapter {
    type Node: Clone;

    fn classify(&self, node: &Self::Node) -> NodeKind;

    fn name(&self, node: &Self::Node) -> String;

    /// Attributes in insertion order. Order matters for output, not for
    /// comparison.
    fn attributes(&self, node: &Self::Node) -> Vec<(String, Value)>;

    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Name of the attribute holding a space-separated class list, if the
    /// representation has one. Enables token-set class comparison.
    fn class_attribute_name(&self) -> Option<&str> {
        None
    }
}
