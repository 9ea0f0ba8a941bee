//! A self-contained `{name, attributes, children}` tree and its adapter.
//!
//! Used by the crate's own tests, and handy for callers that want to diff
//! against an expected pattern without bringing their own DOM.

use crate::adapter::{NodeKind, TreeAdapter};
use crate::types::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum SimpleNode {
    Text(Value),
    Element(SimpleElement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleElement {
    pub name: String,
    pub attributes: Vec<(String, Value)>,
    pub children: Vec<SimpleNode>,
}

/// Builds a leaf node.
pub fn text(value: impl Into<Value>) -> SimpleNode {
    SimpleNode::Text(value.into())
}

/// Builds an element node; extend it with [`SimpleNode::attr`] and
/// [`SimpleNode::child`].
pub fn element(name: &str) -> SimpleNode {
    SimpleNode::Element(SimpleElement {
        name: name.to_string(),
        attributes: Vec::new(),
        children: Vec::new(),
    })
}

impl SimpleNode {
    /// Appends an attribute. No effect on text nodes.
    pub fn attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        if let SimpleNode::Element(el) = &mut self {
            el.attributes.push((name.to_string(), value.into()));
        }
        self
    }

    /// Appends a child. No effect on text nodes.
    pub fn child(mut self, child: SimpleNode) -> Self {
        if let SimpleNode::Element(el) = &mut self {
            el.children.push(child);
        }
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = SimpleNode>) -> Self {
        if let SimpleNode::Element(el) = &mut self {
            el.children.extend(children);
        }
        self
    }
}

/// Adapter over [`SimpleNode`]. Its class attribute is `"class"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleAdapter;

impl TreeAdapter for SimpleAdapter {
    type Node = SimpleNode;

    fn classify(&self, node: &Self::Node) -> NodeKind {
        match node {
            SimpleNode::Text(value) => NodeKind::Leaf(value.clone()),
            SimpleNode::Element(_) => NodeKind::Element,
        }
    }

    fn name(&self, node: &Self::Node) -> String {
        match node {
            SimpleNode::Element(el) => el.name.clone(),
            SimpleNode::Text(_) => String::new(),
        }
    }

    fn attributes(&self, node: &Self::Node) -> Vec<(String, Value)> {
        match node {
            SimpleNode::Element(el) => el.attributes.clone(),
            SimpleNode::Text(_) => Vec::new(),
        }
    }

    fn children(&self, node: &Self::Node) -> Vec<Self::Node> {
        match node {
            SimpleNode::Element(el) => el.children.clone(),
            SimpleNode::Text(_) => Vec::new(),
        }
    }

    fn class_attribute_name(&self) -> Option<&str> {
        Some("class")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_produces_expected_shape() {
        let node = element("div")
            .attr("id", "foo")
            .child(text("abc"))
            .child(element("span"));

        let adapter = SimpleAdapter;
        assert_eq!(adapter.classify(&node), NodeKind::Element);
        assert_eq!(adapter.name(&node), "div");
        assert_eq!(
            adapter.attributes(&node),
            vec![("id".to_string(), Value::from("foo"))]
        );
        assert_eq!(adapter.children(&node).len(), 2);
    }

    #[test]
    fn text_nodes_classify_as_leaves() {
        let adapter = SimpleAdapter;
        assert_eq!(
            adapter.classify(&text("abc")),
            NodeKind::Leaf(Value::from("abc"))
        );
    }
}
