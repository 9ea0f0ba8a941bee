//! Rendering of input nodes into annotation-free diff-tree nodes.
//!
//! Used for missing/extra children, the expected side of leaf-vs-element
//! mismatches, and wrapper shells (which exclude their children so the
//! recursive wrapper result can take their place).

use crate::adapter::{NodeKind, TreeAdapter};
use crate::types::{Attribute, ContentNode, DiffNode, DiffTag, ElementNode};

pub fn node_to_diff<T: TreeAdapter>(adapter: &T, node: &T::Node, include_children: bool) -> DiffNode {
    match adapter.classify(node) {
        NodeKind::Leaf(value) => DiffNode::Content(ContentNode { value, diff: None }),
        NodeKind::Element => {
            let children = if include_children {
                adapter
                    .children(node)
                    .iter()
                    .map(|child| node_to_diff(adapter, child, true))
                    .collect()
            } else {
                Vec::new()
            };
            DiffNode::Element(ElementNode {
                name: adapter.name(node),
                attributes: plain_attributes(adapter, node),
                children,
                diff: None,
            })
        }
    }
}

/// Renders an element's name and attributes with an empty child list.
/// Caller guarantees the node is an element.
pub fn element_shell<T: TreeAdapter>(adapter: &T, node: &T::Node) -> ElementNode {
    ElementNode {
        name: adapter.name(node),
        attributes: plain_attributes(adapter, node),
        children: Vec::new(),
        diff: None,
    }
}

fn plain_attributes<T: TreeAdapter>(adapter: &T, node: &T::Node) -> Vec<Attribute> {
    adapter
        .attributes(node)
        .into_iter()
        .map(|(name, value)| Attribute {
            name,
            value: Some(value),
            diff: None,
        })
        .collect()
}

/// Attaches a diff tag to an element or content node. Wrapper nodes carry
/// no tag slot and are left unchanged.
pub fn set_diff_tag(node: &mut DiffNode, tag: DiffTag) {
    match node {
        DiffNode::Element(el) => el.diff = Some(tag),
        DiffNode::Content(content) => content.diff = Some(tag),
        DiffNode::Wrapper(_) => {}
    }
}
