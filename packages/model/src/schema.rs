//! Parent/child legality rules for the document tree.

use crate::node::{EditorNode, NodeType};

/// Block-level types a plain `container` may hold
const BLOCKS: &[NodeType] = &[
    NodeType::Container,
    NodeType::P,
    NodeType::H1,
    NodeType::H2,
    NodeType::H3,
    NodeType::H4,
    NodeType::H5,
    NodeType::H6,
    NodeType::Code,
    NodeType::Blockquote,
    NodeType::Ul,
    NodeType::Ol,
    NodeType::Br,
    NodeType::Img,
    NodeType::Table,
];

/// Child types a node of `parent` type may hold
pub fn allowed_children(parent: NodeType) -> &'static [NodeType] {
    match parent {
        NodeType::Container => BLOCKS,
        NodeType::Ul | NodeType::Ol => &[NodeType::Li, NodeType::Ul, NodeType::Ol],
        NodeType::Table => &[NodeType::Thead, NodeType::Tbody, NodeType::Tr],
        NodeType::Thead | NodeType::Tbody => &[NodeType::Tr],
        NodeType::Tr => &[NodeType::Th, NodeType::Td],
        NodeType::P
        | NodeType::H1
        | NodeType::H2
        | NodeType::H3
        | NodeType::H4
        | NodeType::H5
        | NodeType::H6
        | NodeType::Code
        | NodeType::Blockquote
        | NodeType::Li
        | NodeType::Th
        | NodeType::Td => &[NodeType::Span, NodeType::Link, NodeType::Br],
        NodeType::Span | NodeType::Link | NodeType::Br | NodeType::Img => &[],
    }
}

pub fn accepts_children(node_type: NodeType) -> bool {
    !allowed_children(node_type).is_empty()
}

pub fn can_contain_type(parent: NodeType, child: NodeType) -> bool {
    allowed_children(parent).contains(&child)
}

/// Whether `child` may legally sit directly under `parent`.
///
/// Containers only hold structural types; text blocks only hold inline
/// text runs, so the node kind has to agree with the type as well.
pub fn can_contain(parent: &EditorNode, child: &EditorNode) -> bool {
    if !can_contain_type(parent.node_type(), child.node_type()) {
        return false;
    }
    match parent {
        EditorNode::Container(_) => true,
        EditorNode::Text(_) => child.is_text() && child.children().is_empty(),
    }
}

/// Whether the node kind (container/text) agrees with its type
pub fn kind_matches_type(node: &EditorNode) -> bool {
    match node {
        EditorNode::Container(c) => c.node_type.is_container(),
        EditorNode::Text(t) => !t.node_type.is_container(),
    }
}
