use crate::node::{ContainerNode, EditorNode, TextNode};

/// Visitor pattern for traversing document nodes immutably
///
/// Default implementations walk the entire tree in pre-order.
/// Override specific visit_* methods to act on particular node kinds.
pub trait Visitor: Sized {
    fn visit_node(&mut self, node: &EditorNode) {
        walk_node(self, node);
    }

    fn visit_container(&mut self, container: &ContainerNode) {
        walk_container(self, container);
    }

    fn visit_text(&mut self, text: &TextNode) {
        walk_text(self, text);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &EditorNode) {
    match node {
        EditorNode::Container(container) => visitor.visit_container(container),
        EditorNode::Text(text) => visitor.visit_text(text),
    }
}

pub fn walk_container<V: Visitor>(visitor: &mut V, container: &ContainerNode) {
    for child in &container.children {
        visitor.visit_node(child);
    }
}

pub fn walk_text<V: Visitor>(visitor: &mut V, text: &TextNode) {
    // Inline runs
    for child in &text.children {
        visitor.visit_node(child);
    }
}
