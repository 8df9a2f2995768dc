//! Structural validation for document trees

use crate::errors::StructuralViolation;
use mina_model::{
    accepts_children, can_contain, kind_matches_type, walk_container, walk_text, ContainerNode,
    EditorNode, NodeRef, NodeType, TextNode, Visitor,
};
use std::collections::HashSet;

/// Validate a whole document: the root must be a `container` and every
/// node below it must satisfy the schema.
pub fn validate_tree(tree: &EditorNode) -> Vec<StructuralViolation> {
    let mut validator = TreeValidator::default();

    if tree.node_type() != NodeType::Container || !tree.is_container() {
        validator.violations.push(StructuralViolation::RootNotContainer {
            id: tree.id().to_string(),
            node_type: tree.node_type(),
        });
    }

    validator.visit_node(tree);
    validator.violations
}

/// Validate a detached subtree (no root requirement)
pub fn validate_subtree(node: &EditorNode) -> Vec<StructuralViolation> {
    let mut validator = TreeValidator::default();
    validator.visit_node(node);
    validator.violations
}

pub fn is_valid(tree: &EditorNode) -> bool {
    validate_tree(tree).is_empty()
}

#[derive(Default)]
struct TreeValidator {
    seen: HashSet<String>,
    violations: Vec<StructuralViolation>,
}

impl TreeValidator {
    fn check_node(&mut self, node: &EditorNode) {
        if !self.seen.insert(node.id().to_string()) {
            self.violations.push(StructuralViolation::DuplicateId {
                id: node.id().to_string(),
            });
        }

        if !kind_matches_type(node) {
            self.violations.push(StructuralViolation::KindMismatch {
                id: node.id().to_string(),
                node_type: node.node_type(),
            });
        }

        self.check_children(node, node.children());
    }

    fn check_children(&mut self, parent: &EditorNode, children: &[NodeRef]) {
        if children.is_empty() {
            return;
        }

        if !accepts_children(parent.node_type()) {
            self.violations.push(StructuralViolation::LeafWithChildren {
                id: parent.id().to_string(),
                node_type: parent.node_type(),
            });
            return;
        }

        for child in children {
            if !can_contain(parent, child) {
                self.violations.push(StructuralViolation::IllegalChild {
                    parent_id: parent.id().to_string(),
                    parent_type: parent.node_type(),
                    child_id: child.id().to_string(),
                    child_type: child.node_type(),
                });
            }
        }
    }
}

impl Visitor for TreeValidator {
    fn visit_node(&mut self, node: &EditorNode) {
        self.check_node(node);
        match node {
            EditorNode::Container(container) => self.visit_container(container),
            EditorNode::Text(text) => self.visit_text(text),
        }
    }

    fn visit_container(&mut self, container: &ContainerNode) {
        walk_container(self, container);
    }

    fn visit_text(&mut self, text: &TextNode) {
        walk_text(self, text);
    }
}
