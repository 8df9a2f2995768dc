//! Error types for the editor

use mina_model::{NodeId, NodeType};
use thiserror::Error;

/// Result type for tree operations and the reducer
pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Node not found: {0}")]
    NotFound(NodeId),

    #[error("Structural violation: {0}")]
    StructuralViolation(#[from] StructuralViolation),

    #[error("Invalid range {start}..{end} for text of length {len}")]
    Range { start: usize, end: usize, len: usize },

    #[error("Parse error: {0}")]
    Parse(#[from] mina_parser::ParseError),
}

impl EditorError {
    pub fn not_found(id: impl Into<NodeId>) -> Self {
        EditorError::NotFound(id.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, EditorError::NotFound(_))
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, EditorError::StructuralViolation(_))
    }
}

/// Ways an edit (or a tree) can break parent/child legality
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralViolation {
    #[error("duplicate node id '{id}'")]
    DuplicateId { id: NodeId },

    #[error("node '{id}' of type {node_type} cannot hold children")]
    LeafWithChildren { id: NodeId, node_type: NodeType },

    #[error("{child_type} '{child_id}' is not allowed inside {parent_type} '{parent_id}'")]
    IllegalChild {
        parent_id: NodeId,
        parent_type: NodeType,
        child_id: NodeId,
        child_type: NodeType,
    },

    #[error("node '{id}' has type {node_type} which does not match its kind")]
    KindMismatch { id: NodeId, node_type: NodeType },

    #[error("root '{id}' must be a container, found {node_type}")]
    RootNotContainer { id: NodeId, node_type: NodeType },

    #[error("cannot {operation} the root node")]
    RootOperation { operation: &'static str },

    #[error("moving '{id}' relative to '{anchor_id}' would create a cycle")]
    Cycle { id: NodeId, anchor_id: NodeId },

    #[error("node '{id}' is not a text leaf")]
    NotTextLeaf { id: NodeId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EditorError::from(StructuralViolation::Cycle {
            id: "list1".to_string(),
            anchor_id: "li1".to_string(),
        });
        assert!(err.is_structural());
        assert_eq!(
            err.to_string(),
            "Structural violation: moving 'list1' relative to 'li1' would create a cycle"
        );

        let err = EditorError::not_found("p9");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Node not found: p9");
    }

    #[test]
    fn test_illegal_child_message() {
        let violation = StructuralViolation::IllegalChild {
            parent_id: "root".to_string(),
            parent_type: NodeType::Container,
            child_id: "li".to_string(),
            child_type: NodeType::Li,
        };
        assert_eq!(
            violation.to_string(),
            "li 'li' is not allowed inside container 'root'"
        );
    }
}
