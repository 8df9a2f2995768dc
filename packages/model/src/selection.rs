//! Selection model: host-reported carets/ranges mapped onto node identity,
//! and the formatting they imply.

use crate::node::{Formats, NodeId, NodeType, Styles};
use serde::{Deserialize, Serialize};

/// Caret or range inside one node, in character offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub node_id: NodeId,
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn caret(node_id: impl Into<NodeId>, offset: usize) -> Self {
        Self {
            node_id: node_id.into(),
            start: offset,
            end: offset,
        }
    }

    pub fn range(node_id: impl Into<NodeId>, start: usize, end: usize) -> Self {
        Self {
            node_id: node_id.into(),
            start,
            end,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Effective formatting at the current caret/range. Derived, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionInfo {
    pub element_type: Option<NodeType>,
    pub formats: Formats,
    pub styles: Option<Styles>,
}
