//! # Editor Actions
//!
//! The closed vocabulary of edits the reducer accepts.
//!
//! Actions are plain data and serialize to JSON tagged by `type`, so a host
//! can send them over any boundary:
//!
//! ```json
//! { "type": "insertNode", "node": { ... }, "anchorId": "p-1", "position": "after" }
//! ```

use crate::errors::{EditorResult, StructuralViolation};
use crate::inline_formatting::{Format, FormatMode};
use crate::tree_ops::InsertPosition;
use mina_model::{Attributes, EditorNode, Formats, NodeId, NodeType, Styles};
use serde::{Deserialize, Serialize};

/// Partial update of a single node. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Formats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Styles>,
}

impl NodePatch {
    pub fn node_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn formats(mut self, formats: Formats) -> Self {
        self.formats = Some(formats);
        self
    }

    pub fn styles(mut self, styles: Styles) -> Self {
        self.styles = Some(styles);
        self
    }

    /// Apply to a node in place. Text-only fields on a container, or a
    /// type change across kinds, are rejected.
    pub fn apply(&self, node: &mut EditorNode) -> EditorResult<()> {
        if let Some(node_type) = self.node_type {
            if node_type.is_container() != node.is_container() {
                return Err(StructuralViolation::KindMismatch {
                    id: node.id().to_string(),
                    node_type,
                }
                .into());
            }
            match node {
                EditorNode::Container(container) => container.node_type = node_type,
                EditorNode::Text(text) => text.node_type = node_type,
            }
        }

        if let Some(attributes) = &self.attributes {
            *node.attributes_mut() = attributes.clone();
        }

        let text_fields = self.content.is_some() || self.formats.is_some() || self.styles.is_some();
        if !text_fields {
            return Ok(());
        }

        let id = node.id().to_string();
        let text = node
            .as_text_mut()
            .ok_or(StructuralViolation::NotTextLeaf { id })?;

        if let Some(content) = &self.content {
            text.content = content.clone();
            text.children.clear();
        }
        if let Some(formats) = self.formats {
            text.formats = formats;
        }
        if let Some(styles) = &self.styles {
            text.styles = styles.clone();
        }

        Ok(())
    }
}

fn default_merge() -> bool {
    true
}

/// Editing actions understood by [`crate::reduce`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorAction {
    /// Patch type/content/attributes/formats/styles of one node
    UpdateNode { id: NodeId, patch: NodePatch },

    /// Merge into (default) or replace the attribute map
    UpdateAttributes {
        id: NodeId,
        attributes: Attributes,
        #[serde(default = "default_merge")]
        merge: bool,
    },

    /// Replace a text node's content, dropping any inline runs
    UpdateContent { id: NodeId, content: String },

    DeleteNode { id: NodeId },

    #[serde(rename_all = "camelCase")]
    InsertNode {
        node: EditorNode,
        anchor_id: NodeId,
        position: InsertPosition,
    },

    #[serde(rename_all = "camelCase")]
    MoveNode {
        id: NodeId,
        anchor_id: NodeId,
        position: InsertPosition,
    },

    /// Clone a subtree and place the copy right after the original
    #[serde(rename_all = "camelCase")]
    DuplicateNode {
        id: NodeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_id: Option<NodeId>,
    },

    /// Swap the whole tree
    ReplaceContainer { container: EditorNode },

    /// Back to the initial tree
    Reset,

    /// Applied in order as one step; any failure rejects all of them
    Batch { actions: Vec<EditorAction> },

    /// Range formatting inside a text block (or one of its runs)
    FormatText {
        id: NodeId,
        start: usize,
        end: usize,
        format: Format,
        mode: FormatMode,
    },

    /// Point the selection at a node, or clear it
    SetActiveNode { id: Option<NodeId> },
}

impl EditorAction {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            EditorAction::UpdateNode { .. } => "updateNode",
            EditorAction::UpdateAttributes { .. } => "updateAttributes",
            EditorAction::UpdateContent { .. } => "updateContent",
            EditorAction::DeleteNode { .. } => "deleteNode",
            EditorAction::InsertNode { .. } => "insertNode",
            EditorAction::MoveNode { .. } => "moveNode",
            EditorAction::DuplicateNode { .. } => "duplicateNode",
            EditorAction::ReplaceContainer { .. } => "replaceContainer",
            EditorAction::Reset => "reset",
            EditorAction::Batch { .. } => "batch",
            EditorAction::FormatText { .. } => "formatText",
            EditorAction::SetActiveNode { .. } => "setActiveNode",
        }
    }

    /// Whether the action can change the tree (and so the history)
    pub fn is_mutation(&self) -> bool {
        match self {
            EditorAction::SetActiveNode { .. } => false,
            EditorAction::Batch { actions } => actions.iter().any(EditorAction::is_mutation),
            _ => true,
        }
    }

    pub fn update_node(id: impl Into<NodeId>, patch: NodePatch) -> Self {
        EditorAction::UpdateNode { id: id.into(), patch }
    }

    pub fn update_attributes(id: impl Into<NodeId>, attributes: Attributes, merge: bool) -> Self {
        EditorAction::UpdateAttributes {
            id: id.into(),
            attributes,
            merge,
        }
    }

    pub fn update_content(id: impl Into<NodeId>, content: impl Into<String>) -> Self {
        EditorAction::UpdateContent {
            id: id.into(),
            content: content.into(),
        }
    }

    pub fn delete_node(id: impl Into<NodeId>) -> Self {
        EditorAction::DeleteNode { id: id.into() }
    }

    pub fn insert_node(node: impl Into<EditorNode>, anchor_id: impl Into<NodeId>, position: InsertPosition) -> Self {
        EditorAction::InsertNode {
            node: node.into(),
            anchor_id: anchor_id.into(),
            position,
        }
    }

    pub fn move_node(id: impl Into<NodeId>, anchor_id: impl Into<NodeId>, position: InsertPosition) -> Self {
        EditorAction::MoveNode {
            id: id.into(),
            anchor_id: anchor_id.into(),
            position,
        }
    }

    pub fn duplicate_node(id: impl Into<NodeId>) -> Self {
        EditorAction::DuplicateNode {
            id: id.into(),
            new_id: None,
        }
    }

    pub fn replace_container(container: impl Into<EditorNode>) -> Self {
        EditorAction::ReplaceContainer {
            container: container.into(),
        }
    }

    pub fn batch(actions: Vec<EditorAction>) -> Self {
        EditorAction::Batch { actions }
    }

    pub fn format_text(id: impl Into<NodeId>, start: usize, end: usize, format: Format, mode: FormatMode) -> Self {
        EditorAction::FormatText {
            id: id.into(),
            start,
            end,
            format,
            mode,
        }
    }

    pub fn set_active_node(id: Option<NodeId>) -> Self {
        EditorAction::SetActiveNode { id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mina_model::TextNode;
    use serde_json::json;

    #[test]
    fn test_action_json_shape() {
        let action = EditorAction::insert_node(
            TextNode::new("p1", NodeType::P, "hi"),
            "p0",
            InsertPosition::After,
        );
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["type"], "insertNode");
        assert_eq!(value["anchorId"], "p0");
        assert_eq!(value["position"], "after");
        assert_eq!(value["node"]["kind"], "text");

        let back: EditorAction = serde_json::from_value(value).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn test_action_from_host_json() {
        let action: EditorAction = serde_json::from_value(json!({
            "type": "formatText",
            "id": "p1",
            "start": 0,
            "end": 4,
            "format": { "kind": "style", "key": "color", "value": "red" },
            "mode": "toggle"
        }))
        .unwrap();
        assert_eq!(action.name(), "formatText");

        let action: EditorAction = serde_json::from_value(json!({
            "type": "updateAttributes",
            "id": "img1",
            "attributes": { "src": "/a.png" }
        }))
        .unwrap();
        assert!(matches!(action, EditorAction::UpdateAttributes { merge: true, .. }));

        let action: EditorAction = serde_json::from_value(json!({ "type": "reset" })).unwrap();
        assert_eq!(action, EditorAction::Reset);
    }

    #[test]
    fn test_patch_rejects_text_fields_on_container() {
        let mut node = EditorNode::root("root");
        let err = NodePatch::default().content("x").apply(&mut node).unwrap_err();
        assert!(err.is_structural());

        let err = NodePatch::default().node_type(NodeType::P).apply(&mut node).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_patch_changes_heading_level() {
        let mut node: EditorNode = TextNode::new("h", NodeType::H1, "Title").into();
        NodePatch::default()
            .node_type(NodeType::H2)
            .formats(Formats::bold())
            .apply(&mut node)
            .unwrap();
        assert_eq!(node.node_type(), NodeType::H2);
        assert!(node.as_text().unwrap().formats.bold);
    }

    #[test]
    fn test_set_active_is_not_a_mutation() {
        assert!(!EditorAction::set_active_node(None).is_mutation());
        assert!(EditorAction::delete_node("x").is_mutation());
        assert!(!EditorAction::batch(vec![EditorAction::set_active_node(None)]).is_mutation());
    }
}
