use crate::actions::EditorAction;
use crate::config::EditorConfig;
use crate::errors::EditorResult;
use crate::history::{self, History};
use crate::inline_formatting::get_formatting_at_position;
use crate::reducer::reduce;
use crate::tree_ops::{contains_node, find_node_by_id, traverse_tree, InsertPosition};
use crate::validator::validate_tree;
use mina_model::{
    builders, ContainerNode, EditorNode, IdGenerator, NodeId, NodeRef, NodeType, Selection,
    SelectionInfo,
};
use mina_parser::parse_markdown_table;
use std::sync::Arc;

/// Everything the reducer reads and writes.
///
/// Cloning is cheap: the tree and every history snapshot are shared.
#[derive(Debug, Clone)]
pub struct EditorState {
    /// Current root, always a `container`
    pub container: NodeRef,
    pub active_node_id: Option<NodeId>,
    pub history: History,
    /// Tree restored by `Reset`
    pub initial: NodeRef,
    /// Source of fresh ids for clones and parsed content
    pub ids: IdGenerator,
    /// Bumped by every accepted mutation, undo and redo
    pub version: u64,
}

impl EditorState {
    pub fn new(container: EditorNode) -> EditorResult<Self> {
        Self::with_config(container, &EditorConfig::default())
    }

    /// Start editing `container`. The tree must already be valid.
    pub fn with_config(container: EditorNode, config: &EditorConfig) -> EditorResult<Self> {
        if let Some(violation) = validate_tree(&container).into_iter().next() {
            return Err(violation.into());
        }

        let mut ids = match &config.id_seed {
            Some(seed) => IdGenerator::from_seed(seed.clone()),
            None => IdGenerator::for_document(container.id()),
        };
        ids.skip_past(traverse_tree(&container).map(EditorNode::id));
        let active_node_id = config
            .initial_active_node
            .clone()
            .filter(|id| contains_node(&container, id));

        let container = Arc::new(container);
        Ok(Self {
            initial: Arc::clone(&container),
            container,
            active_node_id,
            history: History::with_max_levels(config.history_limit),
            ids,
            version: 0,
        })
    }

    /// Apply an action in place. On error the state is left as it was.
    pub fn dispatch(&mut self, action: &EditorAction) -> EditorResult<()> {
        *self = reduce(self, action)?;
        Ok(())
    }

    /// Returns false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        match history::undo(self) {
            Some(previous) => {
                *self = previous;
                true
            }
            None => false,
        }
    }

    /// Returns false when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        match history::redo(self) {
            Some(next) => {
                *self = next;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn find_node(&self, id: &str) -> Option<&EditorNode> {
        find_node_by_id(&self.container, id)
    }

    pub fn active_node(&self) -> Option<&EditorNode> {
        self.active_node_id.as_deref().and_then(|id| self.find_node(id))
    }

    /// Effective formatting for a host selection. A range reports the
    /// formatting of its first character, whichever end the host
    /// reports first.
    pub fn selection_info(&self, selection: &Selection) -> EditorResult<SelectionInfo> {
        let start = selection.start.min(selection.end);
        let offset = if selection.is_collapsed() {
            start
        } else {
            start.saturating_add(1)
        };
        get_formatting_at_position(&self.container, &selection.node_id, offset)
    }

    /// Parse a markdown table and insert it as one undo step. Returns the
    /// table's id.
    pub fn insert_markdown_table(
        &mut self,
        markdown: &str,
        anchor_id: &str,
        position: InsertPosition,
    ) -> EditorResult<NodeId> {
        let mut ids = self.ids.clone();
        ids.skip_past(traverse_tree(&self.container).map(EditorNode::id));
        let table = parse_markdown_table(markdown, &mut ids)?;
        let table_id = table.id().to_string();

        let mut next = reduce(self, &EditorAction::insert_node(table, anchor_id, position))?;
        next.ids = ids;
        *self = next;
        Ok(table_id)
    }

    /// JSON projection of the current tree
    pub fn to_json(&self) -> serde_json::Value {
        self.container.to_json()
    }
}

impl Default for EditorState {
    fn default() -> Self {
        create_initial_state()
    }
}

/// A `root` container holding one empty paragraph
pub fn create_initial_state() -> EditorState {
    let mut ids = IdGenerator::for_document("root");
    let paragraph = builders::paragraph(&mut ids, "");
    let container: NodeRef = Arc::new(
        ContainerNode::new("root", NodeType::Container, vec![paragraph]).into(),
    );

    EditorState {
        initial: Arc::clone(&container),
        container,
        active_node_id: None,
        history: History::new(),
        ids,
        version: 0,
    }
}
