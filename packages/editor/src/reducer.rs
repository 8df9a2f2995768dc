//! # Editor Reducer
//!
//! `reduce(state, action)` is a pure state transition:
//!
//! 1. Apply the action to a working copy of the tree
//! 2. Validate the resulting tree against the schema
//! 3. Record the prior root in history and bump the version
//!
//! A rejected action returns the error and the caller keeps the old state.
//! An action that leaves the root pointer unchanged records nothing.
//!
//! `Batch` applies its actions in order to the same working copy and is
//! recorded as a single history step; the first failure rejects the lot.

use crate::actions::EditorAction;
use crate::errors::{EditorError, EditorResult, StructuralViolation};
use crate::inline_formatting::{format_text_range, run_offset, Format, FormatMode};
use crate::state::EditorState;
use crate::tree_ops::{
    contains_node, delete_node_by_id, duplicate_node, find_node_by_id, find_parent_by_id,
    insert_node, move_node, traverse_tree, update_node_by_id,
};
use crate::validator::validate_tree;
use mina_model::{EditorNode, IdGenerator, NodeId, NodeRef, NodeType};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Working copy an action is applied to
struct Draft<'a> {
    container: NodeRef,
    active_node_id: Option<NodeId>,
    ids: IdGenerator,
    initial: &'a NodeRef,
}

#[instrument(level = "debug", skip_all, fields(action = action.name(), version = state.version))]
pub fn reduce(state: &EditorState, action: &EditorAction) -> EditorResult<EditorState> {
    let mut draft = Draft {
        container: Arc::clone(&state.container),
        active_node_id: state.active_node_id.clone(),
        ids: state.ids.clone(),
        initial: &state.initial,
    };

    if let Err(error) = apply_action(&mut draft, action) {
        warn!(action = action.name(), %error, "Rejected action");
        return Err(error);
    }

    let changed = !Arc::ptr_eq(&draft.container, &state.container);
    if changed {
        if let Some(violation) = validate_tree(&draft.container).into_iter().next() {
            warn!(action = action.name(), %violation, "Rejected action: invalid tree");
            return Err(violation.into());
        }
    }

    let mut next = state.clone();
    next.active_node_id = draft
        .active_node_id
        .filter(|id| contains_node(&draft.container, id));

    if changed {
        next.history.record(Arc::clone(&state.container));
        next.container = draft.container;
        next.ids = draft.ids;
        next.version += 1;

        debug!(
            action = action.name(),
            version = next.version,
            undo_levels = next.history.undo_levels(),
            "Applied action"
        );
    }

    Ok(next)
}

fn apply_action(draft: &mut Draft<'_>, action: &EditorAction) -> EditorResult<()> {
    match action {
        EditorAction::UpdateNode { id, patch } => {
            draft.container = update_node_by_id(&draft.container, id, |node| patch.apply(node))?;
        }

        EditorAction::UpdateAttributes {
            id,
            attributes,
            merge,
        } => {
            draft.container = update_node_by_id(&draft.container, id, |node| {
                let target = node.attributes_mut();
                if *merge {
                    target.extend(attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
                } else {
                    *target = attributes.clone();
                }
                Ok(())
            })?;
        }

        EditorAction::UpdateContent { id, content } => {
            draft.container = update_node_by_id(&draft.container, id, |node| {
                let text = node
                    .as_text_mut()
                    .ok_or_else(|| StructuralViolation::NotTextLeaf { id: id.clone() })?;
                text.content = content.clone();
                text.children.clear();
                Ok(())
            })?;
        }

        EditorAction::DeleteNode { id } => {
            draft.container = delete_node_by_id(&draft.container, id)?;
        }

        EditorAction::InsertNode {
            node,
            anchor_id,
            position,
        } => {
            draft.container = insert_node(&draft.container, node.clone(), anchor_id, *position)?;
        }

        EditorAction::MoveNode {
            id,
            anchor_id,
            position,
        } => {
            draft.container = move_node(&draft.container, id, anchor_id, *position)?;
        }

        EditorAction::DuplicateNode { id, new_id } => {
            let (tree, copy_id) =
                duplicate_node(&draft.container, id, new_id.as_deref(), &mut draft.ids)?;
            debug!(node_id = %id, copy_id = %copy_id, "Duplicated node");
            draft.container = tree;
        }

        EditorAction::ReplaceContainer { container } => {
            if container.node_type() != NodeType::Container || !container.is_container() {
                return Err(StructuralViolation::RootNotContainer {
                    id: container.id().to_string(),
                    node_type: container.node_type(),
                }
                .into());
            }
            draft.container = Arc::new(container.clone());
        }

        EditorAction::Reset => {
            draft.container = Arc::clone(draft.initial);
        }

        EditorAction::Batch { actions } => {
            for action in actions {
                apply_action(draft, action)?;
            }
        }

        EditorAction::FormatText {
            id,
            start,
            end,
            format,
            mode,
        } => format_text(draft, id, *start, *end, format, *mode)?,

        EditorAction::SetActiveNode { id } => {
            if let Some(id) = id {
                if !contains_node(&draft.container, id) {
                    return Err(EditorError::not_found(id.as_str()));
                }
            }
            draft.active_node_id = id.clone();
        }
    }

    Ok(())
}

/// Offsets on an inline run are relative to that run; they are shifted
/// onto the enclosing block before formatting.
fn format_text(
    draft: &mut Draft<'_>,
    id: &str,
    start: usize,
    end: usize,
    format: &Format,
    mode: FormatMode,
) -> EditorResult<()> {
    let target = find_node_by_id(&draft.container, id).ok_or_else(|| EditorError::not_found(id))?;
    let text = target
        .as_text()
        .ok_or_else(|| StructuralViolation::NotTextLeaf { id: id.to_string() })?;

    let (block, base, end) = if text.node_type.is_inline() {
        let parent = find_parent_by_id(&draft.container, id)
            .and_then(EditorNode::as_text)
            .ok_or_else(|| StructuralViolation::NotTextLeaf { id: id.to_string() })?;
        let base = run_offset(parent, id).unwrap_or(0);
        (parent, base, end.min(text.char_len()))
    } else {
        (text, 0, end)
    };

    if start > end {
        return Err(EditorError::Range {
            start,
            end,
            len: text.char_len(),
        });
    }

    // Loaded documents may already hold ids from this seed
    draft.ids.skip_past(traverse_tree(&draft.container).map(EditorNode::id));
    let formatted = format_text_range(block, base + start, base + end, format, mode, &mut draft.ids)?;
    if formatted == *block {
        return Ok(());
    }

    let block_id = block.id.clone();
    draft.container = update_node_by_id(&draft.container, &block_id, move |node| {
        *node = formatted.into();
        Ok(())
    })?;
    Ok(())
}
