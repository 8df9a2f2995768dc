//! # Mina Editor
//!
//! Core editing engine for Mina documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host: selection, toolbar, uploads           │
//! └─────────────────────────────────────────────┘
//!                     ↓ EditorAction
//! ┌─────────────────────────────────────────────┐
//! │ reducer: (state, action) → state'           │
//! │  - Tree operations with path copying        │
//! │  - Inline formatting on character ranges    │
//! │  - Schema validation of every result        │
//! │  - Snapshot history for undo/redo           │
//! └─────────────────────────────────────────────┘
//!                     ↓ EditorState.container
//! ┌─────────────────────────────────────────────┐
//! │ compiler-html: tree → markup                │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Immutable trees**: Edits copy the path to the edited node and share
//!    everything else
//! 2. **Pure transitions**: `reduce` never mutates its input; errors leave
//!    the caller's state as it was
//! 3. **Schema first**: Every accepted state passes `validate_tree`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mina_editor::{EditorAction, EditorState, Format, FormatMode};
//!
//! let mut state = EditorState::default();
//! let paragraph = state.container.children()[0].id().to_string();
//!
//! state.dispatch(&EditorAction::update_content(paragraph.as_str(), "Hello world"))?;
//! state.dispatch(&EditorAction::format_text(paragraph.as_str(), 6, 11, Format::Bold, FormatMode::Apply))?;
//!
//! state.undo();
//! ```

mod actions;
mod config;
mod errors;
mod history;
mod inline_formatting;
mod reducer;
mod state;
mod tree_ops;
mod validator;

pub use actions::{EditorAction, NodePatch};
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use errors::{EditorError, EditorResult, StructuralViolation};
pub use history::{redo, undo, History};
pub use inline_formatting::{
    apply_formatting, convert_to_inline_format, format_text_range, get_formatting_at_position,
    has_formatting, merge_adjacent_text_nodes, remove_formatting, run_offset,
    split_text_at_selection, Format, FormatMode, TextSplit,
};
pub use reducer::reduce;
pub use state::{create_initial_state, EditorState};
pub use tree_ops::{
    clone_node, collect_ids, contains_node, delete_node_by_id, duplicate_node, find_node_by_id,
    find_node_ref, find_parent_by_id, for_each_node, insert_node, is_descendant, move_node,
    node_path, shallow_eq, traverse_tree, update_node_by_id, InsertPosition, Traverse,
};
pub use validator::{is_valid, validate_subtree, validate_tree};

// Re-export the model for convenience
pub use mina_model as model;
