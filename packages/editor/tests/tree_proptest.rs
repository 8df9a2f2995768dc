//! Property-based tests for tree invariants
//!
//! Random action sequences are thrown at the reducer; whatever it accepts
//! or rejects, the resulting tree must stay valid.

use mina_editor::model::{ContainerNode, EditorNode, NodeRef, NodeType, TextNode};
use mina_editor::{
    collect_ids, find_node_by_id, merge_adjacent_text_nodes, reduce, traverse_tree,
    validate_tree, EditorAction, EditorState, Format, FormatMode, InsertPosition,
};
use proptest::prelude::*;
use std::sync::Arc;

fn seed_tree() -> EditorNode {
    ContainerNode::new(
        "root",
        NodeType::Container,
        vec![
            TextNode::new("p0", NodeType::P, "alpha beta").into(),
            ContainerNode::new(
                "ul0",
                NodeType::Ul,
                vec![
                    TextNode::new("li0", NodeType::Li, "one").into(),
                    TextNode::new("li1", NodeType::Li, "two").into(),
                ],
            )
            .into(),
            ContainerNode::new("box0", NodeType::Container, vec![]).into(),
        ],
    )
    .into()
}

#[derive(Debug, Clone)]
enum Op {
    Insert { anchor: usize, position: usize, node_type: usize },
    Delete { target: usize },
    Move { target: usize, anchor: usize, position: usize },
    Duplicate { target: usize },
    Format { target: usize, start: usize, len: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), 0..4usize, 0..5usize).prop_map(|(anchor, position, node_type)| Op::Insert {
            anchor,
            position,
            node_type
        }),
        any::<usize>().prop_map(|target| Op::Delete { target }),
        (any::<usize>(), any::<usize>(), 0..4usize).prop_map(|(target, anchor, position)| Op::Move {
            target,
            anchor,
            position
        }),
        any::<usize>().prop_map(|target| Op::Duplicate { target }),
        (any::<usize>(), 0..12usize, 0..6usize).prop_map(|(target, start, len)| Op::Format {
            target,
            start,
            len
        }),
    ]
}

const POSITIONS: [InsertPosition; 4] = [
    InsertPosition::Before,
    InsertPosition::After,
    InsertPosition::Append,
    InsertPosition::Prepend,
];

const NEW_TYPES: [NodeType; 5] = [NodeType::P, NodeType::Li, NodeType::Ul, NodeType::H2, NodeType::Container];

fn ids_of(state: &EditorState) -> Vec<String> {
    traverse_tree(&state.container).map(|n| n.id().to_string()).collect()
}

fn to_action(op: &Op, state: &EditorState, step: usize) -> EditorAction {
    let ids = ids_of(state);
    let pick = |index: usize| ids[index % ids.len()].clone();

    match op {
        Op::Insert { anchor, position, node_type } => {
            let node_type = NEW_TYPES[*node_type];
            let id = format!("new{}", step);
            let node: EditorNode = if node_type.is_container() {
                ContainerNode::new(id, node_type, vec![]).into()
            } else {
                TextNode::new(id, node_type, "text").into()
            };
            EditorAction::insert_node(node, pick(*anchor), POSITIONS[*position])
        }
        Op::Delete { target } => EditorAction::delete_node(pick(*target)),
        Op::Move { target, anchor, position } => {
            EditorAction::move_node(pick(*target), pick(*anchor), POSITIONS[*position])
        }
        Op::Duplicate { target } => EditorAction::duplicate_node(pick(*target)),
        Op::Format { target, start, len } => {
            EditorAction::format_text(pick(*target), *start, start + len, Format::Bold, FormatMode::Toggle)
        }
    }
}

fn ids_are_unique(tree: &EditorNode) -> bool {
    let all: Vec<&str> = traverse_tree(tree).map(|n| n.id()).collect();
    all.len() == collect_ids(tree).len()
}

proptest! {
    #[test]
    fn accepted_sequences_keep_tree_valid(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut state = EditorState::new(seed_tree()).unwrap();

        for (step, op) in ops.iter().enumerate() {
            let action = to_action(op, &state, step);
            let before = Arc::clone(&state.container);

            match reduce(&state, &action) {
                Ok(next) => state = next,
                Err(_) => prop_assert!(Arc::ptr_eq(&before, &state.container)),
            }

            prop_assert!(validate_tree(&state.container).is_empty());
            prop_assert!(ids_are_unique(&state.container));
        }
    }

    #[test]
    fn undo_all_returns_to_seed(ops in prop::collection::vec(op_strategy(), 1..25)) {
        let mut state = EditorState::new(seed_tree()).unwrap();
        let seed = Arc::clone(&state.container);

        for (step, op) in ops.iter().enumerate() {
            let action = to_action(op, &state, step);
            let _ = state.dispatch(&action);
        }

        let latest = Arc::clone(&state.container);
        while state.undo() {}
        prop_assert!(Arc::ptr_eq(&state.container, &seed));

        while state.redo() {}
        prop_assert!(Arc::ptr_eq(&state.container, &latest));
    }

    #[test]
    fn move_never_nests_node_in_itself(target in 0..6usize, anchor in 0..6usize, position in 0..4usize) {
        let state = EditorState::new(seed_tree()).unwrap();
        let ids = ids_of(&state);
        let action = EditorAction::move_node(ids[target].clone(), ids[anchor].clone(), POSITIONS[position]);

        if let Ok(next) = reduce(&state, &action) {
            let moved = find_node_by_id(&next.container, &ids[target]).unwrap();
            let inside = traverse_tree(moved).skip(1).any(|n| n.id() == moved.id());
            prop_assert!(!inside);
            prop_assert!(validate_tree(&next.container).is_empty());
        }
    }

    #[test]
    fn merge_is_idempotent(runs in prop::collection::vec(("[a-z]{0,4}", any::<bool>(), any::<bool>()), 0..12)) {
        let siblings: Vec<NodeRef> = runs
            .iter()
            .enumerate()
            .map(|(index, (text, bold, italic))| {
                let mut run = TextNode::new(format!("r{}", index), NodeType::Span, text.clone());
                run.formats.bold = *bold;
                run.formats.italic = *italic;
                Arc::new(EditorNode::from(run))
            })
            .collect();

        let once = merge_adjacent_text_nodes(&siblings);
        let twice = merge_adjacent_text_nodes(&once);
        prop_assert_eq!(&once, &twice);

        let text: String = siblings.iter().map(|s| s.text_content()).collect();
        let merged_text: String = once.iter().map(|s| s.text_content()).collect();
        prop_assert_eq!(text, merged_text);
    }

    #[test]
    fn delete_and_reinsert_reproduces_node(index in 0..3usize) {
        let state = EditorState::new(seed_tree()).unwrap();
        let original = Arc::clone(&state.container.children()[index]);
        let anchor = state.container.children()[(index + 1) % 3].id().to_string();

        let deleted = reduce(&state, &EditorAction::delete_node(original.id())).unwrap();
        let restored = reduce(
            &deleted,
            &EditorAction::insert_node((*original).clone(), anchor, InsertPosition::Before),
        )
        .unwrap();

        let node = find_node_by_id(&restored.container, original.id()).unwrap();
        prop_assert_eq!(node.node_type(), original.node_type());
        prop_assert_eq!(node.text_content(), original.text_content());
        prop_assert_eq!(node.attributes(), original.attributes());
    }
}
