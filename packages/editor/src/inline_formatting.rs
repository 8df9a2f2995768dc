//! # Inline Formatting
//!
//! Character-range formatting inside a text block.
//!
//! A text block is either a leaf (`content` + `formats` + `styles`) or a
//! sequence of inline runs (`span`/`a` children). Formatting a sub-range
//! converts a leaf into runs, splits the runs at the range edges, applies
//! the format to the covered runs and then merges neighbours that ended up
//! with identical formatting. A block left with a single plain `span` is
//! collapsed back into a leaf.
//!
//! All offsets count characters, not bytes.

use crate::errors::{EditorError, EditorResult, StructuralViolation};
use crate::tree_ops::{find_node_by_id, find_parent_by_id};
use mina_model::{EditorNode, Formats, IdGenerator, NodeRef, NodeType, SelectionInfo, TextNode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single formatting change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Format {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    /// Inline style property, e.g. `color: red`
    Style { key: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatMode {
    Apply,
    Remove,
    /// Remove if every covered character already has it, apply otherwise
    Toggle,
}

/// Three segments of a text leaf around a selection
#[derive(Debug, Clone, PartialEq)]
pub struct TextSplit {
    pub before: TextNode,
    pub selected: TextNode,
    pub after: TextNode,
}

impl TextSplit {
    /// Segments with text, in document order
    pub fn non_empty(self) -> Vec<TextNode> {
        [self.before, self.selected, self.after]
            .into_iter()
            .filter(|segment| !segment.content.is_empty())
            .collect()
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

/// Split a text leaf into before/selected/after segments. Offsets past the
/// end are clamped. `before` keeps the original id; the other two get
/// fresh ones. All three inherit type, attributes and formatting.
pub fn split_text_at_selection(
    node: &TextNode,
    start: usize,
    end: usize,
    ids: &mut IdGenerator,
) -> EditorResult<TextSplit> {
    if !node.is_leaf() {
        return Err(StructuralViolation::NotTextLeaf { id: node.id.clone() }.into());
    }

    let len = node.content.chars().count();
    if start > end {
        return Err(EditorError::Range { start, end, len });
    }

    let start = byte_offset(&node.content, start.min(len));
    let end = byte_offset(&node.content, end.min(len));

    let segment = |id: String, text: &str| {
        let mut segment = node.clone();
        segment.id = id;
        segment.content = text.to_string();
        segment
    };

    Ok(TextSplit {
        before: segment(node.id.clone(), &node.content[..start]),
        selected: segment(ids.new_id(), &node.content[start..end]),
        after: segment(ids.new_id(), &node.content[end..]),
    })
}

fn set_format(node: &mut TextNode, format: &Format, enabled: bool) {
    match format {
        Format::Bold => node.formats.bold = enabled,
        Format::Italic => node.formats.italic = enabled,
        Format::Underline => node.formats.underline = enabled,
        Format::Strikethrough => node.formats.strikethrough = enabled,
        Format::Code => node.formats.code = enabled,
        Format::Style { key, value } => {
            if enabled {
                node.styles.insert(key.clone(), value.clone());
            } else {
                node.styles.remove(key);
            }
        }
    }
}

pub fn apply_formatting(node: &TextNode, format: &Format) -> TextNode {
    let mut node = node.clone();
    set_format(&mut node, format, true);
    node
}

pub fn remove_formatting(node: &TextNode, format: &Format) -> TextNode {
    let mut node = node.clone();
    set_format(&mut node, format, false);
    node
}

/// For styles, the key must be set to exactly this value
pub fn has_formatting(node: &TextNode, format: &Format) -> bool {
    match format {
        Format::Bold => node.formats.bold,
        Format::Italic => node.formats.italic,
        Format::Underline => node.formats.underline,
        Format::Strikethrough => node.formats.strikethrough,
        Format::Code => node.formats.code,
        Format::Style { key, value } => node.styles.get(key) == Some(value),
    }
}

fn mergeable(prev: &TextNode, next: &TextNode) -> bool {
    prev.node_type.is_inline() && prev.is_leaf() && next.is_leaf() && prev.same_formatting(next)
}

/// Coalesce consecutive inline runs with identical formatting. The merged
/// run keeps the first run's id.
pub fn merge_adjacent_text_nodes(siblings: &[NodeRef]) -> Vec<NodeRef> {
    let mut merged: Vec<NodeRef> = Vec::with_capacity(siblings.len());

    for sibling in siblings {
        let combined = match (merged.last().map(|last| last.as_ref()), sibling.as_ref()) {
            (Some(EditorNode::Text(prev)), EditorNode::Text(next)) if mergeable(prev, next) => {
                let mut combined = prev.clone();
                combined.content.push_str(&next.content);
                Some(combined)
            }
            _ => None,
        };

        match (combined, merged.last_mut()) {
            (Some(combined), Some(last)) => *last = Arc::new(combined.into()),
            _ => merged.push(Arc::clone(sibling)),
        }
    }

    merged
}

/// Turn a text leaf into a block holding one `span` run that carries the
/// content and formatting. Nodes that already have runs, or no text, are
/// returned unchanged.
pub fn convert_to_inline_format(node: &TextNode, ids: &mut IdGenerator) -> TextNode {
    if !node.is_leaf() || node.content.is_empty() {
        return node.clone();
    }

    let mut run = TextNode::new(ids.new_id(), NodeType::Span, node.content.clone());
    run.formats = node.formats;
    run.styles = node.styles.clone();

    let mut block = node.clone();
    block.content.clear();
    block.formats = Formats::default();
    block.styles.clear();
    block.children = vec![Arc::new(run.into())];
    block
}

/// Inverse of [`convert_to_inline_format`] for a block whose runs merged
/// back into one plain `span`
fn collapse_single_run(mut block: TextNode) -> TextNode {
    let single = match block.children.as_slice() {
        [only] => only.as_text().filter(|run| {
            run.node_type == NodeType::Span && run.attributes.is_empty() && run.is_leaf()
        }),
        _ => None,
    }
    .cloned();

    if let Some(run) = single {
        block.content = run.content;
        block.formats = run.formats;
        block.styles = run.styles;
        block.children.clear();
    }
    block
}

/// Apply, remove or toggle `format` on characters `start..end` of a text
/// block. `end` is clamped to the text length; an empty range leaves the
/// block unchanged.
pub fn format_text_range(
    node: &TextNode,
    start: usize,
    end: usize,
    format: &Format,
    mode: FormatMode,
    ids: &mut IdGenerator,
) -> EditorResult<TextNode> {
    let len = node.char_len();
    if start > end {
        return Err(EditorError::Range { start, end, len });
    }
    let end = end.min(len);
    if start >= end {
        return Ok(node.clone());
    }

    let block = convert_to_inline_format(node, ids);
    let runs: Vec<TextNode> = block
        .children
        .iter()
        .filter_map(|child| child.as_text().cloned())
        .collect();

    let covered = |offset: usize, run: &TextNode| {
        let run_len = run.content.chars().count();
        run_len > 0 && offset < end && offset + run_len > start
    };

    let enable = match mode {
        FormatMode::Apply => true,
        FormatMode::Remove => false,
        FormatMode::Toggle => {
            let mut offset = 0;
            let mut all_have = true;
            for run in &runs {
                if covered(offset, run) && !has_formatting(run, format) {
                    all_have = false;
                }
                offset += run.content.chars().count();
            }
            !all_have
        }
    };

    let mut offset = 0;
    let mut formatted: Vec<NodeRef> = Vec::with_capacity(runs.len() + 2);
    for run in runs {
        let run_start = offset;
        let run_len = run.content.chars().count();
        offset += run_len;

        if !covered(run_start, &run) || run.node_type == NodeType::Br {
            formatted.push(Arc::new(run.into()));
            continue;
        }

        let local_start = start.max(run_start) - run_start;
        let local_end = end.min(run_start + run_len) - run_start;
        let mut split = split_text_at_selection(&run, local_start, local_end, ids)?;
        set_format(&mut split.selected, format, enable);

        formatted.extend(
            split
                .non_empty()
                .into_iter()
                .map(|segment| Arc::new(EditorNode::from(segment))),
        );
    }

    let mut block = block;
    block.children = merge_adjacent_text_nodes(&formatted);
    Ok(collapse_single_run(block))
}

/// Effective formatting at a caret position.
///
/// `node_id` may name a text block, one of its runs, or a container. On a
/// run boundary the preceding run wins; offset 0 takes the first run.
pub fn get_formatting_at_position(
    container: &EditorNode,
    node_id: &str,
    offset: usize,
) -> EditorResult<SelectionInfo> {
    let node = find_node_by_id(container, node_id).ok_or_else(|| EditorError::not_found(node_id))?;

    let text = match node {
        EditorNode::Container(c) => {
            return Ok(SelectionInfo {
                element_type: Some(c.node_type),
                ..SelectionInfo::default()
            })
        }
        EditorNode::Text(text) => text,
    };

    let len = text.char_len();
    if offset > len {
        return Err(EditorError::Range { start: offset, end: offset, len });
    }

    let (block, run) = if text.node_type.is_inline() {
        let parent = find_parent_by_id(container, node_id).and_then(|parent| parent.as_text());
        (parent.unwrap_or(text), Some(text))
    } else {
        (text, run_at_offset(text, offset))
    };

    let mut formats = block.formats;
    let mut styles = block.styles.clone();
    if let Some(run) = run.filter(|run| run.id != block.id) {
        formats = formats.union(&run.formats);
        styles.extend(run.styles.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    Ok(SelectionInfo {
        element_type: Some(block.node_type),
        formats,
        styles: if styles.is_empty() { None } else { Some(styles) },
    })
}

fn run_at_offset(block: &TextNode, offset: usize) -> Option<&TextNode> {
    let runs: Vec<&TextNode> = block.children.iter().filter_map(|c| c.as_text()).collect();
    let mut start = 0;
    for run in &runs {
        let end = start + run.content.chars().count();
        if offset > start && offset <= end {
            return Some(run);
        }
        start = end;
    }
    runs.first().copied()
}

/// Character offset of a run within its block
pub fn run_offset(block: &TextNode, run_id: &str) -> Option<usize> {
    let mut offset = 0;
    for child in &block.children {
        if child.id() == run_id {
            return Some(offset);
        }
        offset += child.text_content().chars().count();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use mina_model::ContainerNode;

    fn ids() -> IdGenerator {
        IdGenerator::from_seed("f")
    }

    fn runs(block: &TextNode) -> Vec<(String, Formats)> {
        block
            .children
            .iter()
            .filter_map(|c| c.as_text())
            .map(|run| (run.content.clone(), run.formats))
            .collect()
    }

    #[test]
    fn test_split_text_at_selection() {
        let node = TextNode::new("t", NodeType::P, "hello world").with_formats(Formats::bold());
        let split = split_text_at_selection(&node, 2, 5, &mut ids()).unwrap();

        assert_eq!(split.before.content, "he");
        assert_eq!(split.before.id, "t");
        assert_eq!(split.selected.content, "llo");
        assert_eq!(split.after.content, " world");
        assert!(split.selected.formats.bold);
        assert_ne!(split.selected.id, split.after.id);
    }

    #[test]
    fn test_split_clamps_and_rejects_inverted_range() {
        let node = TextNode::new("t", NodeType::P, "abc");
        let split = split_text_at_selection(&node, 1, 99, &mut ids()).unwrap();
        assert_eq!(split.selected.content, "bc");
        assert_eq!(split.after.content, "");

        let err = split_text_at_selection(&node, 2, 1, &mut ids()).unwrap_err();
        assert_eq!(err, EditorError::Range { start: 2, end: 1, len: 3 });
    }

    #[test]
    fn test_split_counts_characters() {
        let node = TextNode::new("t", NodeType::P, "héllo");
        let split = split_text_at_selection(&node, 1, 2, &mut ids()).unwrap();
        assert_eq!(split.selected.content, "é");
        assert_eq!(split.after.content, "llo");
    }

    #[test]
    fn test_apply_and_remove_formatting() {
        let node = TextNode::new("t", NodeType::Span, "x");
        let styled = apply_formatting(&node, &Format::Style {
            key: "color".into(),
            value: "red".into(),
        });
        assert_eq!(styled.styles["color"], "red");

        let bold = apply_formatting(&styled, &Format::Bold);
        assert!(has_formatting(&bold, &Format::Bold));
        assert!(!has_formatting(&remove_formatting(&bold, &Format::Bold), &Format::Bold));
    }

    #[test]
    fn test_merge_adjacent_text_nodes() {
        let run = |id: &str, text: &str, bold: bool| -> NodeRef {
            let formats = if bold { Formats::bold() } else { Formats::default() };
            Arc::new(TextNode::new(id, NodeType::Span, text).with_formats(formats).into())
        };
        let merged = merge_adjacent_text_nodes(&[
            run("a", "one ", false),
            run("b", "two ", false),
            run("c", "three", true),
            run("d", "!", false),
        ]);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].id(), "a");
        assert_eq!(merged[0].text_content(), "one two ");
    }

    #[test]
    fn test_merge_keeps_blocks_and_breaks_apart() {
        let p = |id: &str| -> NodeRef { Arc::new(TextNode::new(id, NodeType::P, "x").into()) };
        assert_eq!(merge_adjacent_text_nodes(&[p("a"), p("b")]).len(), 2);

        let br = |id: &str| -> NodeRef { Arc::new(TextNode::new(id, NodeType::Br, "").into()) };
        assert_eq!(merge_adjacent_text_nodes(&[br("a"), br("b")]).len(), 2);
    }

    #[test]
    fn test_convert_to_inline_format() {
        let node = TextNode::new("p", NodeType::P, "hi").with_formats(Formats::bold());
        let block = convert_to_inline_format(&node, &mut ids());
        assert_eq!(block.content, "");
        assert!(block.formats.is_plain());
        assert_eq!(runs(&block), vec![("hi".to_string(), Formats::bold())]);
        assert_eq!(block.text(), "hi");
    }

    #[test]
    fn test_format_middle_of_paragraph() {
        let node = TextNode::new("p", NodeType::P, "Hello world");
        let block = format_text_range(&node, 6, 11, &Format::Bold, FormatMode::Apply, &mut ids()).unwrap();

        assert_eq!(
            runs(&block),
            vec![
                ("Hello ".to_string(), Formats::default()),
                ("world".to_string(), Formats::bold()),
            ]
        );
        assert_eq!(block.text(), "Hello world");
    }

    #[test]
    fn test_format_whole_text_collapses_back_to_leaf() {
        let node = TextNode::new("p", NodeType::P, "abc");
        let block = format_text_range(&node, 0, 3, &Format::Italic, FormatMode::Apply, &mut ids()).unwrap();
        assert!(block.is_leaf());
        assert!(block.formats.italic);
        assert_eq!(block.content, "abc");
    }

    #[test]
    fn test_removing_format_merges_runs() {
        let node = TextNode::new("p", NodeType::P, "abcdef");
        let mut generator = ids();
        let bolded = format_text_range(&node, 2, 4, &Format::Bold, FormatMode::Apply, &mut generator).unwrap();
        assert_eq!(bolded.children.len(), 3);

        let plain = format_text_range(&bolded, 0, 6, &Format::Bold, FormatMode::Remove, &mut generator).unwrap();
        assert!(plain.is_leaf());
        assert_eq!(plain.content, "abcdef");
        assert!(plain.formats.is_plain());
    }

    #[test]
    fn test_toggle_depends_on_coverage() {
        let node = TextNode::new("p", NodeType::P, "abcdef");
        let mut generator = ids();
        let partly = format_text_range(&node, 0, 3, &Format::Bold, FormatMode::Apply, &mut generator).unwrap();

        // Mixed coverage: toggle applies everywhere
        let all = format_text_range(&partly, 0, 6, &Format::Bold, FormatMode::Toggle, &mut generator).unwrap();
        assert!(all.is_leaf() && all.formats.bold);

        // Full coverage: toggle removes
        let none = format_text_range(&all, 0, 6, &Format::Bold, FormatMode::Toggle, &mut generator).unwrap();
        assert!(none.formats.is_plain());
    }

    #[test]
    fn test_format_empty_range_is_noop() {
        let node = TextNode::new("p", NodeType::P, "abc");
        let same = format_text_range(&node, 2, 2, &Format::Bold, FormatMode::Apply, &mut ids()).unwrap();
        assert_eq!(same, node);

        let err = format_text_range(&node, 3, 1, &Format::Bold, FormatMode::Apply, &mut ids()).unwrap_err();
        assert!(matches!(err, EditorError::Range { .. }));
    }

    #[test]
    fn test_formatting_at_position() {
        let block = TextNode::new("p", NodeType::P, "").with_runs(vec![
            TextNode::new("r1", NodeType::Span, "plain"),
            TextNode::new("r2", NodeType::Span, "bold").with_formats(Formats::bold()),
        ]);
        let tree: EditorNode = ContainerNode::new("root", NodeType::Container, vec![block.into()]).into();

        let at = |offset| get_formatting_at_position(&tree, "p", offset).unwrap();
        assert!(!at(0).formats.bold);
        // Boundary takes the preceding run
        assert!(!at(5).formats.bold);
        assert!(at(6).formats.bold);
        assert_eq!(at(6).element_type, Some(NodeType::P));

        let run = get_formatting_at_position(&tree, "r2", 1).unwrap();
        assert!(run.formats.bold);
        assert_eq!(run.element_type, Some(NodeType::P));

        let container = get_formatting_at_position(&tree, "root", 0).unwrap();
        assert_eq!(container.element_type, Some(NodeType::Container));

        assert!(get_formatting_at_position(&tree, "p", 10).is_err());
        assert!(get_formatting_at_position(&tree, "zz", 0).unwrap_err().is_not_found());
    }

    #[test]
    fn test_run_offset() {
        let block = TextNode::new("p", NodeType::P, "").with_runs(vec![
            TextNode::new("r1", NodeType::Span, "ab"),
            TextNode::new("r2", NodeType::Span, "cd"),
        ]);
        assert_eq!(run_offset(&block, "r2"), Some(2));
        assert_eq!(run_offset(&block, "r3"), None);
    }
}
