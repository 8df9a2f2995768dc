//! Constructors for the node shapes the editing surface creates: blocks,
//! uploaded images and galleries, lists, tables and links.

use crate::id_generator::IdGenerator;
use crate::node::{ContainerNode, EditorNode, NodeType, TextNode};

pub fn paragraph(ids: &mut IdGenerator, content: impl Into<String>) -> EditorNode {
    TextNode::new(ids.new_id(), NodeType::P, content).into()
}

/// Heading of `level` (clamped to 1..=6)
pub fn heading(ids: &mut IdGenerator, level: u8, content: impl Into<String>) -> EditorNode {
    let node_type = match level {
        0 | 1 => NodeType::H1,
        2 => NodeType::H2,
        3 => NodeType::H3,
        4 => NodeType::H4,
        5 => NodeType::H5,
        _ => NodeType::H6,
    };
    TextNode::new(ids.new_id(), node_type, content).into()
}

/// Image node for a resolved upload URL
pub fn image(ids: &mut IdGenerator, src: impl Into<String>, alt: impl Into<String>) -> EditorNode {
    TextNode::new(ids.new_id(), NodeType::Img, "")
        .with_attribute("src", src)
        .with_attribute("alt", alt)
        .into()
}

/// Wrapping flex container holding one image per `(src, alt)` pair
pub fn image_gallery<S, A>(ids: &mut IdGenerator, images: impl IntoIterator<Item = (S, A)>) -> EditorNode
where
    S: Into<String>,
    A: Into<String>,
{
    let id = ids.new_id();
    let children = images
        .into_iter()
        .map(|(src, alt)| image(ids, src, alt))
        .collect();
    ContainerNode::new(id, NodeType::Container, children)
        .with_attribute("layoutType", "flex")
        .with_attribute("gap", "4")
        .with_attribute("flexWrap", "wrap")
        .into()
}

/// `ul`/`ol` with one `li` per item. Any other `list_type` yields `ul`.
pub fn list<I, S>(ids: &mut IdGenerator, list_type: NodeType, items: I) -> EditorNode
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let list_type = if list_type == NodeType::Ol { NodeType::Ol } else { NodeType::Ul };
    let id = ids.new_id();
    let children = items
        .into_iter()
        .map(|item| TextNode::new(ids.new_id(), NodeType::Li, item).into())
        .collect();
    ContainerNode::new(id, list_type, children).into()
}

/// Empty table: one header row plus `body_rows` rows, `columns` wide
pub fn table(ids: &mut IdGenerator, columns: usize, body_rows: usize) -> EditorNode {
    let table_id = ids.new_id();
    let head = section(ids, NodeType::Thead, NodeType::Th, 1, columns);
    let body = section(ids, NodeType::Tbody, NodeType::Td, body_rows, columns);
    ContainerNode::new(table_id, NodeType::Table, vec![head, body]).into()
}

fn section(
    ids: &mut IdGenerator,
    section_type: NodeType,
    cell_type: NodeType,
    rows: usize,
    columns: usize,
) -> EditorNode {
    let id = ids.new_id();
    let rows = (0..rows).map(|_| row(ids, cell_type, vec![String::new(); columns])).collect();
    ContainerNode::new(id, section_type, rows).into()
}

/// Table row with one cell of `cell_type` per value
pub fn row(ids: &mut IdGenerator, cell_type: NodeType, cells: Vec<String>) -> EditorNode {
    let id = ids.new_id();
    let cells = cells
        .into_iter()
        .map(|content| TextNode::new(ids.new_id(), cell_type, content).into())
        .collect();
    ContainerNode::new(id, NodeType::Tr, cells).into()
}

/// Inline link run
pub fn link(ids: &mut IdGenerator, href: impl Into<String>, text: impl Into<String>) -> TextNode {
    TextNode::new(ids.new_id(), NodeType::Link, text).with_attribute("href", href)
}
