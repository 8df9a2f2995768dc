//! Markdown table parsing
//!
//! Converts GitHub-style pipe tables into a `table` subtree:
//!
//! ```text
//! | a | b |        table
//! |---|:-:|   →      thead > tr > th, th
//! | 1 | 2 |          tbody > tr > td, td
//! ```
//!
//! Leading and trailing pipes are optional, `\|` is a literal pipe, and the
//! separator row's colons set the column alignment.

use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tokenize, Token, TokenSpan};
use mina_model::{ContainerNode, EditorNode, IdGenerator, NodeType, TextNode};
use tracing::debug;

/// Column alignment from the separator row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_attribute(&self) -> Option<&'static str> {
        match self {
            Alignment::None => None,
            Alignment::Left => Some("left"),
            Alignment::Center => Some("center"),
            Alignment::Right => Some("right"),
        }
    }
}

/// One pipe-delimited source line
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based source line
    pub line: usize,
    pub span: TokenSpan,
    pub cells: Vec<String>,
}

/// Split source into rows. Blank lines before the table are ignored. Once
/// the header and separator are in, a blank or pipe-less line ends the
/// table and everything after it is left out.
pub fn split_rows(source: &str) -> ParseResult<Vec<Row>> {
    let tokens = tokenize(source);
    let mut lines: Vec<(usize, Vec<(Token<'_>, TokenSpan)>)> = vec![(1, Vec::new())];

    for (token, span) in tokens {
        if token == Token::Newline {
            let next_line = lines.len() + 1;
            lines.push((next_line, Vec::new()));
        } else if let Some((_, current)) = lines.last_mut() {
            current.push((token, span));
        }
    }

    let is_blank = |tokens: &[(Token<'_>, TokenSpan)]| {
        tokens
            .iter()
            .all(|(token, _)| matches!(token, Token::Text(text) if text.trim().is_empty()))
    };

    let first = lines.iter().position(|(_, tokens)| !is_blank(tokens.as_slice()));
    let last = lines.iter().rposition(|(_, tokens)| !is_blank(tokens.as_slice()));
    let (first, last) = match (first, last) {
        (Some(first), Some(last)) => (first, last),
        _ => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for (line, tokens) in &lines[first..=last] {
        if rows.len() >= 2 && (is_blank(tokens.as_slice()) || !has_pipe(tokens)) {
            break;
        }
        rows.push(split_cells(*line, tokens)?);
    }
    Ok(rows)
}

fn has_pipe(tokens: &[(Token<'_>, TokenSpan)]) -> bool {
    tokens.iter().any(|(token, _)| *token == Token::Pipe)
}

fn split_cells(line: usize, tokens: &[(Token<'_>, TokenSpan)]) -> ParseResult<Row> {
    let span = match (tokens.first(), tokens.last()) {
        (Some((_, first)), Some((_, last))) => first.join(last),
        _ => return Err(ParseError::not_a_table(line, None, "blank line inside table")),
    };

    if !has_pipe(tokens) {
        return Err(ParseError::not_a_table(
            line,
            Some(span),
            "row is not pipe-delimited",
        ));
    }

    let mut segments = vec![String::new()];
    for (token, _) in tokens {
        match token {
            Token::Pipe => segments.push(String::new()),
            Token::Text(text) => {
                if let Some(current) = segments.last_mut() {
                    current.push_str(text);
                }
            }
            Token::Newline => {}
        }
    }

    // Outer pipes leave empty edge segments behind
    if segments.len() > 1 && segments[0].trim().is_empty() {
        segments.remove(0);
    }
    if segments.len() > 1 && segments.last().is_some_and(|s| s.trim().is_empty()) {
        segments.pop();
    }

    let cells = segments
        .iter()
        .map(|segment| segment.trim().replace("\\|", "|"))
        .collect();

    Ok(Row { line, span, cells })
}

/// Alignment of a separator cell, or `None` if the cell is not one
pub fn separator_alignment(cell: &str) -> Option<Alignment> {
    let cell = cell.trim();
    let left = cell.starts_with(':');
    let right = cell.len() > 1 && cell.ends_with(':');
    let dashes = &cell[usize::from(left)..cell.len() - usize::from(right)];

    if dashes.is_empty() || !dashes.chars().all(|c| c == '-') {
        return None;
    }

    Some(match (left, right) {
        (true, true) => Alignment::Center,
        (true, false) => Alignment::Left,
        (false, true) => Alignment::Right,
        (false, false) => Alignment::None,
    })
}

fn separator_row(row: &Row) -> Option<Vec<Alignment>> {
    row.cells.iter().map(|cell| separator_alignment(cell)).collect()
}

/// Structural detection: a header row, a separator row, then any number of
/// body rows, all pipe-delimited. Column counts are not checked here.
pub fn is_markdown_table(source: &str) -> bool {
    match split_rows(source) {
        Ok(rows) => rows.len() >= 2 && separator_row(&rows[1]).is_some(),
        Err(_) => false,
    }
}

/// Parse a markdown table into a `table` node, minting ids from `ids`
pub fn parse_markdown_table(source: &str, ids: &mut IdGenerator) -> ParseResult<EditorNode> {
    let rows = split_rows(source)?;

    let (header, separator) = match rows.as_slice() {
        [header, separator, ..] => (header, separator),
        [only] => {
            return Err(ParseError::not_a_table(
                only.line,
                Some(only.span),
                "expected a separator row after the header",
            ))
        }
        [] => return Err(ParseError::not_a_table(1, None, "input is empty")),
    };

    let alignments = separator_row(separator).ok_or_else(|| {
        ParseError::invalid_separator(
            separator.line,
            separator.span,
            "separator cells must look like ---, :--, --: or :-:",
        )
    })?;

    if alignments.len() != header.cells.len() {
        return Err(ParseError::column_mismatch(
            separator.line,
            separator.span,
            header.cells.len(),
            alignments.len(),
        ));
    }

    let table_id = ids.new_id();
    let head_id = ids.new_id();
    let head_row = build_row(ids, NodeType::Th, &header.cells, &alignments);
    let mut sections: Vec<EditorNode> =
        vec![ContainerNode::new(head_id, NodeType::Thead, vec![head_row]).into()];

    let body = &rows[2..];
    if !body.is_empty() {
        let body_id = ids.new_id();
        let body_rows = body
            .iter()
            .map(|row| build_row(ids, NodeType::Td, &row.cells, &alignments))
            .collect();
        sections.push(ContainerNode::new(body_id, NodeType::Tbody, body_rows).into());
    }

    debug!(
        columns = alignments.len(),
        body_rows = body.len(),
        "Parsed markdown table"
    );

    Ok(ContainerNode::new(table_id, NodeType::Table, sections).into())
}

/// Row padded or truncated to the header width
fn build_row(
    ids: &mut IdGenerator,
    cell_type: NodeType,
    cells: &[String],
    alignments: &[Alignment],
) -> EditorNode {
    let row_id = ids.new_id();
    let cells = alignments
        .iter()
        .enumerate()
        .map(|(index, alignment)| {
            let content = cells.get(index).cloned().unwrap_or_default();
            let mut cell = TextNode::new(ids.new_id(), cell_type, content);
            if let Some(align) = alignment.as_attribute() {
                cell = cell.with_attribute("align", align);
            }
            EditorNode::from(cell)
        })
        .collect();
    ContainerNode::new(row_id, NodeType::Tr, cells).into()
}
