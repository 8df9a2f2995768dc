//! # Mina Parser
//!
//! Alternate input sources for the document tree. Currently: GitHub-style
//! markdown tables, lexed with logos and assembled into `table` subtrees.

pub mod error;
pub mod table;
pub mod tokenizer;

#[cfg(feature = "pretty-errors")]
pub use error::format_error;
pub use error::{ParseError, ParseResult};
pub use table::{is_markdown_table, parse_markdown_table, separator_alignment, split_rows, Alignment, Row};
pub use tokenizer::{tokenize, Token, TokenSpan};
