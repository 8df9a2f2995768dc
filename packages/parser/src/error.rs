//! Error types for the markdown table parser

use crate::tokenizer::TokenSpan;
use thiserror::Error;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse error with location and context. Lines are 1-based.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Not a table at line {line}: {message}")]
    NotATable {
        line: usize,
        span: Option<TokenSpan>,
        message: String,
    },

    #[error("Invalid separator row at line {line}: {message}")]
    InvalidSeparator {
        line: usize,
        span: TokenSpan,
        message: String,
    },

    #[error("Column mismatch at line {line}: header has {expected} columns, separator has {found}")]
    ColumnMismatch {
        line: usize,
        span: TokenSpan,
        expected: usize,
        found: usize,
    },
}

impl ParseError {
    pub fn not_a_table(line: usize, span: Option<TokenSpan>, message: impl Into<String>) -> Self {
        Self::NotATable {
            line,
            span,
            message: message.into(),
        }
    }

    pub fn invalid_separator(line: usize, span: TokenSpan, message: impl Into<String>) -> Self {
        Self::InvalidSeparator {
            line,
            span,
            message: message.into(),
        }
    }

    pub fn column_mismatch(line: usize, span: TokenSpan, expected: usize, found: usize) -> Self {
        Self::ColumnMismatch {
            line,
            span,
            expected,
            found,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ParseError::NotATable { line, .. }
            | ParseError::InvalidSeparator { line, .. }
            | ParseError::ColumnMismatch { line, .. } => *line,
        }
    }

    pub fn span(&self) -> Option<TokenSpan> {
        match self {
            ParseError::NotATable { span, .. } => *span,
            ParseError::InvalidSeparator { span, .. } => Some(*span),
            ParseError::ColumnMismatch { span, .. } => Some(*span),
        }
    }

    /// Short description for the source label in reports
    pub fn label(&self) -> String {
        match self {
            ParseError::NotATable { message, .. } => message.clone(),
            ParseError::InvalidSeparator { message, .. } => message.clone(),
            ParseError::ColumnMismatch { expected, .. } => {
                format!("expected {} separator cells", expected)
            }
        }
    }
}

/// Pretty-print an error with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_error(source: &str, filename: &str, error: &ParseError) -> String {
    use ariadne::{Color, Config, Label, Report, ReportKind, Source};

    let span = error.span().unwrap_or(TokenSpan {
        start: source.len().saturating_sub(1),
        end: source.len(),
    });

    let report = Report::build(ReportKind::Error, filename, span.start)
        .with_config(Config::default().with_color(false))
        .with_message(error.to_string())
        .with_label(
            Label::new((filename, span.start..span.end))
                .with_color(Color::Red)
                .with_message(error.label()),
        )
        .finish();

    let mut output = Vec::new();
    if report
        .write((filename, Source::from(source)), &mut output)
        .is_err()
    {
        return error.to_string();
    }

    String::from_utf8(output).unwrap_or_else(|_| error.to_string())
}
