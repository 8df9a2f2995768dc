use logos::Logos;
use std::fmt;

/// Byte range of a token in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
}

impl TokenSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span covering both `self` and `other`
    pub fn join(&self, other: &TokenSpan) -> TokenSpan {
        TokenSpan {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<std::ops::Range<usize>> for TokenSpan {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Token types for pipe-delimited markdown tables
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    #[token("|")]
    Pipe,

    #[regex(r"\r?\n")]
    Newline,

    // Cell text; `\|` stays inside the cell and a backslash ending the
    // line is kept as text
    #[regex(r"([^|\\\r\n]|\\[^\r\n])+\\?|\\", |lex| lex.slice())]
    Text(&'src str),
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Pipe => write!(f, "|"),
            Token::Newline => write!(f, "newline"),
            Token::Text(s) => write!(f, "text '{}'", s),
        }
    }
}

/// Tokenize a source string
pub fn tokenize(source: &str) -> Vec<(Token<'_>, TokenSpan)> {
    let lexer = Token::lexer(source);
    lexer
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, span.into())))
        .collect()
}
