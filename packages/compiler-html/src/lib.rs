//! # Mina HTML Compiler
//!
//! Renders a document tree to HTML. Output is deterministic: attributes
//! are emitted in sorted order with `class` first and `style` last, text
//! is escaped, and inline formatting nests as
//! `<strong><em><u><s><code>`.
//!
//! Layout attributes on containers (`layoutType`, `gap`, `flexWrap`,
//! `columns`) become utility classes rather than raw attributes.

mod compiler;

pub use compiler::{
    compile_to_html, enhance_spaces, serialize_to_html, serialize_to_html_fragment,
    serialize_to_html_with_class, ClassMap, CompileOptions, ENHANCE_SPACES_CLASS,
};
