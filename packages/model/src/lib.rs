//! # Mina Model
//!
//! Node vocabulary of the Mina rich-text engine.
//!
//! A document is a tree rooted at a `container` node. Structural nodes
//! ([`ContainerNode`]) hold ordered children; text nodes ([`TextNode`])
//! carry content, formatting flags and styles, and may hold inline runs
//! when a block mixes formatting. Children are shared through [`NodeRef`]
//! so edited trees reuse every untouched subtree.

pub mod builders;
pub mod id_generator;
pub mod node;
pub mod schema;
pub mod selection;
pub mod visitor;

pub use id_generator::{get_document_seed, IdGenerator};
pub use node::{
    Attributes, ContainerNode, EditorNode, Formats, NodeId, NodeRef, NodeType, Styles, TextNode,
};
pub use schema::{
    accepts_children, allowed_children, can_contain, can_contain_type, kind_matches_type,
};
pub use selection::{Selection, SelectionInfo};
pub use visitor::{walk_container, walk_node, walk_text, Visitor};
