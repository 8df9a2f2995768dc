use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Stable node identity
pub type NodeId = String;

/// Node attributes (ordered so serialization is deterministic)
pub type Attributes = BTreeMap<String, String>;

/// Inline styles keyed by camelCase CSS property (`color`, `fontSize`, ...)
pub type Styles = BTreeMap<String, String>;

/// Shared child pointer. Edits copy the path from the root to the edited
/// node and reuse every other subtree.
pub type NodeRef = Arc<EditorNode>;

/// Closed set of node types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Container,
    P,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Code,
    Blockquote,
    Li,
    Ul,
    Ol,
    Br,
    Img,
    Span,
    #[serde(rename = "a")]
    Link,
    Table,
    Thead,
    Tbody,
    Tr,
    Th,
    Td,
}

impl NodeType {
    pub const ALL: [NodeType; 23] = [
        NodeType::Container,
        NodeType::P,
        NodeType::H1,
        NodeType::H2,
        NodeType::H3,
        NodeType::H4,
        NodeType::H5,
        NodeType::H6,
        NodeType::Code,
        NodeType::Blockquote,
        NodeType::Li,
        NodeType::Ul,
        NodeType::Ol,
        NodeType::Br,
        NodeType::Img,
        NodeType::Span,
        NodeType::Link,
        NodeType::Table,
        NodeType::Thead,
        NodeType::Tbody,
        NodeType::Tr,
        NodeType::Th,
        NodeType::Td,
    ];

    /// Tag name used in JSON and markup
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Container => "container",
            NodeType::P => "p",
            NodeType::H1 => "h1",
            NodeType::H2 => "h2",
            NodeType::H3 => "h3",
            NodeType::H4 => "h4",
            NodeType::H5 => "h5",
            NodeType::H6 => "h6",
            NodeType::Code => "code",
            NodeType::Blockquote => "blockquote",
            NodeType::Li => "li",
            NodeType::Ul => "ul",
            NodeType::Ol => "ol",
            NodeType::Br => "br",
            NodeType::Img => "img",
            NodeType::Span => "span",
            NodeType::Link => "a",
            NodeType::Table => "table",
            NodeType::Thead => "thead",
            NodeType::Tbody => "tbody",
            NodeType::Tr => "tr",
            NodeType::Th => "th",
            NodeType::Td => "td",
        }
    }

    /// Types whose nodes hold child nodes instead of text
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NodeType::Container
                | NodeType::Ul
                | NodeType::Ol
                | NodeType::Table
                | NodeType::Thead
                | NodeType::Tbody
                | NodeType::Tr
        )
    }

    /// Inline runs living inside a text block
    pub fn is_inline(&self) -> bool {
        matches!(self, NodeType::Span | NodeType::Link)
    }

    pub fn is_heading(&self) -> bool {
        matches!(
            self,
            NodeType::H1 | NodeType::H2 | NodeType::H3 | NodeType::H4 | NodeType::H5 | NodeType::H6
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown node type '{}'", s))
    }
}

/// Character-level formatting flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Formats {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub code: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Formats {
    pub fn bold() -> Self {
        Self { bold: true, ..Self::default() }
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// Flag-wise OR
    pub fn union(&self, other: &Formats) -> Formats {
        Formats {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
            strikethrough: self.strikethrough || other.strikethrough,
            code: self.code || other.code,
        }
    }
}

/// Structural node: holds an ordered list of child nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
    #[serde(default)]
    pub children: Vec<NodeRef>,
}

/// Text-bearing node. `children` holds inline runs (`span`/`a`) when the
/// block mixes formatting; otherwise `content` carries the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Formats::is_plain")]
    pub formats: Formats,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: Styles,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeRef>,
}

impl TextNode {
    pub fn new(id: impl Into<NodeId>, node_type: NodeType, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type,
            attributes: Attributes::new(),
            content: content.into(),
            formats: Formats::default(),
            styles: Styles::new(),
            children: Vec::new(),
        }
    }

    pub fn with_formats(mut self, formats: Formats) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(key.into(), value.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_runs(mut self, runs: Vec<TextNode>) -> Self {
        self.content.clear();
        self.children = runs.into_iter().map(|run| Arc::new(EditorNode::Text(run))).collect();
        self
    }

    /// A text node without inline runs
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Visible text: own content for leaves, concatenated runs otherwise
    pub fn text(&self) -> String {
        if self.children.is_empty() {
            self.content.clone()
        } else {
            self.children.iter().map(|child| child.text_content()).collect()
        }
    }

    /// Length in characters of the visible text
    pub fn char_len(&self) -> usize {
        if self.children.is_empty() {
            self.content.chars().count()
        } else {
            self.children.iter().map(|child| child.text_content().chars().count()).sum()
        }
    }

    /// Same type, attributes and formatting (content and id ignored)
    pub fn same_formatting(&self, other: &TextNode) -> bool {
        self.node_type == other.node_type
            && self.formats == other.formats
            && self.styles == other.styles
            && self.attributes == other.attributes
    }
}

impl ContainerNode {
    pub fn new(id: impl Into<NodeId>, node_type: NodeType, children: Vec<EditorNode>) -> Self {
        Self {
            id: id.into(),
            node_type,
            attributes: Attributes::new(),
            children: children.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Document tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EditorNode {
    Container(ContainerNode),
    Text(TextNode),
}

impl EditorNode {
    /// Document root: an empty `container`
    pub fn root(id: impl Into<NodeId>) -> Self {
        EditorNode::Container(ContainerNode::new(id, NodeType::Container, Vec::new()))
    }

    pub fn id(&self) -> &str {
        match self {
            EditorNode::Container(node) => &node.id,
            EditorNode::Text(node) => &node.id,
        }
    }

    pub fn set_id(&mut self, id: impl Into<NodeId>) {
        match self {
            EditorNode::Container(node) => node.id = id.into(),
            EditorNode::Text(node) => node.id = id.into(),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            EditorNode::Container(node) => node.node_type,
            EditorNode::Text(node) => node.node_type,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        match self {
            EditorNode::Container(node) => &node.attributes,
            EditorNode::Text(node) => &node.attributes,
        }
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        match self {
            EditorNode::Container(node) => &mut node.attributes,
            EditorNode::Text(node) => &mut node.attributes,
        }
    }

    pub fn children(&self) -> &[NodeRef] {
        match self {
            EditorNode::Container(node) => &node.children,
            EditorNode::Text(node) => &node.children,
        }
    }

    pub fn children_mut(&mut self) -> &mut Vec<NodeRef> {
        match self {
            EditorNode::Container(node) => &mut node.children,
            EditorNode::Text(node) => &mut node.children,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            EditorNode::Text(node) => Some(node),
            EditorNode::Container(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextNode> {
        match self {
            EditorNode::Text(node) => Some(node),
            EditorNode::Container(_) => None,
        }
    }

    pub fn as_container(&self) -> Option<&ContainerNode> {
        match self {
            EditorNode::Container(node) => Some(node),
            EditorNode::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, EditorNode::Text(_))
    }

    pub fn is_container(&self) -> bool {
        matches!(self, EditorNode::Container(_))
    }

    /// Concatenated text of this node and all descendants
    pub fn text_content(&self) -> String {
        match self {
            EditorNode::Text(node) => node.text(),
            EditorNode::Container(node) => node.children.iter().map(|c| c.text_content()).collect(),
        }
    }

    /// JSON projection of the subtree
    pub fn to_json(&self) -> serde_json::Value {
        // Serializing string-keyed maps and plain structs cannot fail
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<TextNode> for EditorNode {
    fn from(node: TextNode) -> Self {
        EditorNode::Text(node)
    }
}

impl From<ContainerNode> for EditorNode {
    fn from(node: ContainerNode) -> Self {
        EditorNode::Container(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_round_trips_through_str() {
        for node_type in NodeType::ALL {
            assert_eq!(node_type.as_str().parse::<NodeType>(), Ok(node_type));
        }
        assert!("marquee".parse::<NodeType>().is_err());
    }

    #[test]
    fn test_json_projection_omits_empty_fields() {
        let node = EditorNode::Text(TextNode::new("p1", NodeType::P, "Hello"));
        let json = node.to_json();

        assert_eq!(json["kind"], "text");
        assert_eq!(json["type"], "p");
        assert_eq!(json["content"], "Hello");
        assert!(json.get("formats").is_none());
        assert!(json.get("children").is_none());
    }

    #[test]
    fn test_json_projection_round_trip() {
        let root = EditorNode::Container(ContainerNode::new(
            "root",
            NodeType::Container,
            vec![
                TextNode::new("h", NodeType::H1, "Title").into(),
                TextNode::new("p", NodeType::P, "")
                    .with_runs(vec![
                        TextNode::new("r1", NodeType::Span, "plain "),
                        TextNode::new("r2", NodeType::Span, "bold").with_formats(Formats::bold()),
                    ])
                    .into(),
            ],
        ));

        let json = root.to_json_string().unwrap();
        let parsed = EditorNode::from_json_str(&json).unwrap();
        assert_eq!(parsed, root);
    }

    #[test]
    fn test_text_of_block_with_runs() {
        let block = TextNode::new("p", NodeType::P, "").with_runs(vec![
            TextNode::new("a", NodeType::Span, "Hello "),
            TextNode::new("b", NodeType::Span, "world"),
        ]);
        assert_eq!(block.text(), "Hello world");
        assert_eq!(block.char_len(), 11);
    }
}
