use mina_model::{Attributes, ContainerNode, EditorNode, Formats, NodeType, Styles, TextNode};
use std::collections::BTreeMap;
use tracing::debug;

/// Extra classes appended to every node of a type
pub type ClassMap = BTreeMap<NodeType, String>;

/// Spacing utilities added by [`enhance_spaces`]
pub const ENHANCE_SPACES_CLASS: &str = "[&>*]:my-3 [&_*]:my-5";

/// Attribute keys that drive presentation classes instead of being emitted
const LAYOUT_KEYS: &[&str] = &["layoutType", "gap", "flexWrap", "columns", "className"];

/// Options for HTML compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Caller classes per node type
    pub class_map: ClassMap,
    /// Emit the root's children without the root element
    pub fragment: bool,
    /// Wrap the output with [`ENHANCE_SPACES_CLASS`]
    pub enhance_spaces: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            class_map: ClassMap::new(),
            fragment: false,
            enhance_spaces: false,
        }
    }
}

impl CompileOptions {
    /// Single-line output
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }
}

struct Context<'a> {
    options: &'a CompileOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Compile a node and its subtree to HTML
pub fn compile_to_html(node: &EditorNode, options: CompileOptions) -> String {
    let mut ctx = Context::new(&options);

    if options.fragment {
        match node {
            EditorNode::Container(container) => {
                for child in &container.children {
                    compile_node(child, &mut ctx);
                }
            }
            EditorNode::Text(text) => {
                let inner = inline_html(text, &options.class_map);
                ctx.add_line(&inner);
            }
        }
    } else {
        compile_node(node, &mut ctx);
    }

    let html = ctx.get_output();
    debug!(
        root = node.id(),
        fragment = options.fragment,
        bytes = html.len(),
        "Compiled HTML"
    );

    if !options.enhance_spaces {
        return html;
    }

    let wrapped = enhance_spaces(html.trim_end());
    if options.pretty {
        wrapped + "\n"
    } else {
        wrapped
    }
}

/// Whole tree, root included, on one line
pub fn serialize_to_html(container: &EditorNode) -> String {
    compile_to_html(container, CompileOptions::compact())
}

/// Children of the root only, without a wrapper element
pub fn serialize_to_html_fragment(container: &EditorNode) -> String {
    compile_to_html(
        container,
        CompileOptions {
            fragment: true,
            ..CompileOptions::compact()
        },
    )
}

/// Like [`serialize_to_html`], appending `class_map` classes per node type
pub fn serialize_to_html_with_class(container: &EditorNode, class_map: &ClassMap) -> String {
    compile_to_html(
        container,
        CompileOptions {
            class_map: class_map.clone(),
            ..CompileOptions::compact()
        },
    )
}

/// Wrap rendered HTML in a div carrying the spacing utilities
pub fn enhance_spaces(html: &str) -> String {
    format!("<div class=\"{}\">{}</div>", ENHANCE_SPACES_CLASS, html)
}

fn compile_node(node: &EditorNode, ctx: &mut Context<'_>) {
    match node {
        EditorNode::Container(container) => compile_container(container, ctx),
        EditorNode::Text(text) => compile_text_block(text, ctx),
    }
}

fn compile_container(container: &ContainerNode, ctx: &mut Context<'_>) {
    let tag = tag_name(container.node_type);
    let attributes = render_attributes(
        container.node_type,
        &container.attributes,
        None,
        &ctx.options.class_map,
    );

    if container.children.is_empty() {
        ctx.add_line(&format!("<{}{}></{}>", tag, attributes, tag));
        return;
    }

    ctx.add_line(&format!("<{}{}>", tag, attributes));
    ctx.indent();
    for child in &container.children {
        compile_node(child, ctx);
    }
    ctx.dedent();
    ctx.add_line(&format!("</{}>", tag));
}

/// Text blocks always render on a single line
fn compile_text_block(text: &TextNode, ctx: &mut Context<'_>) {
    let line = text_html(text, &ctx.options.class_map);
    ctx.add_line(&line);
}

fn text_html(text: &TextNode, class_map: &ClassMap) -> String {
    let tag = tag_name(text.node_type);
    let attributes = render_attributes(text.node_type, &text.attributes, Some(&text.styles), class_map);

    if is_self_closing(tag) {
        return format!("<{}{} />", tag, attributes);
    }

    format!("<{}{}>{}</{}>", tag, attributes, inline_html(text, class_map), tag)
}

/// Content of a text node: escaped text or its runs, wrapped in format tags
fn inline_html(text: &TextNode, class_map: &ClassMap) -> String {
    let body = if text.is_leaf() {
        escape_html(&text.content)
    } else {
        text.children
            .iter()
            .map(|run| run_html(run, class_map))
            .collect()
    };
    wrap_formats(&text.formats, body)
}

fn run_html(run: &EditorNode, class_map: &ClassMap) -> String {
    match run {
        EditorNode::Text(run) => {
            // Bare spans only carry formatting; their tags add nothing
            let bare_span = run.node_type == NodeType::Span
                && run.styles.is_empty()
                && render_attributes(run.node_type, &run.attributes, None, class_map).is_empty();

            if bare_span {
                inline_html(run, class_map)
            } else {
                text_html(run, class_map)
            }
        }
        EditorNode::Container(container) => {
            let options = CompileOptions {
                class_map: class_map.clone(),
                ..CompileOptions::compact()
            };
            let mut ctx = Context::new(&options);
            compile_container(container, &mut ctx);
            ctx.get_output()
        }
    }
}

/// Nesting order, outermost first: strong, em, u, s, code
fn wrap_formats(formats: &Formats, body: String) -> String {
    if body.is_empty() {
        return body;
    }

    let layers = [
        (formats.code, "code"),
        (formats.strikethrough, "s"),
        (formats.underline, "u"),
        (formats.italic, "em"),
        (formats.bold, "strong"),
    ];

    layers
        .iter()
        .filter(|(enabled, _)| *enabled)
        .fold(body, |html, (_, tag)| format!("<{}>{}</{}>", tag, html, tag))
}

fn tag_name(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Container => "div",
        NodeType::Code => "pre",
        other => other.as_str(),
    }
}

/// ` class=".." key=".." style=".."` with keys sorted, class first and
/// style last. Empty when there is nothing to emit.
fn render_attributes(
    node_type: NodeType,
    attributes: &Attributes,
    styles: Option<&Styles>,
    class_map: &ClassMap,
) -> String {
    let mut classes = layout_classes(attributes);
    for key in ["class", "className"] {
        if let Some(value) = attributes.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
            classes.push(value.to_string());
        }
    }
    if let Some(extra) = class_map.get(&node_type).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        classes.push(extra.to_string());
    }

    let mut output = String::new();
    if !classes.is_empty() {
        output.push_str(&format!(" class=\"{}\"", escape_html(&classes.join(" "))));
    }

    for (name, value) in attributes {
        if name == "class" || name == "style" || LAYOUT_KEYS.contains(&name.as_str()) {
            continue;
        }
        if !is_valid_attribute_name(name) {
            continue;
        }
        output.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
    }

    if let Some(style) = style_attribute(attributes.get("style"), styles) {
        output.push_str(&format!(" style=\"{}\"", escape_html(&style)));
    }

    output
}

fn layout_classes(attributes: &Attributes) -> Vec<String> {
    let gap = attributes.get("gap").map(|gap| format!("gap-{}", gap));

    match attributes.get("layoutType").map(String::as_str) {
        Some("flex") => {
            let mut classes = vec!["flex".to_string()];
            classes.extend(gap);
            if attributes.get("flexWrap").map(String::as_str) == Some("wrap") {
                classes.push("flex-wrap".to_string());
            }
            classes
        }
        Some("grid") => {
            let mut classes = vec!["grid".to_string()];
            if let Some(columns) = attributes.get("columns") {
                classes.push(format!("grid-cols-{}", columns));
            }
            classes.extend(gap);
            classes
        }
        _ => Vec::new(),
    }
}

fn style_attribute(inline: Option<&String>, styles: Option<&Styles>) -> Option<String> {
    let mut declarations = Vec::new();

    if let Some(inline) = inline.map(|s| s.trim().trim_end_matches(';').trim()) {
        if !inline.is_empty() {
            declarations.push(inline.to_string());
        }
    }

    for (property, value) in styles.into_iter().flatten() {
        declarations.push(format!("{}: {}", kebab_case(property), value));
    }

    if declarations.is_empty() {
        None
    } else {
        Some(declarations.join("; "))
    }
}

/// `fontSize` → `font-size`
fn kebab_case(property: &str) -> String {
    let mut output = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            output.push('-');
            output.push(c.to_ascii_lowercase());
        } else {
            output.push(c);
        }
    }
    output
}

fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn is_self_closing(tag: &str) -> bool {
    matches!(tag, "img" | "br")
}
