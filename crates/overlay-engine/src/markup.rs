//! Owned markup tree for structured document content
//!
//! Structured content is XHTML-style markup: balanced tags, XML escapes and a
//! handful of named HTML entities. It is parsed into a [`Fragment`] (a list of
//! top-level nodes), rewritten by the overlay pass, and serialized back.

use quick_xml::escape::{escape, partial_escape, resolve_predefined_entity};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::MarkupError;

/// Elements serialized in self-closing form
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// XML's predefined entities plus the named HTML entities the document
/// converter is known to emit
fn resolve_entity(entity: &str) -> Option<&'static str> {
    resolve_predefined_entity(entity).or_else(|| resolve_html_entity(entity))
}

fn resolve_html_entity(entity: &str) -> Option<&'static str> {
    match entity {
        "nbsp" => Some("\u{a0}"),
        "sect" => Some("§"),
        "para" => Some("¶"),
        "copy" => Some("©"),
        "reg" => Some("®"),
        "trade" => Some("™"),
        "mdash" => Some("—"),
        "ndash" => Some("–"),
        "hellip" => Some("…"),
        "lsquo" => Some("‘"),
        "rsquo" => Some("’"),
        "ldquo" => Some("“"),
        "rdquo" => Some("”"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text(text: &str) -> Self {
        Node::Text(text.to_string())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    fn append_text_content(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                for child in &element.children {
                    child.append_text_content(out);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Attributes in source order
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, keeping its original position when it already exists
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self
                .attributes
                .push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(idx).1)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.append_text_content(&mut out);
        }
        out
    }
}

/// Parsed structured content: the top-level nodes in document order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

impl Fragment {
    pub fn parse(input: &str) -> Result<Self, MarkupError> {
        let mut reader = Reader::from_str(input);
        let mut stack: Vec<Element> = Vec::new();
        let mut fragment = Fragment::default();

        loop {
            let event = reader.read_event().map_err(|e| {
                MarkupError::Syntax(format!("at byte {}: {}", reader.buffer_position(), e))
            })?;

            match event {
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    push_node(&mut stack, &mut fragment, Node::Element(element));
                }
                Event::End(end) => {
                    let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    let element = stack
                        .pop()
                        .ok_or_else(|| MarkupError::UnexpectedEnd(name.clone()))?;
                    if element.name != name {
                        return Err(MarkupError::UnexpectedEnd(name));
                    }
                    push_node(&mut stack, &mut fragment, Node::Element(element));
                }
                Event::Text(text) => {
                    let text = text
                        .unescape_with(resolve_entity)
                        .map_err(|e| MarkupError::Syntax(e.to_string()))?;
                    push_text(&mut stack, &mut fragment, &text);
                }
                Event::CData(data) => {
                    let text = std::str::from_utf8(&data)
                        .map_err(|e| MarkupError::Syntax(e.to_string()))?;
                    push_text(&mut stack, &mut fragment, text);
                }
                Event::Eof => break,
                // Comments, declarations and processing instructions carry no text
                _ => {}
            }
        }

        match stack.pop() {
            Some(unclosed) => Err(MarkupError::Unclosed(unclosed.name)),
            None => Ok(fragment),
        }
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            write_node(node, &mut out);
        }
        out
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.append_text_content(&mut out);
        }
        out
    }

    /// Node addressed by a child-index path from the fragment root
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.nodes.get(*first)?;
        for idx in rest {
            node = match node {
                Node::Element(element) => element.children.get(*idx)?,
                Node::Text(_) => return None,
            };
        }
        Some(node)
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.nodes.get_mut(*first)?;
        for idx in rest {
            node = match node {
                Node::Element(element) => element.children.get_mut(*idx)?,
                Node::Text(_) => return None,
            };
        }
        Some(node)
    }

    /// Visit every element in document order
    pub fn for_each_element(&self, visit: &mut impl FnMut(&Element)) {
        fn walk(nodes: &[Node], visit: &mut impl FnMut(&Element)) {
            for node in nodes {
                if let Node::Element(element) = node {
                    visit(element);
                    walk(&element.children, visit);
                }
            }
        }
        walk(&self.nodes, visit);
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, MarkupError> {
    let mut element = Element::new(&String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|e| MarkupError::Syntax(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value_with(resolve_entity)
            .map_err(|e| MarkupError::Syntax(e.to_string()))?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn push_node(stack: &mut [Element], fragment: &mut Fragment, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => fragment.nodes.push(node),
    }
}

/// Append text, merging with a preceding text sibling
fn push_text(stack: &mut [Element], fragment: &mut Fragment, text: &str) {
    if text.is_empty() {
        return;
    }
    let siblings = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => &mut fragment.nodes,
    };
    match siblings.last_mut() {
        Some(Node::Text(existing)) => existing.push_str(text),
        _ => siblings.push(Node::text(text)),
    }
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&partial_escape(text.as_str())),
        Node::Element(element) => {
            out.push('<');
            out.push_str(&element.name);
            for (key, value) in &element.attributes {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape(value.as_str()));
                out.push('"');
            }
            if element.children.is_empty() && VOID_ELEMENTS.contains(&element.name.as_str()) {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in &element.children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(&element.name);
            out.push('>');
        }
    }
}
