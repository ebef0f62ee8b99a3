//! Markup serializer.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use crate::node::{Element, Node};

/// Elements that never have content and serialize self-closed.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Serialize a node sequence back to markup.
///
/// Non-void elements always get an explicit end tag, so `<slot></slot>`
/// survives a parse/serialize cycle unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlSerializer;

impl XmlSerializer {
    /// Create a new serializer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Serialize nodes to a markup string.
    pub fn serialize(&self, nodes: &[Node]) -> String {
        let mut out = String::with_capacity(1024);
        for node in nodes {
            serialize_node(node, &mut out);
        }
        out
    }
}

fn serialize_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => escape_into(text, false, out),
        Node::Element(element) => serialize_element(element, out),
    }
}

fn serialize_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(element.tag());

    for (name, value) in element.attrs.iter() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(value, true, out);
        out.push('"');
    }

    if element.children.is_empty() && VOID_ELEMENTS.contains(&element.tag()) {
        out.push_str(" />");
        return;
    }

    out.push('>');
    for child in &element.children {
        serialize_node(child, out);
    }
    out.push_str("</");
    out.push_str(element.tag());
    out.push('>');
}

/// Escape markup special characters into `out`.
fn escape_into(text: &str, escape_quotes: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if escape_quotes => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
