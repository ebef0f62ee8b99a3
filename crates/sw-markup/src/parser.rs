//! Strict XML-style markup parser built on quick-xml.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::io::BufRead;

use quick_xml::escape::{EscapeError, unescape_with};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::entities::{resolve_named, resolve_reference};
use crate::error::MarkupError;
use crate::node::{Attributes, Element, Node};

/// Parse markup into a sequence of top-level nodes.
///
/// Any markup that is not well-formed is rejected: mismatched or stray end
/// tags and elements left open at end of input are errors. Comments,
/// processing instructions, declarations and doctypes are skipped. Unknown
/// named entities are rejected in text and attribute values alike.
#[derive(Debug, Clone, Copy)]
pub struct XmlParser {
    max_depth: usize,
}

/// Default element nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 256;

impl Default for XmlParser {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl XmlParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser that rejects elements nested deeper than `max_depth`.
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Parse a markup fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if the markup is not well-formed, uses an unknown
    /// entity, or nests elements deeper than the configured limit.
    pub fn parse(&self, markup: &str) -> Result<Vec<Node>, MarkupError> {
        let mut reader = Reader::from_str(markup);
        reader.config_mut().trim_text(false);

        let nodes = self.parse_children(&mut reader, None, 0)?;
        tracing::trace!(len = markup.len(), nodes = nodes.len(), "Parsed markup");
        Ok(nodes)
    }

    fn parse_children<R: BufRead>(
        &self,
        reader: &mut Reader<R>,
        parent_tag: Option<&str>,
        depth: usize,
    ) -> Result<Vec<Node>, MarkupError> {
        let mut buf = Vec::new();
        let mut children = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    self.check_depth(depth + 1)?;
                    let mut element = self.decode_element(reader, &e)?;
                    let tag = element.tag().to_owned();
                    element.children = self.parse_children(reader, Some(&tag), depth + 1)?;
                    children.push(Node::Element(element));
                }
                Event::Empty(e) => {
                    self.check_depth(depth + 1)?;
                    children.push(Node::Element(self.decode_element(reader, &e)?));
                }
                Event::Text(e) => {
                    let text = reader.decoder().decode(&e)?;
                    push_text(&mut children, &text);
                }
                Event::GeneralRef(e) => {
                    let body = reader.decoder().decode(&e)?;
                    let text = resolve_reference(&body).ok_or_else(|| MarkupError::UnknownEntity {
                        name: body.into_owned(),
                    })?;
                    push_text(&mut children, &text);
                }
                Event::CData(e) => {
                    let text = reader.decoder().decode(&e)?;
                    push_text(&mut children, &text);
                }
                Event::End(e) => {
                    let tag = reader.decoder().decode(e.name().as_ref())?.to_lowercase();
                    return match parent_tag {
                        Some(parent) if parent == tag => Ok(children),
                        _ => Err(MarkupError::UnexpectedEnd { tag }),
                    };
                }
                Event::Eof => {
                    return match parent_tag {
                        Some(tag) => Err(MarkupError::Unclosed {
                            tag: tag.to_owned(),
                        }),
                        None => Ok(children),
                    };
                }
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
            buf.clear();
        }
    }

    fn check_depth(&self, depth: usize) -> Result<(), MarkupError> {
        if depth > self.max_depth {
            return Err(MarkupError::TooDeep {
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }

    fn decode_element<R: BufRead>(
        &self,
        reader: &Reader<R>,
        e: &BytesStart,
    ) -> Result<Element, MarkupError> {
        let name = e.name();
        let tag = reader.decoder().decode(name.as_ref())?;
        let mut element = Element::new(tag);
        element.attrs = self.decode_attrs(reader, e)?;
        Ok(element)
    }

    fn decode_attrs<R: BufRead>(
        &self,
        reader: &Reader<R>,
        e: &BytesStart,
    ) -> Result<Attributes, MarkupError> {
        let mut attrs = Attributes::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
            let raw = reader.decoder().decode(&attr.value)?;
            let value = unescape_with(&raw, resolve_named)
                .map_err(|err| match err {
                    EscapeError::UnrecognizedEntity(_, name) => MarkupError::UnknownEntity { name },
                    other => MarkupError::Escape(other),
                })?
                .into_owned();
            attrs.set(key, value);
        }
        Ok(attrs)
    }
}

/// Append text, merging with a preceding text node.
fn push_text(children: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = children.last_mut() {
        last.push_str(text);
    } else {
        children.push(Node::Text(text.to_owned()));
    }
}
