//! Markup tree model with parsing and serialization.
//!
//! The tree is deliberately small: a [`Node`] is either text or an
//! [`Element`]. Parsing and serialization are exposed as two capability
//! traits, [`MarkupParser`] and [`MarkupSerializer`], so composition code can
//! be driven by any conforming implementation. [`XmlMarkup`] is the bundled
//! one, built on quick-xml.
//!
//! # Example
//!
//! ```
//! use sw_markup::{MarkupParser, MarkupSerializer, XmlMarkup};
//!
//! let markup = XmlMarkup::new();
//! let nodes = markup.parse_fragment("<div class=\"x\">Hi</div>").unwrap();
//! assert_eq!(markup.serialize(&nodes), "<div class=\"x\">Hi</div>");
//! ```

mod entities;
mod error;
mod node;
mod parser;
mod serializer;

pub use error::MarkupError;
pub use node::{
    Attributes, Element, Node, element_at_path, element_at_path_mut, find_element_path,
};
pub use parser::{DEFAULT_MAX_DEPTH, XmlParser};
pub use serializer::XmlSerializer;

/// Turns a markup string into a node sequence.
pub trait MarkupParser {
    /// Parse a markup fragment into its top-level nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the markup is not well-formed.
    fn parse_fragment(&self, markup: &str) -> Result<Vec<Node>, MarkupError>;
}

/// Turns a node sequence back into a markup string.
pub trait MarkupSerializer {
    /// Serialize nodes in order.
    fn serialize(&self, nodes: &[Node]) -> String;
}

/// quick-xml backed parser and serializer.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlMarkup {
    parser: XmlParser,
    serializer: XmlSerializer,
}

impl XmlMarkup {
    /// Create a new markup capability.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarkupParser for XmlMarkup {
    fn parse_fragment(&self, markup: &str) -> Result<Vec<Node>, MarkupError> {
        self.parser.parse(markup)
    }
}

impl MarkupSerializer for XmlMarkup {
    fn serialize(&self, nodes: &[Node]) -> String {
        self.serializer.serialize(nodes)
    }
}
