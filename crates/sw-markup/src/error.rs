//! Error types for markup parsing.

/// Error raised when a markup string is not well-formed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MarkupError {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Invalid escape sequence in an attribute value.
    #[error("escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// Encoding error during XML parsing.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// End tag that does not close the innermost open element.
    #[error("unexpected end tag </{tag}>")]
    UnexpectedEnd {
        /// Tag name of the stray end tag.
        tag: String,
    },

    /// Entity reference that is neither numeric nor a known name.
    #[error("unknown entity &{name};")]
    UnknownEntity {
        /// Entity name as written.
        name: String,
    },

    /// Elements nested deeper than the parser allows.
    #[error("elements nested deeper than {max_depth} levels")]
    TooDeep {
        /// Nesting limit in effect.
        max_depth: usize,
    },

    /// Element still open when the input ended.
    #[error("unclosed element <{tag}>")]
    Unclosed {
        /// Tag name of the unclosed element.
        tag: String,
    },
}
