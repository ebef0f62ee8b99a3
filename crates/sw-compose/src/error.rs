//! Error types for composition.

use sw_markup::MarkupError;

use crate::renderer::BoxError;

/// Error that aborts a composition run.
///
/// Composition is fail-fast: the first error unwinds the whole traversal and
/// no partial tree is returned.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ComposeError {
    /// The input markup is not well-formed.
    #[error("failed to parse input markup: {0}")]
    Parse(#[source] MarkupError),

    /// A registered renderer failed.
    #[error("renderer for <{tag}> failed: {source}")]
    Render {
        /// Tag name of the marker element.
        tag: String,
        /// Error returned by the renderer.
        source: BoxError,
    },

    /// A renderer returned markup that could not be parsed.
    #[error("renderer for <{tag}> returned malformed markup: {source}")]
    FragmentParse {
        /// Tag name of the marker element.
        tag: String,
        /// Fragment text as returned by the renderer.
        fragment: String,
        /// Parse error.
        source: MarkupError,
    },

    /// Output elements would nest deeper than the configured limit.
    #[error("composed markup nests deeper than {max_depth} levels")]
    TooDeep {
        /// Nesting limit in effect.
        max_depth: usize,
    },
}

/// Error building a [`RendererRegistry`](crate::RendererRegistry).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    /// A renderer was registered under an empty tag name.
    #[error("component tag name cannot be empty")]
    EmptyTag,

    /// A renderer was registered under a tag the composer reserves.
    #[error("<{0}> is reserved and cannot be registered")]
    ReservedTag(String),
}
