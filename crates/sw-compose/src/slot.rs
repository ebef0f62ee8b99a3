//! Slotted content redistribution.
//!
//! A rendered fragment has at most one insertion point honored: the first
//! element, in document order, whose tag is the configured slot tag. The
//! marker's original children are composed into it. Without an insertion
//! point the children are dropped without being composed, so renderers nested
//! in them are never invoked.

use sw_markup::{Element, MarkupParser, MarkupSerializer, Node, element_at_path_mut, find_element_path};

use crate::composer::Composer;
use crate::error::ComposeError;
use crate::registry::RendererRegistry;

/// The slot element chosen in a rendered fragment.
pub(crate) struct InsertionPoint<'f> {
    pub(crate) slot: &'f mut Element,
    /// Nesting level of the slot inside the fragment, 1 for top level.
    pub(crate) depth: usize,
}

impl<M> Composer<M>
where
    M: MarkupParser + MarkupSerializer + Sync,
{
    /// Find the insertion point among a fragment's top-level nodes.
    pub(crate) fn insertion_point<'f>(&self, fragment: &'f mut [Node]) -> Option<InsertionPoint<'f>> {
        let path = find_element_path(fragment, &self.options.slot_tag)?;
        let slot = element_at_path_mut(fragment, &path)?;
        Some(InsertionPoint {
            slot,
            depth: path.len(),
        })
    }

    /// Compose `children` into `insertion_point`, or drop them if absent.
    ///
    /// `marker_depth` is the output nesting level of the marker element that
    /// receives the fragment. Composed children are appended after any
    /// fallback content the insertion point already has.
    pub(crate) async fn redistribute(
        &self,
        tag: &str,
        children: &[Node],
        insertion_point: Option<InsertionPoint<'_>>,
        marker_depth: usize,
        registry: &RendererRegistry,
    ) -> Result<(), ComposeError> {
        let Some(InsertionPoint { slot, depth }) = insertion_point else {
            if !children.is_empty() {
                tracing::debug!(
                    tag = %tag,
                    discarded = children.len(),
                    "No insertion point in fragment, dropping slotted content"
                );
            }
            return Ok(());
        };

        let child_depth = marker_depth + depth + 1;
        for child in children {
            self.compose_into(child, registry, &mut slot.children, child_depth)
                .await?;
        }
        Ok(())
    }
}
