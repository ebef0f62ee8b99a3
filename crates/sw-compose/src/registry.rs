//! Renderer registry.
//!
//! Maps component tag names to renderers. A registry is built once with
//! [`RegistryBuilder`] and is read-only afterwards; the composer only ever
//! looks entries up.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::ghost::GHOST_ROOT_TAG;
use crate::renderer::{BoxError, Renderer};

/// Registered renderer for one component tag.
#[derive(Clone)]
pub struct RendererEntry {
    tag_name: String,
    renderer: Arc<dyn Renderer>,
}

impl RendererEntry {
    /// Lowercase tag name this entry is registered under.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Invoke the renderer.
    pub async fn render(&self) -> Result<String, BoxError> {
        self.renderer.render().await
    }
}

impl fmt::Debug for RendererEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererEntry")
            .field("tag_name", &self.tag_name)
            .finish_non_exhaustive()
    }
}

/// Immutable mapping from tag name to renderer.
#[derive(Debug, Clone, Default)]
pub struct RendererRegistry {
    entries: HashMap<String, RendererEntry>,
}

impl RendererRegistry {
    /// Start building a registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Look up the renderer for a tag. Comparison is case-insensitive.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&RendererEntry> {
        if tag.chars().any(char::is_uppercase) {
            self.entries.get(&tag.to_lowercase())
        } else {
            self.entries.get(tag)
        }
    }

    /// True if a renderer is registered for the tag.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// Number of registered renderers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no renderer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered tag names, sorted.
    #[must_use]
    pub fn tag_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Builder for [`RendererRegistry`].
///
/// Registering the same tag twice keeps the later renderer.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<(String, Arc<dyn Renderer>)>,
}

impl RegistryBuilder {
    /// Register a renderer for a tag.
    #[must_use]
    pub fn register(self, tag: impl AsRef<str>, renderer: impl Renderer + 'static) -> Self {
        self.register_shared(tag, Arc::new(renderer))
    }

    /// Register an already shared renderer for a tag.
    #[must_use]
    pub fn register_shared(mut self, tag: impl AsRef<str>, renderer: Arc<dyn Renderer>) -> Self {
        self.entries.push((tag.as_ref().trim().to_lowercase(), renderer));
        self
    }

    /// Finish the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a tag is empty or reserved by the composer.
    pub fn build(self) -> Result<RendererRegistry, RegistryError> {
        let mut entries = HashMap::with_capacity(self.entries.len());
        for (tag_name, renderer) in self.entries {
            if tag_name.is_empty() {
                return Err(RegistryError::EmptyTag);
            }
            if tag_name == GHOST_ROOT_TAG {
                return Err(RegistryError::ReservedTag(tag_name));
            }
            let entry = RendererEntry {
                tag_name: tag_name.clone(),
                renderer,
            };
            entries.insert(tag_name, entry);
        }

        tracing::debug!(count = entries.len(), "Built renderer registry");
        Ok(RendererRegistry { entries })
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<&str> = self.entries.iter().map(|(tag, _)| tag.as_str()).collect();
        f.debug_struct("RegistryBuilder").field("tags", &tags).finish()
    }
}
