//! Renderers backed by configuration.
//!
//! These build the registry the `compose` command runs with: inline
//! fragments, fragment files, and an optional per-render timeout around
//! either.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sw_compose::{BoxError, RegistryError, Renderer, RendererRegistry};
use sw_config::{ComponentSource, Config};

/// Renders a fixed fragment.
pub(crate) struct StaticRenderer {
    fragment: String,
}

impl StaticRenderer {
    pub(crate) fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
        }
    }
}

#[async_trait]
impl Renderer for StaticRenderer {
    async fn render(&self) -> Result<String, BoxError> {
        Ok(self.fragment.clone())
    }
}

/// Reads the fragment from a file on every render.
pub(crate) struct FileRenderer {
    path: PathBuf,
}

impl FileRenderer {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Fragment file could not be read.
#[derive(Debug, thiserror::Error)]
#[error("failed to read fragment file {}: {source}", path.display())]
pub(crate) struct FragmentFileError {
    path: PathBuf,
    source: std::io::Error,
}

#[async_trait]
impl Renderer for FileRenderer {
    async fn render(&self) -> Result<String, BoxError> {
        tracing::debug!(path = %self.path.display(), "Reading fragment file");
        tokio::fs::read_to_string(&self.path).await.map_err(|source| {
            FragmentFileError {
                path: self.path.clone(),
                source,
            }
            .into()
        })
    }
}

/// Render call exceeded its time budget.
#[derive(Debug, thiserror::Error)]
#[error("render timed out after {} ms", .0.as_millis())]
pub(crate) struct RenderTimeout(Duration);

/// Bounds another renderer's latency.
pub(crate) struct TimeoutRenderer {
    inner: Arc<dyn Renderer>,
    timeout: Duration,
}

impl TimeoutRenderer {
    pub(crate) fn new(inner: Arc<dyn Renderer>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl Renderer for TimeoutRenderer {
    async fn render(&self) -> Result<String, BoxError> {
        match tokio::time::timeout(self.timeout, self.inner.render()).await {
            Ok(result) => result,
            Err(_) => Err(RenderTimeout(self.timeout).into()),
        }
    }
}

/// Build the renderer registry described by `config`.
pub(crate) fn build_registry(config: &Config) -> Result<RendererRegistry, RegistryError> {
    let timeout = config.compose.render_timeout_ms.map(Duration::from_millis);
    let mut builder = RendererRegistry::builder();

    for component in &config.components_resolved {
        let renderer: Arc<dyn Renderer> = match &component.source {
            ComponentSource::Inline(fragment) => Arc::new(StaticRenderer::new(fragment.clone())),
            ComponentSource::File(path) => Arc::new(FileRenderer::new(path.clone())),
        };
        let renderer: Arc<dyn Renderer> = match timeout {
            Some(timeout) => Arc::new(TimeoutRenderer::new(renderer, timeout)),
            None => renderer,
        };
        builder = builder.register_shared(&component.tag, renderer);
    }

    builder.build()
}
