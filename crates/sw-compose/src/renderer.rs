//! Component renderer abstraction.

use std::future::Future;

use async_trait::async_trait;

/// Boxed error returned by renderers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Produces the server-rendered markup fragment for one component.
///
/// The returned fragment may wrap its content in whatever construct the
/// client-side framework expects; the composer only looks inside it for an
/// insertion point.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render the component to a markup fragment.
    async fn render(&self) -> Result<String, BoxError>;
}

/// Renderer built from an opaque factory value and a render function.
///
/// The factory is whatever the component framework needs to produce output
/// (an application instance, a template, a counter); `render` is called with
/// a reference to it on every invocation.
///
/// ```
/// use sw_compose::{BoxError, FactoryRenderer};
///
/// let renderer = FactoryRenderer::new("World", |name: &&str| {
///     let fragment = format!("<p>Hello {name}</p>");
///     async move { Ok::<_, BoxError>(fragment) }
/// });
/// ```
pub struct FactoryRenderer<F, R> {
    factory: F,
    render: R,
}

impl<F, R> FactoryRenderer<F, R> {
    /// Create a renderer from a factory value and render function.
    pub fn new(factory: F, render: R) -> Self {
        Self { factory, render }
    }

    /// The factory value.
    pub fn factory(&self) -> &F {
        &self.factory
    }
}

impl<F: std::fmt::Debug, R> std::fmt::Debug for FactoryRenderer<F, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryRenderer")
            .field("factory", &self.factory)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, R, Fut> Renderer for FactoryRenderer<F, R>
where
    F: Send + Sync,
    R: Fn(&F) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, BoxError>> + Send,
{
    async fn render(&self) -> Result<String, BoxError> {
        (self.render)(&self.factory).await
    }
}
