//! Recursive tree composition.
//!
//! The composer walks the input tree depth-first and builds a new output
//! tree. Each node falls into one of three classes:
//!
//! - text: copied as-is;
//! - marker: an element whose tag is registered; its body is replaced by the
//!   rendered fragment and its original children are moved into the
//!   fragment's insertion point (see [`crate::slot`]);
//! - generic: any other element; copied with its children composed in order.
//!
//! Siblings are processed strictly one after another, so renderers are
//! invoked in document order. A node is attached to its parent only once its
//! whole subtree is complete.
//!
//! Elements nested deeper than [`ComposeOptions::max_depth`] in the output
//! tree abort the run with [`ComposeError::TooDeep`].

use futures::FutureExt;
use futures::future::BoxFuture;
use sw_markup::{Element, MarkupParser, MarkupSerializer, Node, XmlMarkup};

use crate::error::ComposeError;
use crate::ghost::GhostRoot;
use crate::registry::{RendererEntry, RendererRegistry};

/// Default insertion-point tag.
pub const DEFAULT_SLOT_TAG: &str = "slot";

/// Default output nesting limit.
pub const DEFAULT_MAX_COMPOSE_DEPTH: usize = 256;

/// Composition options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Tag of the insertion-point element inside rendered fragments.
    pub slot_tag: String,
    /// Deepest element nesting allowed in the output tree. Slot content
    /// counts from the slot's position inside its fragment.
    pub max_depth: usize,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            slot_tag: DEFAULT_SLOT_TAG.to_owned(),
            max_depth: DEFAULT_MAX_COMPOSE_DEPTH,
        }
    }
}

/// Composes component fragments into markup trees.
///
/// The registry is passed to every call rather than stored, so one composer
/// can serve different registries.
#[derive(Debug, Clone, Default)]
pub struct Composer<M = XmlMarkup> {
    pub(crate) markup: M,
    pub(crate) options: ComposeOptions,
}

impl Composer<XmlMarkup> {
    /// Composer using the bundled quick-xml markup implementation.
    #[must_use]
    pub fn xml() -> Self {
        Self::default()
    }
}

impl<M> Composer<M>
where
    M: MarkupParser + MarkupSerializer + Sync,
{
    /// Create a composer with default options.
    pub fn new(markup: M) -> Self {
        Self::with_options(markup, ComposeOptions::default())
    }

    /// Create a composer with explicit options.
    pub fn with_options(markup: M, mut options: ComposeOptions) -> Self {
        options.slot_tag = options.slot_tag.to_lowercase();
        Self { markup, options }
    }

    /// Composition options in effect.
    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    /// Compose a single tree.
    ///
    /// The input is left untouched; the result is a fresh tree.
    pub async fn compose(
        &self,
        node: &Node,
        registry: &RendererRegistry,
    ) -> Result<Node, ComposeError> {
        let mut ghost = GhostRoot::new();
        self.compose_into(node, registry, ghost.children_mut(), 1)
            .await?;
        Ok(ghost.into_single())
    }

    /// Compose a sequence of top-level nodes, in order.
    pub async fn compose_nodes(
        &self,
        nodes: &[Node],
        registry: &RendererRegistry,
    ) -> Result<Vec<Node>, ComposeError> {
        let mut ghost = GhostRoot::new();
        for node in nodes {
            self.compose_into(node, registry, ghost.children_mut(), 1)
                .await?;
        }
        Ok(ghost.into_children())
    }

    /// Parse markup, compose it and serialize the result.
    ///
    /// # Errors
    ///
    /// Fails if the input does not parse, or with the first renderer or
    /// fragment error encountered. No output is produced on failure.
    pub async fn compose_markup(
        &self,
        markup: &str,
        registry: &RendererRegistry,
    ) -> Result<String, ComposeError> {
        let nodes = self
            .markup
            .parse_fragment(markup)
            .map_err(ComposeError::Parse)?;
        let composed = self.compose_nodes(&nodes, registry).await?;
        let output = self.markup.serialize(&composed);

        tracing::info!(
            input_len = markup.len(),
            output_len = output.len(),
            "Composed markup"
        );
        Ok(output)
    }

    /// Compose `node` and attach the result to `parent`.
    ///
    /// `depth` is the nesting level `node` lands at in the output tree,
    /// starting at 1 for top-level nodes. Attaching is the last step, after
    /// rendering, redistribution and attribute copying have all finished.
    pub(crate) fn compose_into<'a>(
        &'a self,
        node: &'a Node,
        registry: &'a RendererRegistry,
        parent: &'a mut Vec<Node>,
        depth: usize,
    ) -> BoxFuture<'a, Result<(), ComposeError>> {
        async move {
            let composed = match node {
                Node::Text(text) => Node::Text(text.clone()),
                Node::Element(element) => {
                    if depth > self.options.max_depth {
                        return Err(ComposeError::TooDeep {
                            max_depth: self.options.max_depth,
                        });
                    }
                    let mut output = match registry.get(element.tag()) {
                        Some(entry) => {
                            self.compose_marker(element, entry, registry, depth)
                                .await?
                        }
                        None => self.compose_generic(element, registry, depth).await?,
                    };
                    copy_attributes(element, &mut output);
                    Node::Element(output)
                }
            };
            parent.push(composed);
            Ok(())
        }
        .boxed()
    }

    async fn compose_marker(
        &self,
        element: &Element,
        entry: &RendererEntry,
        registry: &RendererRegistry,
        depth: usize,
    ) -> Result<Element, ComposeError> {
        let tag = element.tag();
        tracing::debug!(tag = %tag, "Rendering component");

        let fragment = entry.render().await.map_err(|source| ComposeError::Render {
            tag: tag.to_owned(),
            source,
        })?;

        let mut rendered = match self.markup.parse_fragment(&fragment) {
            Ok(nodes) => nodes,
            Err(source) => {
                return Err(ComposeError::FragmentParse {
                    tag: tag.to_owned(),
                    fragment,
                    source,
                });
            }
        };

        let insertion_point = self.insertion_point(&mut rendered);
        self.redistribute(tag, &element.children, insertion_point, depth, registry)
            .await?;

        Ok(Element::new(tag).with_children(rendered))
    }

    async fn compose_generic(
        &self,
        element: &Element,
        registry: &RendererRegistry,
        depth: usize,
    ) -> Result<Element, ComposeError> {
        let mut output = Element::new(element.tag());
        for child in &element.children {
            self.compose_into(child, registry, &mut output.children, depth + 1)
                .await?;
        }
        Ok(output)
    }
}

/// Copy every attribute by value, keeping order.
fn copy_attributes(from: &Element, to: &mut Element) {
    for (name, value) in from.attrs.iter() {
        to.attrs.set(name, value);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::renderer::{BoxError, FactoryRenderer, Renderer};

    /// Renderer returning a fixed fragment and logging each call.
    struct Recording {
        name: &'static str,
        fragment: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl Renderer for Recording {
        async fn render(&self) -> Result<String, BoxError> {
            self.log.lock().unwrap().push(self.name);
            Ok(self.fragment.to_owned())
        }
    }

    struct Failing;

    #[async_trait]
    impl Renderer for Failing {
        async fn render(&self) -> Result<String, BoxError> {
            Err("backend unavailable".into())
        }
    }

    struct Registry {
        log: Arc<Mutex<Vec<&'static str>>>,
        builder: crate::registry::RegistryBuilder,
    }

    impl Registry {
        fn new() -> Self {
            Self {
                log: Arc::default(),
                builder: RendererRegistry::builder(),
            }
        }

        fn with(mut self, tag: &'static str, fragment: &'static str) -> Self {
            let renderer = Recording {
                name: tag,
                fragment,
                log: Arc::clone(&self.log),
            };
            self.builder = self.builder.register(tag, renderer);
            self
        }

        fn build(self) -> (RendererRegistry, Arc<Mutex<Vec<&'static str>>>) {
            (self.builder.build().unwrap(), self.log)
        }
    }

    async fn compose(markup: &str, registry: &RendererRegistry) -> Result<String, ComposeError> {
        Composer::xml().compose_markup(markup, registry).await
    }

    #[tokio::test]
    async fn test_marker_children_moved_into_slot() {
        let (registry, _) = Registry::new()
            .with("app-example", "<button><slot></slot> 1</button>")
            .build();

        let output = compose("<app-example>Mario</app-example>", &registry)
            .await
            .unwrap();
        assert_eq!(
            output,
            "<app-example><button><slot>Mario</slot> 1</button></app-example>"
        );
    }

    #[tokio::test]
    async fn test_children_discarded_without_slot() {
        let (registry, _) = Registry::new()
            .with("app-example", "<button>1</button>")
            .build();

        let output = compose("<app-example>Mario</app-example>", &registry)
            .await
            .unwrap();
        assert_eq!(output, "<app-example><button>1</button></app-example>");
    }

    #[tokio::test]
    async fn test_marker_inside_generic_wrapper() {
        let (registry, _) = Registry::new()
            .with("app-example", "<button><slot></slot> 1</button>")
            .build();

        let output = compose("<div><app-example>Mario</app-example></div>", &registry)
            .await
            .unwrap();
        assert_eq!(
            output,
            "<div><app-example><button><slot>Mario</slot> 1</button></app-example></div>"
        );
    }

    #[tokio::test]
    async fn test_unregistered_tree_is_identity() {
        let (registry, log) = Registry::new().with("x-unused", "<b></b>").build();
        let source = "<main id=\"m\"><h1 class=\"t\">Title</h1>\n<p>a &amp; b<br /></p><custom-el data-x=\"1\"></custom-el></main>";

        let output = compose(source, &registry).await.unwrap();
        assert_eq!(output, source);
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_compose_tree_matches_input_structure() {
        let input: Node = Element::new("section")
            .with_attr("id", "s")
            .with_child(Element::new("p").with_child("text"))
            .into();

        let output = Composer::xml()
            .compose(&input, &RendererRegistry::default())
            .await
            .unwrap();
        assert_eq!(output, input);
    }

    #[tokio::test]
    async fn test_marker_attributes_preserved_in_order() {
        let (registry, _) = Registry::new().with("app-example", "<i></i>").build();

        let output = compose(
            r#"<app-example id="a" class="b" data-z="c">x</app-example>"#,
            &registry,
        )
        .await
        .unwrap();
        assert_eq!(
            output,
            r#"<app-example id="a" class="b" data-z="c"><i></i></app-example>"#
        );
    }

    #[tokio::test]
    async fn test_renderers_invoked_in_document_order() {
        let (registry, log) = Registry::new()
            .with("x-one", "<div><slot></slot></div>")
            .with("x-two", "<span></span>")
            .with("x-three", "<em></em>")
            .build();

        compose(
            "<x-three></x-three><x-one><p><x-two></x-two></p><x-three></x-three></x-one><x-two></x-two>",
            &registry,
        )
        .await
        .unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["x-three", "x-one", "x-two", "x-three", "x-two"]
        );
    }

    #[tokio::test]
    async fn test_counter_renderer_sees_document_order() {
        let counter = FactoryRenderer::new(Arc::new(AtomicUsize::new(0)), |count: &Arc<AtomicUsize>| {
            let n = count.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok::<_, BoxError>(format!("<button><slot></slot> {n}</button>")) }
        });
        let registry = RendererRegistry::builder()
            .register("app-example", counter)
            .build()
            .unwrap();

        let output = compose(
            "<ul><li><app-example>A</app-example></li><li><app-example>B</app-example></li></ul>",
            &registry,
        )
        .await
        .unwrap();
        assert_eq!(
            output,
            "<ul><li><app-example><button><slot>A</slot> 1</button></app-example></li>\
             <li><app-example><button><slot>B</slot> 2</button></app-example></li></ul>"
        );
    }

    #[tokio::test]
    async fn test_nested_markers_composed_inside_slot() {
        let (registry, _) = Registry::new()
            .with("x-card", "<article><slot></slot></article>")
            .with("x-badge", "<b>new</b>")
            .build();

        let output = compose("<x-card><h2>T</h2><x-badge>ignored</x-badge></x-card>", &registry)
            .await
            .unwrap();
        assert_eq!(
            output,
            "<x-card><article><slot><h2>T</h2><x-badge><b>new</b></x-badge></slot></article></x-card>"
        );
    }

    #[tokio::test]
    async fn test_discarded_children_never_rendered() {
        let (registry, log) = Registry::new()
            .with("x-outer", "<div>no slot</div>")
            .with("x-inner", "<p>inner</p>")
            .build();

        let output = compose("<x-outer><x-inner>Mario</x-inner></x-outer>", &registry)
            .await
            .unwrap();
        assert_eq!(output, "<x-outer><div>no slot</div></x-outer>");
        assert!(!output.contains("inner"));
        assert!(!output.contains("Mario"));
        assert_eq!(*log.lock().unwrap(), vec!["x-outer"]);
    }

    #[tokio::test]
    async fn test_only_first_slot_used() {
        let (registry, _) = Registry::new()
            .with(
                "x-two-slots",
                r#"<div><p><slot id="first"></slot></p><slot id="second"></slot></div>"#,
            )
            .build();

        let output = compose("<x-two-slots>content</x-two-slots>", &registry)
            .await
            .unwrap();
        assert_eq!(
            output,
            r#"<x-two-slots><div><p><slot id="first">content</slot></p><slot id="second"></slot></div></x-two-slots>"#
        );
    }

    #[tokio::test]
    async fn test_slot_fallback_content_kept_before_children() {
        let (registry, _) = Registry::new()
            .with("x-label", "<label><slot>Default</slot></label>")
            .build();

        let output = compose("<x-label>, custom</x-label>", &registry)
            .await
            .unwrap();
        assert_eq!(
            output,
            "<x-label><label><slot>Default, custom</slot></label></x-label>"
        );
    }

    #[tokio::test]
    async fn test_top_level_slot_fragment() {
        let (registry, _) = Registry::new().with("x-bare", "<slot></slot>").build();

        let output = compose("<x-bare><i>a</i>b</x-bare>", &registry)
            .await
            .unwrap();
        assert_eq!(output, "<x-bare><slot><i>a</i>b</slot></x-bare>");
    }

    #[tokio::test]
    async fn test_multi_node_fragment() {
        let (registry, _) = Registry::new()
            .with("x-pair", "<style>b{}</style><b><slot></slot></b>")
            .build();

        let output = compose("<x-pair>hi</x-pair>", &registry).await.unwrap();
        assert_eq!(
            output,
            "<x-pair><style>b{}</style><b><slot>hi</slot></b></x-pair>"
        );
    }

    #[tokio::test]
    async fn test_fragment_markers_not_composed() {
        let (registry, log) = Registry::new()
            .with("x-outer", "<x-inner></x-inner>")
            .with("x-inner", "<p>inner</p>")
            .build();

        let output = compose("<x-outer></x-outer>", &registry).await.unwrap();
        assert_eq!(output, "<x-outer><x-inner></x-inner></x-outer>");
        assert_eq!(*log.lock().unwrap(), vec!["x-outer"]);
    }

    #[tokio::test]
    async fn test_custom_slot_tag() {
        let (registry, _) = Registry::new()
            .with("x-box", "<div><slot></slot><content></content></div>")
            .build();
        let composer = Composer::with_options(
            XmlMarkup::new(),
            ComposeOptions {
                slot_tag: "Content".to_owned(),
                ..ComposeOptions::default()
            },
        );

        let output = composer
            .compose_markup("<x-box>z</x-box>", &registry)
            .await
            .unwrap();
        assert_eq!(
            output,
            "<x-box><div><slot></slot><content>z</content></div></x-box>"
        );
    }

    #[tokio::test]
    async fn test_text_nodes_copied() {
        let (registry, _) = Registry::new().build();
        let output = compose("lead <b>bold</b> tail", &registry).await.unwrap();
        assert_eq!(output, "lead <b>bold</b> tail");
    }

    #[tokio::test]
    async fn test_render_failure_aborts() {
        let log: Arc<Mutex<Vec<&'static str>>> = Arc::default();
        let registry = RendererRegistry::builder()
            .register("x-broken", Failing)
            .register(
                "x-after",
                Recording {
                    name: "x-after",
                    fragment: "<p></p>",
                    log: Arc::clone(&log),
                },
            )
            .build()
            .unwrap();

        let err = compose("<div><x-broken></x-broken></div><x-after></x-after>", &registry)
            .await
            .unwrap_err();

        match err {
            ComposeError::Render { tag, source } => {
                assert_eq!(tag, "x-broken");
                assert_eq!(source.to_string(), "backend unavailable");
            }
            other => panic!("Expected ComposeError::Render, got {other:?}"),
        }
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_fragment_aborts() {
        let (registry, _) = Registry::new()
            .with("x-bad", "<div><span></div>")
            .build();

        let err = compose("<section><x-bad></x-bad></section>", &registry)
            .await
            .unwrap_err();

        match err {
            ComposeError::FragmentParse { tag, fragment, .. } => {
                assert_eq!(tag, "x-bad");
                assert_eq!(fragment, "<div><span></div>");
            }
            other => panic!("Expected ComposeError::FragmentParse, got {other:?}"),
        }
    }

    fn nested_tree(depth: usize) -> Node {
        let mut node = Node::text("leaf");
        for _ in 0..depth {
            node = Element::new("div").with_child(node).into();
        }
        node
    }

    #[tokio::test]
    async fn test_deep_tree_rejected() {
        let registry = RendererRegistry::default();
        let composer = Composer::xml();

        let ok = composer
            .compose(&nested_tree(DEFAULT_MAX_COMPOSE_DEPTH), &registry)
            .await;
        assert!(ok.is_ok());

        let err = composer
            .compose(&nested_tree(DEFAULT_MAX_COMPOSE_DEPTH + 1), &registry)
            .await
            .unwrap_err();
        assert!(
            matches!(err, ComposeError::TooDeep { max_depth: DEFAULT_MAX_COMPOSE_DEPTH }),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_deep_markup_rejected_by_parser() {
        let (registry, _) = Registry::new().build();
        let markup = format!("{}x{}", "<div>".repeat(1000), "</div>".repeat(1000));

        let err = compose(&markup, &registry).await.unwrap_err();
        assert!(
            matches!(err, ComposeError::Parse(sw_markup::MarkupError::TooDeep { .. })),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_slot_depth_counts_toward_limit() {
        let (registry, log) = Registry::new()
            .with("x-wrap", "<div><div><slot></slot></div></div>")
            .with("x-after", "<i></i>")
            .build();
        let composer = Composer::with_options(
            XmlMarkup::new(),
            ComposeOptions {
                max_depth: 4,
                ..ComposeOptions::default()
            },
        );

        let output = composer
            .compose_markup("<x-wrap>c</x-wrap>", &registry)
            .await
            .unwrap();
        assert_eq!(output, "<x-wrap><div><div><slot>c</slot></div></div></x-wrap>");

        let err = composer
            .compose_markup("<x-wrap><p>c</p></x-wrap><x-after></x-after>", &registry)
            .await
            .unwrap_err();
        assert!(matches!(err, ComposeError::TooDeep { max_depth: 4 }), "got {err:?}");
        assert_eq!(*log.lock().unwrap(), vec!["x-wrap", "x-wrap"]);
    }

    #[tokio::test]
    async fn test_malformed_input_aborts() {
        let (registry, log) = Registry::new().with("x-a", "<p></p>").build();

        let err = compose("<x-a></x-a><div>", &registry).await.unwrap_err();
        assert!(matches!(err, ComposeError::Parse(_)), "got {err:?}");
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_input_left_untouched() {
        let (registry, _) = Registry::new()
            .with("app-example", "<button><slot></slot></button>")
            .build();
        let input = XmlMarkup::new()
            .parse_fragment("<app-example>Mario</app-example>")
            .unwrap();
        let before = input.clone();

        let output = Composer::xml().compose_nodes(&input, &registry).await.unwrap();
        assert_eq!(input, before);
        assert_ne!(output, input);
    }
}
