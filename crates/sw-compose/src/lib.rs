//! Server-side composition of component fragments.
//!
//! Given a markup tree and a [`RendererRegistry`], the [`Composer`] replaces
//! the body of every registered ("marker") element with the fragment its
//! renderer produces, moving the element's original children into the
//! fragment's insertion point. The output matches what a client-side
//! framework will find when it rehydrates the same components.
//!
//! # Example
//!
//! ```
//! use sw_compose::{BoxError, Composer, FactoryRenderer, RendererRegistry};
//!
//! # tokio_test_block(async {
//! let button = FactoryRenderer::new((), |_: &()| async {
//!     Ok::<_, BoxError>("<button><slot></slot> 1</button>".to_owned())
//! });
//! let registry = RendererRegistry::builder()
//!     .register("app-example", button)
//!     .build()
//!     .unwrap();
//!
//! let html = Composer::xml()
//!     .compose_markup("<app-example>Mario</app-example>", &registry)
//!     .await
//!     .unwrap();
//! assert_eq!(html, "<app-example><button><slot>Mario</slot> 1</button></app-example>");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

mod composer;
mod error;
mod ghost;
mod registry;
mod renderer;
mod slot;

pub use composer::{ComposeOptions, Composer, DEFAULT_MAX_COMPOSE_DEPTH, DEFAULT_SLOT_TAG};
pub use error::{ComposeError, RegistryError};
pub use ghost::GHOST_ROOT_TAG;
pub use registry::{RegistryBuilder, RendererEntry, RendererRegistry};
pub use renderer::{BoxError, FactoryRenderer, Renderer};
