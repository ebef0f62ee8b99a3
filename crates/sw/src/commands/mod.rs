//! CLI command implementations.

pub(crate) mod components;
pub(crate) mod compose;

pub(crate) use components::ComponentsArgs;
pub(crate) use compose::ComposeArgs;
